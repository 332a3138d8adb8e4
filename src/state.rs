//! Application state: the single configured question provider shared by all requests.
//!
//! Nothing here is mutable after startup; every request is self-contained and the
//! client carries the session (topic, current difficulty, running score).

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{load_quiz_config, Prompts, Settings};
use crate::curriculum::Curriculum;
use crate::error::ConfigError;
use crate::generator::{QuestionModel, QuestionProvider};
use crate::openai::OpenAI;

#[derive(Clone)]
pub struct AppState {
  pub questions: QuestionProvider,
}

impl AppState {
  /// Build state from settings: load the optional TOML config, the curriculum table and the model client.
  #[instrument(level = "info", skip_all)]
  pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
    let cfg = settings.config_path.as_deref().and_then(load_quiz_config).unwrap_or_default();
    let curriculum = Curriculum::new(&cfg.curriculum);

    let client = OpenAI::from_settings(settings)?;
    info!(target: "quiz_backend", base_url = %client.base_url, model = %client.model, temperature = client.temperature, topics = curriculum.len(), "Question model configured");

    Ok(Self::with_model(Arc::new(client), cfg.prompts, curriculum))
  }

  /// Assemble state around any model; tests substitute a stub here.
  pub fn with_model(model: Arc<dyn QuestionModel>, prompts: Prompts, curriculum: Curriculum) -> Self {
    Self { questions: QuestionProvider::new(model, prompts, curriculum) }
  }
}
