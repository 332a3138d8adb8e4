//! Runtime configuration: environment variables plus an optional TOML file
//! (prompt overrides and extra curriculum entries).
//!
//! See `Settings`, `QuizConfig` and `Prompts` for the expected schema.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_PORT: u16 = 5001;

/// Everything read from the process environment at startup.
#[derive(Clone, Debug)]
pub struct Settings {
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
  pub timeout: Duration,
  pub port: u16,
  pub config_path: Option<String>,
}

impl Settings {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|k| std::env::var(k).ok())
  }

  /// Build settings from any key lookup. Only the API key is mandatory; an
  /// unparsable optional value is reported and replaced by its default.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let api_key = lookup(API_KEY_VAR)
      .filter(|k| !k.trim().is_empty())
      .ok_or(ConfigError::MissingApiKey { var: API_KEY_VAR })?;

    let base_url = lookup("MODEL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
    let model = lookup("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.into());
    let temperature = parse_or(&lookup, "MODEL_TEMPERATURE", DEFAULT_TEMPERATURE);
    let timeout = Duration::from_secs(parse_or(&lookup, "MODEL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS));
    let port = parse_or(&lookup, "PORT", DEFAULT_PORT);
    let config_path = lookup("QUIZ_CONFIG_PATH");

    Ok(Self {
      api_key,
      base_url: base_url.trim_end_matches('/').to_string(),
      model,
      temperature,
      timeout,
      port,
      config_path,
    })
  }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
  F: Fn(&str) -> Option<String>,
  T: std::str::FromStr + std::fmt::Display,
{
  match lookup(key) {
    None => default,
    Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
      warn!(target: "quiz_backend", %key, %raw, %default, "Unparsable value; using default");
      default
    }),
  }
}

/// Optional TOML file contents.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub curriculum: Vec<CurriculumCfg>,
}

/// Curriculum entry accepted in TOML configuration. Overrides a built-in topic of the same name.
#[derive(Clone, Debug, Deserialize)]
pub struct CurriculumCfg {
  pub topic: String,
  pub beginner: String,
  pub advanced: String,
}

/// Prompts used for question generation. `{topic}`, `{difficulty}` and `{context}` are substituted.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub system: String,
  pub question_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system: "You are an expert Computer Science Engineering professor creating an adaptive test. Respond ONLY with strict JSON.".into(),
      question_user_template: "Generate exactly ONE multiple-choice question about '{topic}' at a difficulty level of {difficulty} out of 5.\n{context}\nReturn a JSON object with fields: Question_Text, Option_A, Option_B, Option_C, Option_D, Correct_Option, Topic, Difficulty_Level.\nThe Correct_Option MUST be strictly one of: \"A\", \"B\", \"C\", or \"D\".".into(),
    }
  }
}

/// Load `QuizConfig` from `path`. On any IO or parse error, logs and returns None.
pub fn load_quiz_config(path: &str) -> Option<QuizConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "quiz_backend", %path, curriculum = cfg.curriculum.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
