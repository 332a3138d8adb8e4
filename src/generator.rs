//! Question generation with a guaranteed answer.
//!
//! `QuestionProvider` builds the prompt (templates + curriculum context), asks the
//! configured `QuestionModel` once, checks the reply against the question schema and
//! falls back to the fixed seed question on any failure. Callers never see an error.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::config::Prompts;
use crate::curriculum::Curriculum;
use crate::domain::{CorrectOption, DifficultyLevel, Question};
use crate::error::GenerationError;
use crate::seeds::fallback_question;
use crate::util::fill_template;

/// Remote model boundary: takes a system and a user prompt, returns the raw JSON text.
#[async_trait]
pub trait QuestionModel: Send + Sync {
  async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

/// Where a served question came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionOrigin {
  Generated,
  Fallback,
}

impl std::fmt::Display for QuestionOrigin {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      QuestionOrigin::Generated => "model_generated",
      QuestionOrigin::Fallback => "fallback",
    })
  }
}

/// Question as the model returns it. Topic and difficulty always come from the
/// request, so the model's copies are ignored whatever their shape.
#[derive(Deserialize)]
struct ModelQuestion {
  #[serde(rename = "Question_Text")]
  text: String,
  #[serde(rename = "Option_A")]
  option_a: String,
  #[serde(rename = "Option_B")]
  option_b: String,
  #[serde(rename = "Option_C")]
  option_c: String,
  #[serde(rename = "Option_D")]
  option_d: String,
  #[serde(rename = "Correct_Option")]
  correct_option: CorrectOption,
  #[serde(rename = "Topic", default)]
  topic: Option<serde_json::Value>,
  #[serde(rename = "Difficulty_Level", default)]
  difficulty: Option<serde_json::Value>,
}

impl ModelQuestion {
  fn into_question(self, topic: &str, difficulty: DifficultyLevel) -> Question {
    Question {
      text: self.text,
      option_a: self.option_a,
      option_b: self.option_b,
      option_c: self.option_c,
      option_d: self.option_d,
      correct_option: self.correct_option,
      topic: topic.to_string(),
      difficulty,
    }
  }
}

#[derive(Clone)]
pub struct QuestionProvider {
  model: Arc<dyn QuestionModel>,
  prompts: Prompts,
  curriculum: Curriculum,
}

impl QuestionProvider {
  pub fn new(model: Arc<dyn QuestionModel>, prompts: Prompts, curriculum: Curriculum) -> Self {
    Self { model, prompts, curriculum }
  }

  /// Always returns a usable question; generation failures are logged and replaced by the fallback.
  #[instrument(level = "info", skip_all, fields(%topic, %difficulty))]
  pub async fn generate_question(&self, topic: &str, difficulty: DifficultyLevel) -> (Question, QuestionOrigin) {
    match self.try_generate(topic, difficulty).await {
      Ok(q) => {
        info!(target: "question", %topic, %difficulty, origin = %QuestionOrigin::Generated, "Question generated");
        (q, QuestionOrigin::Generated)
      }
      Err(e) => {
        error!(target: "question", %topic, %difficulty, error = %e, "Question generation failed; serving fallback");
        (fallback_question(topic, difficulty), QuestionOrigin::Fallback)
      }
    }
  }

  async fn try_generate(&self, topic: &str, difficulty: DifficultyLevel) -> Result<Question, GenerationError> {
    let user = self.user_prompt(topic, difficulty);
    let raw = self.model.complete(&self.prompts.system, &user).await?;
    let mq: ModelQuestion = serde_json::from_str(strip_code_fence(&raw))?;
    debug!(target: "question", model_topic = ?mq.topic, model_difficulty = ?mq.difficulty, "Using requested topic/difficulty");
    let q = mq.into_question(topic, difficulty);
    validate(&q)?;
    Ok(q)
  }

  fn user_prompt(&self, topic: &str, difficulty: DifficultyLevel) -> String {
    let difficulty = difficulty.to_string();
    let context = self.curriculum.context_for(topic);
    fill_template(
      &self.prompts.question_user_template,
      &[("topic", topic), ("difficulty", &difficulty), ("context", &context)],
    )
  }
}

/// Some models wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(raw: &str) -> &str {
  let s = raw.trim();
  match s.strip_prefix("```") {
    Some(rest) => {
      let rest = rest.strip_prefix("json").unwrap_or(rest);
      rest.strip_suffix("```").unwrap_or(rest).trim()
    }
    None => s,
  }
}

fn validate(q: &Question) -> Result<(), GenerationError> {
  if q.text.trim().is_empty() {
    return Err(GenerationError::Schema("empty Question_Text".into()));
  }
  if let Some(i) = q.options().iter().position(|o| o.trim().is_empty()) {
    let label = ["A", "B", "C", "D"][i];
    return Err(GenerationError::Schema(format!("empty Option_{label}")));
  }
  Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use std::sync::Mutex;

  /// Test double that replays a canned reply and records the prompts it saw.
  pub(crate) struct StubModel {
    reply: Result<String, String>,
    pub seen: Mutex<Vec<(String, String)>>,
  }

  impl StubModel {
    pub(crate) fn ok(json: &str) -> Self {
      Self { reply: Ok(json.to_string()), seen: Mutex::new(vec![]) }
    }
    pub(crate) fn failing() -> Self {
      Self { reply: Err("connection reset".into()), seen: Mutex::new(vec![]) }
    }
  }

  #[async_trait]
  impl QuestionModel for StubModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
      self.seen.lock().unwrap().push((system.to_string(), user.to_string()));
      self.reply.clone().map_err(|m| GenerationError::Status { status: 503, message: m })
    }
  }

  pub(crate) const GOOD_REPLY: &str = r#"{
    "Question_Text": "Which keyword declares an immutable binding in Rust?",
    "Option_A": "mut", "Option_B": "let", "Option_C": "var", "Option_D": "static mut",
    "Correct_Option": "B", "Topic": "Rust", "Difficulty_Level": 9
  }"#;

  fn provider(model: StubModel) -> (QuestionProvider, Arc<StubModel>) {
    let model = Arc::new(model);
    let p = QuestionProvider::new(model.clone(), Prompts::default(), Curriculum::new(&[]));
    (p, model)
  }

  #[tokio::test]
  async fn remote_failure_serves_fallback_echoing_inputs() {
    let (p, _) = provider(StubModel::failing());
    let (q, origin) = p.generate_question("Web Development", 4).await;
    assert_eq!(origin, QuestionOrigin::Fallback);
    assert_eq!(q.topic, "Web Development");
    assert_eq!(q.difficulty, 4);
    assert_eq!(q.correct_option, CorrectOption::A);
  }

  #[tokio::test]
  async fn malformed_output_serves_fallback() {
    for reply in [
      "not json at all",
      r#"{"Question_Text": "x"}"#,
      r#"{"Question_Text":"q","Option_A":"a","Option_B":"b","Option_C":"c","Option_D":"d","Correct_Option":"E","Topic":"t","Difficulty_Level":3}"#,
      r#"{"Question_Text":"  ","Option_A":"a","Option_B":"b","Option_C":"c","Option_D":"d","Correct_Option":"A","Topic":"t","Difficulty_Level":3}"#,
      r#"{"Question_Text":"q","Option_A":"a","Option_B":"","Option_C":"c","Option_D":"d","Correct_Option":"A","Topic":"t","Difficulty_Level":3}"#,
    ] {
      let (p, _) = provider(StubModel::ok(reply));
      let (q, origin) = p.generate_question("Advanced Tech", 2).await;
      assert_eq!(origin, QuestionOrigin::Fallback, "reply: {reply}");
      assert_eq!(q, fallback_question("Advanced Tech", 2));
    }
  }

  #[tokio::test]
  async fn good_output_is_normalized_to_request() {
    let (p, _) = provider(StubModel::ok(GOOD_REPLY));
    let (q, origin) = p.generate_question("Programming Fundamentals", 3).await;
    assert_eq!(origin, QuestionOrigin::Generated);
    assert_eq!(q.correct_option, CorrectOption::B);
    assert_eq!(q.topic, "Programming Fundamentals");
    assert_eq!(q.difficulty, 3);
  }

  #[tokio::test]
  async fn odd_topic_and_difficulty_from_model_are_ignored() {
    for reply in [
      r#"{"Question_Text":"q","Option_A":"a","Option_B":"b","Option_C":"c","Option_D":"d","Correct_Option":"D","Difficulty_Level":"3"}"#,
      r#"{"Question_Text":"q","Option_A":"a","Option_B":"b","Option_C":"c","Option_D":"d","Correct_Option":"D","Topic":null,"Difficulty_Level":3.5}"#,
      r#"{"Question_Text":"q","Option_A":"a","Option_B":"b","Option_C":"c","Option_D":"d","Correct_Option":"D"}"#,
    ] {
      let (p, _) = provider(StubModel::ok(reply));
      let (q, origin) = p.generate_question("Web Development", 4).await;
      assert_eq!(origin, QuestionOrigin::Generated, "reply: {reply}");
      assert_eq!(q.correct_option, CorrectOption::D);
      assert_eq!(q.topic, "Web Development");
      assert_eq!(q.difficulty, 4);
    }
  }

  #[tokio::test]
  async fn fenced_json_is_accepted() {
    let fenced = format!("```json\n{GOOD_REPLY}\n```");
    let (p, _) = provider(StubModel::ok(&fenced));
    let (_, origin) = p.generate_question("Rust", 5).await;
    assert_eq!(origin, QuestionOrigin::Generated);
  }

  #[tokio::test]
  async fn prompt_carries_topic_difficulty_and_curriculum() {
    let (p, model) = provider(StubModel::ok(GOOD_REPLY));
    p.generate_question("Web Development", 5).await;
    p.generate_question("Rust", 1).await;

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    let (system, user) = &seen[0];
    assert!(system.contains("Computer Science Engineering professor"));
    assert!(user.contains("about 'Web Development' at a difficulty level of 5 out of 5"));
    assert!(user.contains("Level 1 covers 'Frontend basics"));
    assert!(!seen[1].1.contains("Context:"));
    assert!(!seen[1].1.contains("{context}"));
  }

  #[test]
  fn strip_code_fence_variants() {
    assert_eq!(strip_code_fence("{}"), "{}");
    assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
    assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
  }
}
