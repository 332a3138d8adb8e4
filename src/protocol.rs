//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{DifficultyLevel, Question};

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Serialize)]
pub struct StartTestOut {
  pub status: &'static str,
  pub question: Question,
}

/// Read a field on its own: a value of the wrong type becomes `None` instead of
/// failing the whole body.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let v = Value::deserialize(d)?;
  Ok(serde_json::from_value(v).ok())
}

/// Like `lenient`, but also takes integral floats such as `3.0`.
fn lenient_difficulty<'de, D>(d: D) -> Result<Option<DifficultyLevel>, D::Error>
where
  D: Deserializer<'de>,
{
  let v = Value::deserialize(d)?;
  Ok(match v {
    Value::Number(n) => n.as_i64().or_else(|| {
      n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
    }),
    _ => None,
  })
}

/// Every field is optional; absent, null or unreadable values take the session defaults
/// while the readable ones are kept.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitAnswerIn {
  #[serde(default, deserialize_with = "lenient")]
  pub topic: Option<String>,
  #[serde(default, deserialize_with = "lenient_difficulty")]
  pub current_difficulty: Option<DifficultyLevel>,
  #[serde(default, deserialize_with = "lenient")]
  pub is_correct: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerOut {
  pub status: &'static str,
  pub message: &'static str,
  pub new_difficulty: DifficultyLevel,
  pub question: Question,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartSecondTestIn {
  #[serde(default, deserialize_with = "lenient")]
  pub test1_percentage: Option<f64>,
  #[serde(default, deserialize_with = "lenient")]
  pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartSecondTestOut {
  pub status: &'static str,
  pub starting_difficulty: DifficultyLevel,
  pub question: Question,
}

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
}
