//! Domain models used by the backend: difficulty scale, answer option tags, and the question itself.

use serde::{Deserialize, Serialize};

/// Ordinal difficulty scale: 1 (Very Easy), 2 (Easy), 3 (Medium), 4 (Hard), 5 (Very Hard).
///
/// Kept as a plain integer: inputs come from the client unvalidated, and the adaptation
/// rules are defined over every integer, not only 1..=5.
pub type DifficultyLevel = i64;

pub const MIN_DIFFICULTY: DifficultyLevel = 1;
pub const MAX_DIFFICULTY: DifficultyLevel = 5;

/// Where every session starts before any adaptation happened.
pub const DEFAULT_DIFFICULTY: DifficultyLevel = 3;

pub const DEFAULT_TOPIC: &str = "Programming Fundamentals";

/// Label of one of the four answer options.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CorrectOption {
  A,
  B,
  C,
  D,
}

/// One multiple-choice question. Field names follow the wire format the frontend reads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
  #[serde(rename = "Question_Text")]
  pub text: String,
  #[serde(rename = "Option_A")]
  pub option_a: String,
  #[serde(rename = "Option_B")]
  pub option_b: String,
  #[serde(rename = "Option_C")]
  pub option_c: String,
  #[serde(rename = "Option_D")]
  pub option_d: String,
  #[serde(rename = "Correct_Option")]
  pub correct_option: CorrectOption,
  #[serde(rename = "Topic")]
  pub topic: String,
  #[serde(rename = "Difficulty_Level")]
  pub difficulty: DifficultyLevel,
}

impl Question {
  /// All four option texts in label order.
  pub fn options(&self) -> [&str; 4] {
    [self.option_a.as_str(), self.option_b.as_str(), self.option_c.as_str(), self.option_d.as_str()]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn question_uses_frontend_field_names() {
    let q = Question {
      text: "What is 2 + 2?".into(),
      option_a: "3".into(),
      option_b: "4".into(),
      option_c: "5".into(),
      option_d: "22".into(),
      correct_option: CorrectOption::B,
      topic: DEFAULT_TOPIC.into(),
      difficulty: 1,
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["Question_Text"], "What is 2 + 2?");
    assert_eq!(v["Option_D"], "22");
    assert_eq!(v["Correct_Option"], "B");
    assert_eq!(v["Topic"], "Programming Fundamentals");
    assert_eq!(v["Difficulty_Level"], 1);
  }

  #[test]
  fn correct_option_rejects_unknown_labels() {
    assert!(serde_json::from_str::<CorrectOption>("\"E\"").is_err());
    assert!(serde_json::from_str::<CorrectOption>("\"a\"").is_err());
    assert_eq!(serde_json::from_str::<CorrectOption>("\"C\"").unwrap(), CorrectOption::C);
  }
}
