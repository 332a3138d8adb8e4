//! Built-in content served when the model cannot be used.

use crate::domain::{CorrectOption, DifficultyLevel, Question};

/// Fixed substitute question. Topic and difficulty echo what was requested so the
/// client's session state stays consistent.
pub fn fallback_question(topic: &str, difficulty: DifficultyLevel) -> Question {
  Question {
    text: "System overload fallback: What does HTML stand for?".into(),
    option_a: "Hyper Text Markup Language".into(),
    option_b: "High Tech Modern Language".into(),
    option_c: "Hyper Transfer Markup Link".into(),
    option_d: "Home Tool Markup Language".into(),
    correct_option: CorrectOption::A,
    topic: topic.to_string(),
    difficulty,
  }
}
