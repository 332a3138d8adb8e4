//! Topic-keyed curriculum anchors used to bias question generation.
//!
//! Each topic carries a beginner (level 1) and an advanced (level 5) description.
//! The table is built once at startup and only read afterwards.

use std::collections::HashMap;

use crate::config::CurriculumCfg;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurriculumGuide {
  pub beginner: String,
  pub advanced: String,
}

#[derive(Clone, Debug, Default)]
pub struct Curriculum {
  guides: HashMap<String, CurriculumGuide>,
}

impl Curriculum {
  /// Built-in topics plus any configured entries (configured entries win on name clashes).
  pub fn new(extra: &[CurriculumCfg]) -> Self {
    let mut guides = builtin_guides();
    for entry in extra {
      guides.insert(
        entry.topic.clone(),
        CurriculumGuide { beginner: entry.beginner.clone(), advanced: entry.advanced.clone() },
      );
    }
    Self { guides }
  }

  pub fn get(&self, topic: &str) -> Option<&CurriculumGuide> {
    self.guides.get(topic)
  }

  pub fn len(&self) -> usize {
    self.guides.len()
  }

  /// Prompt snippet describing the scale for `topic`, or an empty string for unknown topics.
  pub fn context_for(&self, topic: &str) -> String {
    match self.get(topic) {
      Some(g) => format!("Context: Level 1 covers '{}'. Level 5 covers '{}'.", g.beginner, g.advanced),
      None => String::new(),
    }
  }
}

fn builtin_guides() -> HashMap<String, CurriculumGuide> {
  [
    (
      "Programming Fundamentals",
      "Basic concepts: Loops, Variables, Data Types in Python or Java.",
      "Advanced concepts: Object-Oriented Programming (OOP), memory management, multithreading.",
    ),
    (
      "Web Development",
      "Frontend basics: HTML structure, CSS styling, simple DOM manipulation.",
      "Advanced full-stack: React state management, hooks, backend API routing (Flask/Node), CORS.",
    ),
    (
      "Advanced Tech",
      "Introductory concepts: What is supervised learning? What is symmetric encryption?",
      "Deep implementation: Data preprocessing techniques, neural network architectures, or how AES works.",
    ),
  ]
  .into_iter()
  .map(|(topic, beginner, advanced)| {
    (topic.to_string(), CurriculumGuide { beginner: beginner.into(), advanced: advanced.into() })
  })
  .collect()
}
