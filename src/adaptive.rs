//! Difficulty adaptation rules.
//!
//! - Micro-adaptation (`next_difficulty`) runs after every answered question.
//! - Macro-adaptation (`starting_difficulty`) runs once, when the second test begins.
//!
//! Both are pure and total. The random branches take the generator as a parameter so
//! callers decide where randomness comes from (thread RNG in handlers, seeded RNG in tests).

use rand::Rng;

use crate::domain::DifficultyLevel;

/// Uniform pick between exactly two candidates.
fn pick_one<R: Rng + ?Sized>(rng: &mut R, pair: [DifficultyLevel; 2]) -> DifficultyLevel {
  pair[rng.gen_range(0..pair.len())]
}

/// Next question's difficulty given the current one and whether the answer was correct.
///
/// | current | correct | next           |
/// |---------|---------|----------------|
/// | >= 4    | yes     | 5              |
/// | >= 4    | no      | 2 or 3         |
/// | 3       | yes     | 4              |
/// | 3       | no      | 2              |
/// | <= 2    | yes     | 3 or 4         |
/// | <= 2    | no      | 1              |
///
/// Values outside 1..=5 are not rejected; they land in the nearest branch.
pub fn next_difficulty<R: Rng + ?Sized>(
  current: DifficultyLevel,
  correct: bool,
  rng: &mut R,
) -> DifficultyLevel {
  if current >= 4 {
    if correct { 5 } else { pick_one(rng, [2, 3]) }
  } else if current == 3 {
    if correct { 4 } else { 2 }
  } else if correct {
    pick_one(rng, [3, 4])
  } else {
    1
  }
}

/// Starting difficulty for the second test, from the first test's score in percent.
///
/// Above 70 starts Very Hard, 50..=70 starts Medium, anything else (including NaN) starts Easy.
/// Levels 1 and 4 are never produced here.
pub fn starting_difficulty(test1_percentage: f64) -> DifficultyLevel {
  if test1_percentage > 70.0 {
    5
  } else if test1_percentage >= 50.0 {
    3
  } else {
    2
  }
}
