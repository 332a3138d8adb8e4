//! Core flows behind the HTTP handlers: defaulting, adaptation, generation.

use rand::Rng;
use tracing::{info, instrument, warn};

use crate::adaptive::{next_difficulty, starting_difficulty};
use crate::domain::{DifficultyLevel, DEFAULT_DIFFICULTY, DEFAULT_TOPIC, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::protocol::*;
use crate::state::AppState;

const ANSWER_PROCESSED: &str = "Answer processed";

#[instrument(level = "info", skip(state))]
pub async fn start_test(state: &AppState) -> StartTestOut {
  let (question, origin) = state.questions.generate_question(DEFAULT_TOPIC, DEFAULT_DIFFICULTY).await;
  info!(target: "adaptive", topic = DEFAULT_TOPIC, difficulty = DEFAULT_DIFFICULTY, %origin, "Test started");
  StartTestOut { status: STATUS_SUCCESS, question }
}

#[instrument(level = "info", skip(state, body, rng))]
pub async fn submit_answer<R: Rng + Send + ?Sized>(state: &AppState, body: SubmitAnswerIn, rng: &mut R) -> SubmitAnswerOut {
  let topic = body.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string());
  let current = body.current_difficulty.unwrap_or(DEFAULT_DIFFICULTY);
  let correct = body.is_correct.unwrap_or(false);

  if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&current) {
    warn!(target: "adaptive", %current, "Difficulty outside the 1-5 scale; applying nearest rule");
  }
  let new_difficulty = next_difficulty(current, correct, rng);
  info!(target: "adaptive", %topic, %current, %correct, %new_difficulty, "Micro-adaptation applied");

  let (question, origin) = state.questions.generate_question(&topic, new_difficulty).await;
  info!(target: "question", %topic, %new_difficulty, %origin, "Next question served");
  SubmitAnswerOut { status: STATUS_SUCCESS, message: ANSWER_PROCESSED, new_difficulty, question }
}

#[instrument(level = "info", skip(state, body))]
pub async fn start_second_test(state: &AppState, body: StartSecondTestIn) -> StartSecondTestOut {
  let topic = body.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string());
  let percentage = body.test1_percentage.unwrap_or(0.0);
  let starting: DifficultyLevel = starting_difficulty(percentage);
  info!(target: "adaptive", %topic, %percentage, %starting, "Macro-adaptation applied");

  let (question, origin) = state.questions.generate_question(&topic, starting).await;
  info!(target: "question", %topic, %starting, %origin, "First question of second test served");
  StartSecondTestOut { status: STATUS_SUCCESS, starting_difficulty: starting, question }
}
