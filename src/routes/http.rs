//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Bodies are optional: a missing or unparsable body is treated as empty so every
//! field takes its default.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use rand::{rngs::StdRng, SeedableRng};
use tracing::instrument;

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_start_test(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(start_test(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(has_body = body.is_some()))]
pub async fn http_submit_answer(
  State(state): State<Arc<AppState>>,
  body: Option<Json<SubmitAnswerIn>>,
) -> impl IntoResponse {
  let body = body.map(|Json(b)| b).unwrap_or_default();
  // StdRng rather than ThreadRng: the handler future must stay Send.
  let mut rng = StdRng::from_entropy();
  Json(submit_answer(&state, body, &mut rng).await)
}

#[instrument(level = "info", skip(state, body), fields(has_body = body.is_some()))]
pub async fn http_start_second_test(
  State(state): State<Arc<AppState>>,
  body: Option<Json<StartSecondTestIn>>,
) -> impl IntoResponse {
  let body = body.map(|Json(b)| b).unwrap_or_default();
  Json(start_second_test(&state, body).await)
}
