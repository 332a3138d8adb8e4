//! Adaptive quiz backend
//!
//! - Axum HTTP API serving multiple-choice questions whose difficulty adapts per answer
//! - Question text generated by a chat-completions model, with a fixed fallback
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   GEMINI_API_KEY      : required; the process refuses to start without it
//!   MODEL_BASE_URL      : default Gemini's OpenAI-compatible endpoint
//!   MODEL_NAME          : default "gemini-2.5-flash"
//!   MODEL_TEMPERATURE   : default 0.7
//!   MODEL_TIMEOUT_SECS  : default 20
//!   PORT                : u16 (default 5001)
//!   QUIZ_CONFIG_PATH    : path to TOML config (prompts + extra curriculum topics)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod adaptive;
mod config;
mod curriculum;
mod domain;
mod error;
mod generator;
mod logic;
mod openai;
mod protocol;
mod routes;
mod seeds;
mod state;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Settings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::from_env().map_err(|e| {
    error!(target: "quiz_backend", error = %e, "Configuration error; refusing to start");
    e
  })?;

  // Shared application state (model client, prompts, curriculum).
  let state = Arc::new(AppState::new(&settings)?);
  let app = build_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "quiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "quiz_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "quiz_backend", error = %e, "Failed to listen for shutdown signal");
  }
}
