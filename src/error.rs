//! Error kinds. Startup failures are fatal; generation failures never leave `generator`.

use thiserror::Error;

/// Problems that keep the process from serving traffic.
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("required environment variable {var} is not set")]
  MissingApiKey { var: &'static str },

  #[error("failed to build HTTP client: {0}")]
  HttpClient(#[from] reqwest::Error),
}

/// Anything that can go wrong while asking the model for a question.
#[derive(Error, Debug)]
pub enum GenerationError {
  #[error("model request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("model HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("model returned no content")]
  EmptyContent,

  #[error("model output is not a question: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("model output violates the question schema: {0}")]
  Schema(String),
}
