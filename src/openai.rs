//! Minimal chat-completions client for question generation.
//!
//! Speaks the OpenAI wire format, which Gemini also serves through its OpenAI-compatible
//! endpoint. We only request strict JSON objects. Calls are instrumented and log the model
//! name, latency, token usage and a short preview of the response (never the API key).
//!
//! One attempt per call: errors go straight back to the caller.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::Settings;
use crate::error::{ConfigError, GenerationError};
use crate::generator::QuestionModel;
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl OpenAI {
  /// Build the one client reused by every request.
  pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
    let client = reqwest::Client::builder().timeout(settings.timeout).build()?;
    Ok(Self {
      client,
      api_key: settings.api_key.clone(),
      base_url: settings.base_url.clone(),
      model: settings.model.clone(),
      temperature: settings.temperature,
    })
  }

  /// JSON-object chat completion; returns the raw message content.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model, user_len = user.len()))]
  async fn chat_json(&self, system: &str, user: &str) -> Result<String, GenerationError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature: self.temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "adaptive-quiz-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(GenerationError::Status { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    let elapsed = start.elapsed();
    if let Some(usage) = &body.usage {
      info!(?elapsed, prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Model usage");
    }

    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .map(|s| s.trim().to_string())
      .unwrap_or_default();
    if text.is_empty() {
      return Err(GenerationError::EmptyContent);
    }
    debug!(preview = %trunc_for_log(&text, 120), "Model response received");
    Ok(text)
  }
}

#[async_trait]
impl QuestionModel for OpenAI {
  async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
    self.chat_json(system, user).await
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an API error body.
/// Gemini's compatibility layer wraps errors in a one-element array; accept both shapes.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  if let Ok(w) = serde_json::from_str::<EWrap>(body) {
    return Some(w.error.message);
  }
  serde_json::from_str::<Vec<EWrap>>(body)
    .ok()
    .and_then(|v| v.into_iter().next())
    .map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[test]
  fn error_message_extraction() {
    assert_eq!(
      extract_api_error(r#"{"error":{"message":"bad key","code":401}}"#).as_deref(),
      Some("bad key")
    );
    assert_eq!(
      extract_api_error(r#"[{"error":{"message":"quota","status":"RESOURCE_EXHAUSTED"}}]"#).as_deref(),
      Some("quota")
    );
    assert!(extract_api_error("<html>502</html>").is_none());
  }

  #[test]
  fn request_asks_for_json_object() {
    let req = ChatCompletionRequest {
      model: "m".into(),
      messages: vec![ChatMessageReq { role: "user".into(), content: "hi".into() }],
      temperature: 0.7,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["response_format"]["type"], "json_object");
    assert_eq!(v["messages"][0]["role"], "user");
  }

  #[tokio::test]
  async fn unreachable_endpoint_is_a_transport_error() {
    let settings = Settings {
      api_key: "k".into(),
      base_url: "http://127.0.0.1:9".into(),
      model: "m".into(),
      temperature: 0.7,
      timeout: Duration::from_secs(2),
      port: 0,
      config_path: None,
    };
    let client = OpenAI::from_settings(&settings).unwrap();
    let err = client.complete("sys", "user").await.unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)));
  }
}
