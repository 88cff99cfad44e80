//! Audio transcription action handler.
//!
//! Asks the configured LLM proxy to transcribe the sandbox audio file and
//! saves the returned text.

use async_trait::async_trait;
use autotask_core::config::LlmConfig;
use serde::Deserialize;
use serde_json::json;

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub struct TranscribeHandler {
    client: reqwest::Client,
    llm: LlmConfig,
    /// Fixed token; when unset it is read from `llm.token_env` per request.
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    text: Option<serde_json::Value>,
}

impl TranscribeHandler {
    pub fn new(client: reqwest::Client, llm: LlmConfig) -> Self {
        Self {
            client,
            llm,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn token(&self) -> Result<String, HandlerError> {
        let token = match &self.token {
            Some(token) => token.clone(),
            None => std::env::var(&self.llm.token_env).unwrap_or_default(),
        };
        if token.trim().is_empty() {
            return Err(HandlerError::domain("AI proxy token is missing".to_string()));
        }
        Ok(token)
    }
}

#[async_trait]
impl ActionHandler for TranscribeHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Transcribe
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let input = ctx.target("input")?.clone();
        let output = ctx.target("output")?.clone();

        let audio = input.clone();
        fs::blocking(move || fs::require_input(&audio)).await?;
        let token = self.token()?;

        let body = json!({
            "model": self.llm.model,
            "prompt": format!("Transcribe the audio file: {}", input.path.display()),
            "max_tokens": self.llm.max_tokens,
        });

        let response = self
            .client
            .post(&self.llm.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| HandlerError::domain(format!("transcribe failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HandlerError::domain(format!(
                "transcribe failed: proxy returned HTTP {}",
                status
            )));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            HandlerError::domain(format!("transcribe failed: malformed proxy response: {}", e))
        })?;
        let text = match parsed.text {
            Some(serde_json::Value::String(text)) => text,
            _ => {
                return Err(HandlerError::domain(
                    "transcribe failed: proxy response has no text".to_string(),
                ))
            }
        };

        let chars = text.chars().count();
        fs::blocking(move || fs::write_output(&output, text.as_bytes())).await?;

        tracing::info!(chars, "Audio transcription saved");
        Ok("Audio transcribed.".to_string())
    }
}
