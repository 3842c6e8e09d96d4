// src/provider/mod.rs — Model client layer

pub mod catalog;
pub mod credential;
pub mod openrouter;
pub mod retry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::StudioError;

/// Lowest temperature a request may carry.
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest temperature a request may carry.
pub const MAX_TEMPERATURE: f32 = 1.0;

/// The single capability the studio pipeline needs from a model backend.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn id(&self) -> &str;

    /// Send one prompt and return the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, StudioError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Check the request before anything goes over the wire.
    pub fn validate(&self) -> Result<(), StudioError> {
        if self.model.trim().is_empty() {
            return Err(StudioError::Validation("model identifier is empty".into()));
        }
        if self.prompt.trim().is_empty() {
            return Err(StudioError::Validation("prompt text is empty".into()));
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(StudioError::Validation(format!(
                "temperature {} is outside {MIN_TEMPERATURE}..={MAX_TEMPERATURE}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
}
