//! Generation client abstraction
//!
//! The analysis layer talks to hosted models only through [`GenerationClient`],
//! so the backend (Gemini, OpenAI, or a test double) is chosen at startup.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{GenerationConfig, GenerationProvider};
use crate::error::Result;

use super::gemini::GeminiClient;
use super::openai::OpenAiClient;

/// Failure reported by a generation backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No usable API key was configured
    #[error("{provider} API key is not configured. Set {env_var} or generation.api_key in the config file")]
    NotConfigured {
        provider: &'static str,
        env_var: &'static str,
    },

    /// The requested model does not exist or is not available to this key
    #[error("Model not found: {model}. Check the configured model id")]
    ModelNotFound { model: String },

    /// The API key was rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Quota exhausted or rate limit hit
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other error status from the API
    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network failure or timeout
    #[error("Generation request failed: {0}")]
    Transport(String),

    /// The API answered without any text
    #[error("Generation returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// Classify a non-success HTTP response
    pub fn from_status(status: StatusCode, body: &str, model: &str) -> Self {
        let lower = body.to_lowercase();
        match status.as_u16() {
            404 => Self::ModelNotFound {
                model: model.to_string(),
            },
            401 | 403 => Self::Authentication(truncate_body(body)),
            400 if lower.contains("api key") || lower.contains("api_key") => {
                Self::Authentication(truncate_body(body))
            }
            429 => Self::RateLimited(truncate_body(body)),
            _ if lower.contains("model") && lower.contains("not found") => Self::ModelNotFound {
                model: model.to_string(),
            },
            code => Self::Api {
                status: code,
                message: truncate_body(body),
            },
        }
    }

    /// Errors that will not go away without changing configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured { .. } | Self::ModelNotFound { .. } | Self::Authentication(_)
        )
    }

    /// Errors worth retrying later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.chars().count() <= MAX {
        body.trim().to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{}...", cut.trim())
    }
}

/// A single generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Complete prompt text
    pub prompt: String,
    /// Model identifier
    pub model_id: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: Option<u32>,
    /// Ask the backend for a JSON object when it supports it
    pub json_output: bool,
}

impl GenerationRequest {
    /// Plain text request with default sampling
    pub fn new(prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            temperature: 0.3,
            max_output_tokens: None,
            json_output: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Capability that turns a prompt into model-generated text.
///
/// Implementations must not retry on their own behalf; failures are returned
/// to the caller as-is.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for a request
    async fn generate(&self, request: &GenerationRequest)
        -> std::result::Result<String, GenerationError>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Build the client selected by the configuration
pub fn build_client(config: &GenerationConfig) -> Result<Arc<dyn GenerationClient>> {
    let client: Arc<dyn GenerationClient> = match config.provider {
        GenerationProvider::Gemini => Arc::new(GeminiClient::new(config)?),
        GenerationProvider::OpenAi => Arc::new(OpenAiClient::new(config)?),
    };
    tracing::info!(
        "Generation client: {} (model {})",
        client.name(),
        config.model_id()
    );
    Ok(client)
}
