//! OpenAI chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

use super::client::{GenerationClient, GenerationError, GenerationRequest};

/// Client for the OpenAI chat-completions API and compatible servers
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Build the request body in the chat-completions format
fn request_body(request: &GenerationRequest) -> Value {
    let mut body = json!({
        "model": request.model_id,
        "messages": [
            { "role": "user", "content": request.prompt }
        ],
        "temperature": request.temperature,
    });

    if let Some(max_tokens) = request.max_output_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if request.json_output {
        body["response_format"] = json!({ "type": "json_object" });
    }

    body
}

/// Content of the first choice
fn response_text(json: &Value) -> Option<String> {
    json["choices"]
        .get(0)?["message"]["content"]
        .as_str()
        .map(String::from)
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::NotConfigured {
            provider: "OpenAI",
            env_var: "OPENAI_API_KEY",
        })?;

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body(request))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("OpenAI API error {}: {}", status, text);
            return Err(GenerationError::from_status(status, &text, &request.model_id));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| GenerationError::Transport(format!("Failed to parse OpenAI response: {}", e)))?;

        response_text(&json).ok_or(GenerationError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
