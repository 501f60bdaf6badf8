//! Mistral Gateway for chat completions.
//!
//! This module provides a gateway for the Mistral chat-completions API. It sends the
//! whole conversation in a single request and extracts the first choice's text.

use crate::error::{LogisError, Result};
use crate::llm::gateway::LlmGateway;
use crate::llm::models::LlmMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Configuration for connecting to the Mistral API, built by `AppConfig`.
#[derive(Debug, Clone)]
pub struct MistralConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<std::time::Duration>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [LlmMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Gateway for the Mistral LLM service.
pub struct MistralGateway {
    client: Client,
    config: MistralConfig,
}

impl MistralGateway {
    /// Create a new Mistral gateway with custom configuration.
    pub fn with_config(config: MistralConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(MistralConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: None,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmGateway for MistralGateway {
    async fn complete(&self, model: &str, messages: &[LlmMessage]) -> Result<String> {
        info!("Delegating to Mistral for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let body = ChatCompletionRequest { model, messages };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != reqwest::StatusCode::OK {
            return Err(LogisError::ApiError {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LogisError::GatewayError("No content in response".to_string()))
    }
}
