use crate::error::Result;
use crate::llm::models::LlmMessage;
use async_trait::async_trait;

/// Abstract interface for chat-completion providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the full ordered conversation and return the reply text.
    ///
    /// One request, one response: implementations do not retry or stream.
    async fn complete(&self, model: &str, messages: &[LlmMessage]) -> Result<String>;
}
