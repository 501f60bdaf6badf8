use crate::error::Result;
use crate::llm::gateway::LlmGateway;
use crate::llm::models::LlmMessage;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "mistral-large-latest";

/// Binds a gateway to the model every turn is sent to.
#[derive(Clone)]
pub struct LlmBroker {
    model: String,
    gateway: Arc<dyn LlmGateway>,
}

impl LlmBroker {
    /// Create a new LLM broker
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate the assistant reply for the given conversation
    pub async fn generate(&self, messages: &[LlmMessage]) -> Result<String> {
        debug!(model = %self.model, messages = messages.len(), "Generating completion");
        self.gateway.complete(&self.model, messages).await
    }
}
