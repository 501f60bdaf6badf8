pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod web;

pub use error::{LogisError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogLoader, Lodging};
    pub use crate::chat::{ChatLoop, ChatState, Conversation, SelectionPolicy};
    pub use crate::config::AppConfig;
    pub use crate::error::{LogisError, Result};
    pub use crate::llm::gateways::MistralGateway;
    pub use crate::llm::{LlmBroker, LlmGateway, LlmMessage, MessageRole};
}
