//! Conversation state for one visitor.
//!
//! Two parallel logs are kept: the request log sent to the model, which always begins
//! with exactly one system message, and the display log shown to the visitor, which
//! omits it.

use crate::catalog::Lodging;
use crate::chat::prompt::system_prompt;
use crate::error::Result;
use crate::llm::models::LlmMessage;

#[derive(Debug, Clone)]
pub struct Conversation {
    lodging_id: String,
    messages: Vec<LlmMessage>,
    chat_log: Vec<LlmMessage>,
}

impl Conversation {
    /// Start a conversation grounded on `lodging`.
    pub fn new(lodging: &Lodging) -> Result<Self> {
        Ok(Self {
            lodging_id: lodging.id().to_string(),
            messages: vec![LlmMessage::system(system_prompt(lodging)?)],
            chat_log: Vec::new(),
        })
    }

    /// Identifier of the lodging the system message describes.
    pub fn lodging_id(&self) -> &str {
        &self.lodging_id
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(LlmMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(LlmMessage::assistant(content));
    }

    /// Full request log, system message first.
    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }

    /// Visible messages only.
    pub fn chat_log(&self) -> &[LlmMessage] {
        &self.chat_log
    }

    fn push(&mut self, message: LlmMessage) {
        self.chat_log.push(message.clone());
        self.messages.push(message);
    }
}
