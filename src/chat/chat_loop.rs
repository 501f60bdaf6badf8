//! The chat turn state machine.
//!
//! A visitor first selects a lodging (`AwaitingSelection -> ChatReady`), then each
//! submitted question moves the loop to `AwaitingReply` until the completion returns.
//! Completion failures never escape a turn: they are recorded as an assistant message
//! starting with [`ERROR_PREFIX`] and the loop returns to `ChatReady`.

use crate::catalog::{Catalog, Lodging};
use crate::chat::conversation::Conversation;
use crate::error::{LogisError, Result};
use crate::llm::broker::LlmBroker;
use crate::llm::models::LlmMessage;
use tracing::{debug, info, warn};

/// Prefix of the assistant message recorded when a turn fails.
pub const ERROR_PREFIX: &str = "Erreur";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    AwaitingSelection,
    ChatReady,
    AwaitingReply,
}

/// What happens to an ongoing conversation when another lodging is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// The conversation is seeded on the first selection only.
    #[default]
    KeepConversation,
    /// Selecting a different lodging starts a new conversation grounded on it.
    ResetConversation,
}

#[derive(Debug, Default)]
pub struct ChatLoop {
    policy: SelectionPolicy,
    selected: Option<Lodging>,
    conversation: Option<Conversation>,
    awaiting_reply: bool,
}

impl ChatLoop {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn state(&self) -> ChatState {
        if self.awaiting_reply {
            ChatState::AwaitingReply
        } else if self.conversation.is_some() {
            ChatState::ChatReady
        } else {
            ChatState::AwaitingSelection
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// The lodging currently shown as selected.
    pub fn selected(&self) -> Option<&Lodging> {
        self.selected.as_ref()
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    /// Messages shown to the visitor, oldest first.
    pub fn display_log(&self) -> &[LlmMessage] {
        self.conversation.as_ref().map(Conversation::chat_log).unwrap_or_default()
    }

    /// Messages sent to the model, system message first.
    pub fn request_log(&self) -> &[LlmMessage] {
        self.conversation.as_ref().map(Conversation::messages).unwrap_or_default()
    }

    /// Select the lodging whose label is exactly `label`.
    pub fn select(&mut self, catalog: &Catalog, label: &str) -> Result<&Lodging> {
        let lodging = catalog
            .find_by_label(label)
            .cloned()
            .ok_or_else(|| LogisError::UnknownLodging(label.to_string()))?;
        self.select_lodging(lodging)
    }

    pub fn select_lodging(&mut self, lodging: Lodging) -> Result<&Lodging> {
        let reseed = match (&self.conversation, self.policy) {
            (None, _) => true,
            (Some(current), SelectionPolicy::ResetConversation) => {
                current.lodging_id() != lodging.id()
            }
            (Some(_), SelectionPolicy::KeepConversation) => false,
        };

        if reseed {
            info!(lodging = %lodging.label(), "Starting conversation");
            self.conversation = Some(Conversation::new(&lodging)?);
        } else {
            debug!(lodging = %lodging.label(), "Selection changed, conversation kept");
        }

        let selected: &Lodging = self.selected.insert(lodging);
        Ok(selected)
    }

    /// Run one turn: record `input`, ask the model, record its reply.
    ///
    /// Returns the recorded assistant text, or `None` when the input is blank or nothing
    /// is selected yet (no state change in either case). Dropping the returned future
    /// before the reply arrives still closes the turn with an error message.
    pub async fn submit(&mut self, broker: &LlmBroker, input: &str) -> Option<String> {
        if input.trim().is_empty() {
            return None;
        }
        let conversation = self.conversation.as_mut()?;

        conversation.push_user(input);
        let messages = conversation.messages().to_vec();
        self.awaiting_reply = true;
        debug!(messages = messages.len(), "Awaiting reply");

        let turn = PendingTurn { chat: self, closed: false };
        let reply = match broker.generate(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Completion failed");
                error_reply(&e)
            }
        };

        Some(turn.close(reply))
    }

    fn record_reply(&mut self, reply: String) {
        if let Some(conversation) = self.conversation.as_mut() {
            conversation.push_assistant(reply);
        }
        self.awaiting_reply = false;
    }
}

fn error_reply(err: &LogisError) -> String {
    format!("{} : {}", ERROR_PREFIX, err)
}

/// A turn waiting on the model. Dropped unclosed, it records an interruption.
struct PendingTurn<'a> {
    chat: &'a mut ChatLoop,
    closed: bool,
}

impl PendingTurn<'_> {
    fn close(mut self, reply: String) -> String {
        self.chat.record_reply(reply.clone());
        self.closed = true;
        reply
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Turn dropped before the completion returned");
            self.chat.record_reply(error_reply(&LogisError::TurnInterrupted));
        }
    }
}
