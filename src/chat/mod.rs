//! Per-visitor conversation state and the chat turn state machine.

pub mod chat_loop;
pub mod conversation;
pub mod prompt;

pub use chat_loop::{ChatLoop, ChatState, SelectionPolicy};
pub use conversation::Conversation;
pub use prompt::system_prompt;
