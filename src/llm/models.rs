use serde::{Deserialize, Serialize};

/// Message role in LLM conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Message in LLM conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub content: String,
}

impl LlmMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(serde_json::to_string(&MessageRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_message_role_deserialization() {
        assert_eq!(serde_json::from_str::<MessageRole>("\"system\"").unwrap(), MessageRole::System);
        assert_eq!(serde_json::from_str::<MessageRole>("\"user\"").unwrap(), MessageRole::User);
        assert_eq!(
            serde_json::from_str::<MessageRole>("\"assistant\"").unwrap(),
            MessageRole::Assistant
        );
        assert!(serde_json::from_str::<MessageRole>("\"tool\"").is_err());
    }

    #[test]
    fn test_role_as_str_matches_wire_name() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            assert_eq!(serde_json::to_string(&role).unwrap(), format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_constructors() {
        assert_eq!(LlmMessage::system("s").role, MessageRole::System);
        assert_eq!(LlmMessage::user("u").role, MessageRole::User);

        let msg = LlmMessage::assistant("I can help with that");
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.content, "I can help with that");
    }

    #[test]
    fn test_llm_message_serialization() {
        let msg = LlmMessage::user("Quel est le code wifi ?");
        let json = serde_json::to_string(&msg).unwrap();

        assert_eq!(json, r#"{"role":"user","content":"Quel est le code wifi ?"}"#);
    }

    #[test]
    fn test_llm_message_deserialization() {
        let json = r#"{"role":"assistant","content":"response"}"#;
        let msg: LlmMessage = serde_json::from_str(json).unwrap();

        assert_eq!(msg, LlmMessage::assistant("response"));
    }
}
