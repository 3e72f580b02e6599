//! Conversation history supplied by the caller

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions
    User,
    /// The model's previous answers
    #[serde(alias = "model")]
    Assistant,
}

impl Role {
    /// Label used when the turn is rendered into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One prior message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    /// A user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_json() {
        let history: Vec<ConversationTurn> = serde_json::from_str(
            r#"[{"role":"user","content":"Who signed?"},{"role":"model","content":"Anna Meier."}]"#,
        )
        .unwrap();

        assert_eq!(history[0], ConversationTurn::user("Who signed?"));
        assert_eq!(history[1], ConversationTurn::assistant("Anna Meier."));
        assert_eq!(history[1].role.label(), "Assistant");
    }
}
