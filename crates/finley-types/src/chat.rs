//! Chat types exchanged between the UI and the local proxy.
//!
//! A conversation is an ordered, append-only list of [`ConversationTurn`]s
//! owned by the client. The proxy never stores it; every `/chat` request
//! carries the full history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who authored a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Speaker label used when flattening a conversation into a prompt.
    pub fn speaker(&self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One message in a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Response of `POST /token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

/// Error body returned by the proxy routes on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyError {
    pub error: String,
}
