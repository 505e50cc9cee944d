//! Assistant reply shapes.
//!
//! Every responder produces a [`Reply`]; the conversation layer wraps it in
//! an [`AssistantMessage`] with an id and timestamp.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Prefix of the navigation side channel carried in `action`.
pub const NAVIGATE_PREFIX: &str = "navigate:";

/// A reply produced by one of the responders.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Plain text with suggested follow-ups.
    Message {
        content: String,
        quick_replies: Vec<String>,
    },
    /// Text plus a request for the caller to open `path`.
    Navigate {
        content: String,
        path: String,
        quick_replies: Vec<String>,
    },
}

impl Reply {
    pub fn message(content: impl Into<String>, quick_replies: &[&str]) -> Self {
        Self::Message {
            content: content.into(),
            quick_replies: to_owned(quick_replies),
        }
    }

    pub fn navigate(content: impl Into<String>, path: impl Into<String>, quick_replies: &[&str]) -> Self {
        Self::Navigate {
            content: content.into(),
            path: path.into(),
            quick_replies: to_owned(quick_replies),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Message { content, .. } | Self::Navigate { content, .. } => content,
        }
    }

    pub fn quick_replies(&self) -> &[String] {
        match self {
            Self::Message { quick_replies, .. } | Self::Navigate { quick_replies, .. } => {
                quick_replies
            }
        }
    }

    /// The `navigate:<path>` action string, for navigation replies.
    pub fn action(&self) -> Option<String> {
        match self {
            Self::Message { .. } => None,
            Self::Navigate { path, .. } => Some(format!("{NAVIGATE_PREFIX}{path}")),
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Ai,
}

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl AssistantMessage {
    pub fn user(content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_type: MessageType::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            quick_replies: None,
            action: None,
        }
    }

    pub fn ai(reply: Reply) -> Self {
        let action = reply.action();
        let (content, quick_replies) = match reply {
            Reply::Message {
                content,
                quick_replies,
            }
            | Reply::Navigate {
                content,
                quick_replies,
                ..
            } => (content, quick_replies),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            message_type: MessageType::Ai,
            content,
            timestamp: Utc::now(),
            quick_replies: (!quick_replies.is_empty()).then_some(quick_replies),
            action,
        }
    }

    /// The path requested by a `navigate:` action, if any.
    pub fn navigation_target(&self) -> Option<&str> {
        self.action.as_deref()?.strip_prefix(NAVIGATE_PREFIX)
    }
}
