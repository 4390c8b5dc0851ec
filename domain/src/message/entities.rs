//! Message entities shown to the presentation layer.

use super::metadata::Metadata;
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a [`Message`].
///
/// Events the taxonomy drops (section breaks, diffs, token counts,
/// unrecognized types) never become a `Message`, so there is no variant
/// for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    /// The user's own prompt, echoed by the host.
    User,
    /// Text produced by the agent.
    Assistant,
    /// The agent is running (or asking to run) a command or patch.
    ToolCall,
    /// Outcome of a command or patch.
    ToolResult,
    /// Summarised reasoning.
    Reasoning,
    /// Raw streaming reasoning fragment.
    ReasoningDelta,
    /// Task lifecycle notice.
    Status,
    /// Connection or stream failure.
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::ToolCall => "tool-call",
            MessageKind::ToolResult => "tool-result",
            MessageKind::Reasoning => "reasoning",
            MessageKind::ReasoningDelta => "reasoning-delta",
            MessageKind::Status => "status",
            MessageKind::Error => "error",
        }
    }

    /// Whether messages of this kind may carry [`Metadata`].
    pub fn carries_metadata(&self) -> bool {
        matches!(self, MessageKind::ToolCall | MessageKind::ToolResult)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageKind::User),
            "assistant" => Ok(MessageKind::Assistant),
            "tool-call" => Ok(MessageKind::ToolCall),
            "tool-result" => Ok(MessageKind::ToolResult),
            "reasoning" => Ok(MessageKind::Reasoning),
            "reasoning-delta" => Ok(MessageKind::ReasoningDelta),
            "status" => Ok(MessageKind::Status),
            "error" => Ok(MessageKind::Error),
            other => Err(DomainError::UnknownMessageKind(other.to_string())),
        }
    }
}

/// A single displayable message (Entity).
///
/// `metadata` is only ever set through [`Message::tool_call`] and
/// [`Message::tool_result`], so it stays `None` for every other kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    kind: MessageKind,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl Message {
    fn plain(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::Assistant, content)
    }

    pub fn reasoning(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::Reasoning, content)
    }

    pub fn reasoning_delta(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::ReasoningDelta, content)
    }

    pub fn status(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::Status, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::Error, content)
    }

    pub fn tool_call(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            metadata: Some(metadata),
            ..Self::plain(MessageKind::ToolCall, content)
        }
    }

    pub fn tool_result(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            metadata: Some(metadata),
            ..Self::plain(MessageKind::ToolResult, content)
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn into_content(self) -> String {
        self.content
    }
}
