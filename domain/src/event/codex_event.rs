//! Typed `codex/event` payloads.
//!
//! Each notification carries `params.msg` with a `type` discriminator. The
//! enum below is matched exhaustively by the taxonomy; anything the agent
//! emits that is not listed lands in [`CodexEvent::Unrecognized`].

use serde::Deserialize;
use serde_json::{Map, Value};

/// A command as reported by the agent: either an argv array or a shell string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    Argv(Vec<String>),
    Shell(String),
}

impl CommandLine {
    /// Render for display; argv elements are joined with single spaces.
    pub fn render(&self) -> String {
        match self {
            CommandLine::Argv(parts) => parts.join(" "),
            CommandLine::Shell(command) => command.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecCommandBegin {
    pub command: Option<CommandLine>,
    pub call_id: Option<String>,
    pub cwd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecCommandEnd {
    pub output: Option<String>,
    pub error: Option<String>,
    pub success: Option<bool>,
    pub call_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecApprovalRequest {
    pub codex_command: Option<Vec<String>>,
    pub command: Option<CommandLine>,
    pub codex_call_id: Option<String>,
    pub call_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PatchApplyBegin {
    pub changes: Option<Map<String, Value>>,
    pub call_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PatchApplyEnd {
    pub success: Option<bool>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub call_id: Option<String>,
}

/// One `msg` body of a `codex/event` notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodexEvent {
    AgentMessage {
        message: Option<String>,
    },
    ExecCommandBegin(ExecCommandBegin),
    ExecCommandEnd(ExecCommandEnd),
    AgentReasoning {
        text: Option<String>,
    },
    AgentReasoningDelta {
        delta: Option<String>,
    },
    TaskStarted,
    TaskComplete,
    TurnAborted,
    ExecApprovalRequest(ExecApprovalRequest),
    PatchApplyBegin(PatchApplyBegin),
    PatchApplyEnd(PatchApplyEnd),
    AgentReasoningSectionBreak,
    TurnDiff,
    TokenCount,
    #[serde(other)]
    Unrecognized,
}

impl CodexEvent {
    /// Parse a `msg` object.
    pub fn from_msg(msg: Value) -> serde_json::Result<Self> {
        serde_json::from_value(msg)
    }
}
