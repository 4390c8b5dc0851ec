//! JSON-RPC protocol types for `codex mcp-server`.
//!
//! The server speaks newline-delimited JSON-RPC 2.0 over stdio:
//!
//! - **Requests**: client → server, always `tools/call` naming either the
//!   `codex` tool (start a session) or `codex-reply` (continue one)
//! - **Responses**: server → client, `result` or `error`
//! - **Notifications**: server → client, `codex/event` carrying a `msg` object

use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// The only request method the client issues.
pub const TOOLS_CALL: &str = "tools/call";
/// Tool that starts a new session.
pub const START_TOOL: &str = "codex";
/// Tool that continues an existing session.
pub const REPLY_TOOL: &str = "codex-reply";
/// Notification method carrying agent events.
pub const EVENT_METHOD: &str = "codex/event";

/// Global request ID counter for JSON-RPC requests.
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique request ID.
fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: P,
}

impl<P: Serialize> JsonRpcRequest<P> {
    /// Creates a new JSON-RPC request with an auto-generated ID.
    pub fn new(method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_id(),
            method,
            params,
        }
    }

    /// Serialize as one wire line, newline included.
    pub fn encode_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// `params` of a `tools/call` request
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallParams<A> {
    pub name: &'static str,
    pub arguments: A,
}

/// Arguments of the `codex` tool
#[derive(Debug, Clone, Serialize)]
pub struct StartSessionArgs {
    pub prompt: String,
    pub sandbox: String,
    #[serde(rename = "approval-policy")]
    pub approval_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

/// Arguments of the `codex-reply` tool
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyArgs {
    pub session_id: String,
    pub conversation_id: String,
    pub prompt: String,
}

pub type StartSessionRequest = JsonRpcRequest<ToolCallParams<StartSessionArgs>>;
pub type ReplyRequest = JsonRpcRequest<ToolCallParams<ReplyArgs>>;

/// Build a `codex` start request.
pub fn start_session_request(
    prompt: String,
    sandbox: &str,
    approval_policy: &str,
    cwd: Option<&Path>,
) -> StartSessionRequest {
    JsonRpcRequest::new(
        TOOLS_CALL,
        ToolCallParams {
            name: START_TOOL,
            arguments: StartSessionArgs {
                prompt,
                sandbox: sandbox.to_string(),
                approval_policy: approval_policy.to_string(),
                cwd: cwd.map(|p| p.to_string_lossy().into_owned()),
            },
        },
    )
}

/// Build a `codex-reply` continue request.
pub fn reply_request(session_id: &str, conversation_id: &str, prompt: &str) -> ReplyRequest {
    JsonRpcRequest::new(
        TOOLS_CALL,
        ToolCallParams {
            name: REPLY_TOOL,
            arguments: ReplyArgs {
                session_id: session_id.to_string(),
                conversation_id: conversation_id.to_string(),
                prompt: prompt.to_string(),
            },
        },
    )
}

/// Classification of an incoming JSON-RPC line.
#[derive(Debug, PartialEq, Eq)]
pub enum Envelope<'a> {
    /// A `codex/event` notification.
    Event,
    /// Some other notification (e.g. MCP logging); carries no message.
    Notification { method: &'a str },
    /// A successful response (has `result`).
    Response,
    /// A failed response (has `error`).
    ErrorResponse,
    /// Neither shape.
    Unrecognized,
}

/// Classify a JSON-RPC message by inspecting `method`, `result` and `error`.
///
/// Pure function, called once per line by the decoder.
pub fn classify(json: &serde_json::Value) -> Envelope<'_> {
    if let Some(method) = json.get("method").and_then(|m| m.as_str()) {
        return if method == EVENT_METHOD {
            Envelope::Event
        } else {
            Envelope::Notification { method }
        };
    }
    if json.get("result").is_some() {
        Envelope::Response
    } else if json.get("error").is_some() {
        Envelope::ErrorResponse
    } else {
        Envelope::Unrecognized
    }
}
