//! Error types for the Codex adapter

use pilot_application::LaunchError;
use thiserror::Error;

/// Result type alias for Codex operations
pub type Result<T> = std::result::Result<T, CodexError>;

/// Errors that can occur when talking to `codex mcp-server`
#[derive(Error, Debug)]
pub enum CodexError {
    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a single inbound line produced nothing.
///
/// None of these stop the reader; the line is logged and skipped.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("line is not a JSON object")]
    NotAnObject,

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    #[error("malformed {event_type} event: {source}")]
    MalformedEvent {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("unrecognized message shape")]
    Unrecognized,
}
