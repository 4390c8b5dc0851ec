//! Agent client port
//!
//! The surface a host (REPL, editor plugin, ...) uses to drive an agent
//! session. Decoded output does not come back through these methods; it is
//! delivered through the [`EventDispatcher`](crate::dispatch) observers.

use async_trait::async_trait;
use pilot_domain::{ConnectionState, SessionIdentity};
use thiserror::Error;

/// Errors surfaced to the host by [`AgentClient::connect`]
#[derive(Error, Debug)]
pub enum AgentClientError {
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Drives one agent subprocess and its task session.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Ensure the agent is running. Idempotent while connected.
    async fn connect(&self) -> Result<(), AgentClientError>;

    /// Stop the agent and forget the session. Never fails.
    async fn disconnect(&self);

    /// Send a prompt, connecting first if needed.
    ///
    /// Failures are logged and reported as status updates, not returned.
    async fn send_message(&self, prompt: &str);

    fn connection_state(&self) -> ConnectionState;

    /// Snapshot of the identifiers learned so far.
    fn session_identity(&self) -> SessionIdentity;
}
