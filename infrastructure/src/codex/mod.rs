//! Codex MCP adapter
//!
//! Implements [`AgentLauncher`](pilot_application::AgentLauncher) and
//! [`AgentClient`](pilot_application::AgentClient) for `codex mcp-server`.

pub mod client;
pub mod decoder;
pub mod error;
pub mod process;
pub mod protocol;
mod reader;
pub mod session;
mod supervisor;
