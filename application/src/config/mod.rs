//! Application-level configuration.
//!
//! [`ClientConfig`] holds the knobs that shape how the client launches the
//! agent and what it asks for when a session starts.

pub mod client_config;

pub use client_config::{ClientConfig, MCP_SUBCOMMAND};
