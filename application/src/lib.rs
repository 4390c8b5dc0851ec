//! Application layer for codex-pilot
//!
//! This crate contains port definitions, event dispatch and client configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod dispatch;
pub mod ports;

// Re-export commonly used types
pub use config::{ClientConfig, MCP_SUBCOMMAND};
pub use dispatch::{ClientEvent, EventPump, EventSink, Observers, Subscription, event_channel};
pub use ports::{
    agent_client::{AgentClient, AgentClientError},
    agent_process::{
        AgentInput, AgentLauncher, AgentOutput, AgentProcess, AgentStreams, LaunchError,
    },
    project_info::{ProjectInfoProvider, StaticProjectInfo},
};
