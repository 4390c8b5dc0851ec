//! Agent process port
//!
//! Defines how the client obtains a running agent: a launcher spawns the
//! process and hands back its byte streams plus a handle to terminate it.
//! The real adapter spawns `codex mcp-server`; tests plug in in-memory pipes.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

/// Byte stream produced by the agent.
pub type AgentOutput = Box<dyn AsyncRead + Send + Unpin>;

/// Byte stream consumed by the agent.
pub type AgentInput = Box<dyn AsyncWrite + Send + Unpin>;

/// Errors that can occur while launching the agent
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Executable not found: {program}")]
    NotFound { program: String },

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Agent process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// Handle to a running agent process.
#[async_trait]
pub trait AgentProcess: Send {
    /// OS process id, when there is one.
    fn id(&self) -> Option<u32>;

    /// Forcibly terminate the process and reap it.
    async fn terminate(&mut self) -> io::Result<()>;
}

/// Streams and handle of a freshly launched agent.
pub struct AgentStreams {
    /// Protocol output (stdout).
    pub output: AgentOutput,
    /// Diagnostic output (stderr), merged line-wise into `output` by the reader.
    pub diagnostics: Option<AgentOutput>,
    /// Protocol input (stdin).
    pub input: AgentInput,
    pub process: Box<dyn AgentProcess>,
}

/// Spawns agent processes.
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait AgentLauncher: Send + Sync {
    /// Start the agent, using `working_dir` as its current directory when given.
    async fn launch(&self, working_dir: Option<&Path>) -> Result<AgentStreams, LaunchError>;
}
