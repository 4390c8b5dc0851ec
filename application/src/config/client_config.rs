//! Client parameters: which executable to run and which sandbox and approval
//! policy a new session requests.

use serde::{Deserialize, Serialize};

/// Subcommand that puts the agent into MCP server mode.
pub const MCP_SUBCOMMAND: &str = "mcp-server";

/// Parameters for [`AgentClient`](crate::ports::agent_client::AgentClient)
/// implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Program name or path of the agent executable.
    pub executable: String,
    /// Value of the `sandbox` argument on session start.
    pub sandbox: String,
    /// Value of the `approval-policy` argument on session start.
    pub approval_policy: String,
    /// Prepend the project preamble to the first prompt of a session.
    pub include_project_context: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            executable: "codex".to_string(),
            sandbox: "workspace-write".to_string(),
            approval_policy: "untrusted".to_string(),
            include_project_context: true,
        }
    }
}

impl ClientConfig {
    // ==================== Builder Methods ====================

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_sandbox(mut self, sandbox: impl Into<String>) -> Self {
        self.sandbox = sandbox.into();
        self
    }

    pub fn with_approval_policy(mut self, policy: impl Into<String>) -> Self {
        self.approval_policy = policy.into();
        self
    }

    pub fn with_project_context(mut self, include: bool) -> Self {
        self.include_project_context = include;
        self
    }
}
