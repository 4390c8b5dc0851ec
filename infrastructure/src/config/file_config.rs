//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! [`FileConfig::to_client_config`] turns them into the application-level
//! [`ClientConfig`].

use pilot_application::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("codex.executable cannot be empty")]
    EmptyExecutable,

    #[error("codex.sandbox cannot be empty")]
    EmptySandbox,

    #[error("codex.approval_policy cannot be empty")]
    EmptyApprovalPolicy,
}

/// Raw `[codex]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCodexConfig {
    /// Program name or path of the Codex CLI
    pub executable: String,
    /// Sandbox mode requested when a session starts
    pub sandbox: String,
    /// Approval policy requested when a session starts
    pub approval_policy: String,
    /// Prepend the project preamble to the first prompt
    pub include_project_context: bool,
}

impl Default for FileCodexConfig {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            executable: defaults.executable,
            sandbox: defaults.sandbox,
            approval_policy: defaults.approval_policy,
            include_project_context: defaults.include_project_context,
        }
    }
}

/// Raw `[project]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProjectConfig {
    /// Overrides the detected project root
    pub root: Option<PathBuf>,
}

/// Raw `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"pilot_infrastructure=trace"`
    pub level: Option<String>,
    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub codex: FileCodexConfig,
    pub project: FileProjectConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.codex.executable.trim().is_empty() {
            return Err(ConfigValidationError::EmptyExecutable);
        }
        if self.codex.sandbox.trim().is_empty() {
            return Err(ConfigValidationError::EmptySandbox);
        }
        if self.codex.approval_policy.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApprovalPolicy);
        }
        Ok(())
    }

    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_executable(self.codex.executable.trim())
            .with_sandbox(self.codex.sandbox.trim())
            .with_approval_policy(self.codex.approval_policy.trim())
            .with_project_context(self.codex.include_project_context)
    }
}
