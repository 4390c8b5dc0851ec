//! Infrastructure layer for codex-pilot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod codex;
pub mod config;
pub mod context;

// Re-export commonly used types
pub use codex::{
    client::CodexClient,
    decoder::{Decoded, decode_line, try_decode_line},
    error::{CodexError, DecodeError, Result},
    process::CodexLauncher,
};
pub use config::{
    ConfigLoader, ConfigValidationError, FileCodexConfig, FileConfig, FileLoggingConfig,
    FileProjectConfig,
};
pub use context::LocalProjectInfo;
