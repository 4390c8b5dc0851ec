//! Configuration file loading for codex-pilot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CODEX_PILOT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./codex-pilot.toml` or `./.codex-pilot.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/codex-pilot/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileCodexConfig, FileConfig, FileLoggingConfig, FileProjectConfig,
};
pub use loader::ConfigLoader;
