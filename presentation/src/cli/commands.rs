//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for codex-pilot
#[derive(Parser, Debug)]
#[command(name = "codex-pilot")]
#[command(author, version, about = "Drive a Codex agent session from the terminal")]
#[command(long_about = r#"
codex-pilot starts `codex mcp-server`, opens a task session with your first
prompt and continues the same session with every prompt after that.

The first prompt of a session is prefixed with a short description of the
project (name, type, key files) unless --no-context is given.

Configuration files are loaded from (in priority order):
1. CODEX_PILOT_* environment variables (e.g. CODEX_PILOT_CODEX__EXECUTABLE)
2. --config <path>          Explicit config file
3. ./codex-pilot.toml       Project-level config
4. ~/.config/codex-pilot/config.toml   Global config

Example:
  codex-pilot
  codex-pilot -C ~/src/app --prompt "Add tests for the parser"
  codex-pilot --codex /opt/codex/bin/codex -vv
"#)]
pub struct Cli {
    /// Prompt to send as soon as the session is up
    #[arg(short, long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Project directory (agent working directory, defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Codex executable to launch
    #[arg(long, value_name = "PROGRAM")]
    pub codex: Option<String>,

    /// Do not prefix the first prompt with project context
    #[arg(long)]
    pub no_context: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
