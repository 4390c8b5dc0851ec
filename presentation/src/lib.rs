//! Presentation layer for codex-pilot
//!
//! This crate contains the CLI definition, console rendering of agent
//! output, and the interactive chat REPL.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatRepl, TurnWaiter, track_turns};
pub use cli::commands::Cli;
pub use output::console::ConsoleRenderer;
