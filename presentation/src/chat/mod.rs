//! Interactive chat module
//!
//! Provides a reedline-based interactive session with Codex.

mod repl;
mod turn;

pub use repl::{ChatRepl, CommandResult};
pub use turn::{TurnWaiter, ends_turn, status_ends_turn, track_turns};
