//! Codex event domain.
//!
//! - [`codex_event::CodexEvent`] - typed body of a `codex/event` notification
//! - [`taxonomy`] - the fixed mapping from events to [`Message`](crate::Message)s

pub mod codex_event;
pub mod taxonomy;
