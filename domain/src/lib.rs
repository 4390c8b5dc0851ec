//! Domain layer for codex-pilot
//!
//! This crate contains the core vocabulary of the Codex session client.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Messages
//!
//! Everything the agent reports is reduced to a [`Message`] of a fixed
//! [`MessageKind`]. Tool calls and results carry structured [`Metadata`].
//!
//! ## Event taxonomy
//!
//! `codex/event` notifications are parsed into the exhaustive [`CodexEvent`]
//! enum and mapped to zero or one message by [`CodexEvent::into_message`].
//!
//! ## Sessions
//!
//! A [`SessionState`] tracks the [`ConnectionState`] and the
//! [`SessionIdentity`] learned from the agent, and decides whether the next
//! prompt starts a session or continues one ([`PromptRoute`]).

pub mod context;
pub mod core;
pub mod event;
pub mod message;
pub mod session;

// Re-export commonly used types
pub use context::{ProjectContext, ProjectKind, ProjectSummary};
pub use self::core::error::DomainError;
pub use event::codex_event::{CodexEvent, CommandLine};
pub use event::taxonomy::{
    REASONING_PREVIEW_CHARS, TASK_COMPLETED, TASK_STARTED, TURN_ABORTED, preview_reasoning,
};
pub use message::{
    entities::{Message, MessageKind},
    metadata::{Metadata, MetadataValue, keys as metadata_keys},
};
pub use session::{
    connection::ConnectionState,
    identity::{IdentityUpdate, PromptRoute, SessionIdentity},
    state::SessionState,
};
