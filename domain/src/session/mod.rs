//! Session domain.
//!
//! - [`connection::ConnectionState`] - disconnected / connecting / connected
//! - [`identity::SessionIdentity`] - identifiers assigned by the agent and the started flag
//! - [`identity::PromptRoute`] - start vs. continue decision for the next prompt
//! - [`state::SessionState`] - the single state value a client owns

pub mod connection;
pub mod identity;
pub mod state;
