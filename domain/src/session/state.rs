//! Combined session + connection state owned by one client.

use super::connection::ConnectionState;
use super::identity::{IdentityUpdate, PromptRoute, SessionIdentity};

/// Everything the client tracks about its agent (Aggregate).
///
/// A client keeps exactly one of these behind a single lock; both the
/// sending side and the line reader mutate it only through these methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    connection: ConnectionState,
    identity: SessionIdentity,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Disconnected → Connecting. Returns `false` when already connected.
    pub fn begin_connecting(&mut self) -> bool {
        if self.connection.is_connected() {
            return false;
        }
        self.connection = ConnectionState::Connecting;
        true
    }

    /// Connecting → Connected.
    pub fn connection_established(&mut self) {
        self.connection = ConnectionState::Connected;
    }

    /// Connecting → Disconnected after a failed spawn.
    pub fn connection_failed(&mut self) {
        self.connection = ConnectionState::Disconnected;
    }

    /// The agent's output ended or failed while connected.
    ///
    /// The remote session died with the process, so its identifiers are
    /// dropped as well; the next prompt starts a new session.
    pub fn connection_lost(&mut self) {
        self.connection = ConnectionState::Disconnected;
        self.identity.clear();
    }

    /// Explicit disconnect: back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn learn(&mut self, update: IdentityUpdate) -> bool {
        self.identity.apply(update)
    }

    /// Record that the start request went out.
    ///
    /// Ignored (returns `false`) once the connection is gone: a session
    /// started on a dead process must not be continued.
    pub fn mark_started(&mut self) -> bool {
        if !self.connection.is_connected() {
            return false;
        }
        self.identity.mark_started();
        true
    }

    pub fn route(&self) -> PromptRoute {
        self.identity.route()
    }
}
