//! The one lock around a client's [`SessionState`].

use pilot_domain::SessionState;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the client's session state.
///
/// The client and its line reader each hold a clone. Every read-modify-write
/// happens inside a single `lock()` so the two never interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }
}
