//! Session identity learned from the remote agent.

/// Identifiers observed in one decoded line.
///
/// Produced by the protocol decoder and applied to [`SessionIdentity`] by
/// whoever owns it. Later assignments overwrite earlier ones, so feeding keys
/// in the order they were checked gives last-write-wins semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub session_id: Option<String>,
    pub conversation_id: Option<String>,
}

impl IdentityUpdate {
    pub fn is_empty(&self) -> bool {
        self.session_id.is_none() && self.conversation_id.is_none()
    }

    pub fn set_session_id(&mut self, id: impl Into<String>) {
        self.session_id = Some(id.into());
    }

    pub fn set_conversation_id(&mut self, id: impl Into<String>) {
        self.conversation_id = Some(id.into());
    }
}

/// How the next outbound prompt must be shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRoute {
    /// No session started yet: send the start-session call.
    Start,
    /// A session was started but the agent never reported its id.
    /// Recovered by sending the start-session call again.
    Restart,
    /// Reply within the known session.
    Continue {
        session_id: String,
        conversation_id: String,
    },
}

impl PromptRoute {
    pub fn is_start(&self) -> bool {
        matches!(self, PromptRoute::Start | PromptRoute::Restart)
    }
}

/// Opaque identifiers assigned by the agent plus the started flag (Entity).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity {
    session_id: Option<String>,
    conversation_id: Option<String>,
    started: bool,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Record identifiers from an update. Absent fields leave the current
    /// value untouched. Returns `true` when anything changed.
    pub fn apply(&mut self, update: IdentityUpdate) -> bool {
        let mut changed = false;
        if let Some(id) = update.session_id
            && self.session_id.as_deref() != Some(id.as_str())
        {
            self.session_id = Some(id);
            changed = true;
        }
        if let Some(id) = update.conversation_id
            && self.conversation_id.as_deref() != Some(id.as_str())
        {
            self.conversation_id = Some(id);
            changed = true;
        }
        changed
    }

    /// Mark that a start-session call has been written.
    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Forget everything (disconnect).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Decide the shape of the next prompt.
    ///
    /// `started == false` always routes to [`PromptRoute::Start`], even if
    /// stale identifiers are present. The conversation id falls back to the
    /// session id when the agent never reported one.
    pub fn route(&self) -> PromptRoute {
        if !self.started {
            return PromptRoute::Start;
        }
        match &self.session_id {
            None => PromptRoute::Restart,
            Some(session_id) => PromptRoute::Continue {
                session_id: session_id.clone(),
                conversation_id: self
                    .conversation_id
                    .clone()
                    .unwrap_or_else(|| session_id.clone()),
            },
        }
    }
}
