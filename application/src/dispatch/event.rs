//! Events flowing from the client to its observers.

use pilot_domain::Message;
use tokio::sync::mpsc;
use tracing::trace;

/// Something observers should hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A decoded message from the agent (or a locally produced error).
    Message(Message),
    /// A human-readable status line, e.g. "Connected to Codex".
    Status(String),
}

/// Producer side of the event channel.
///
/// Cheap to clone; the reader task and the client each hold one. Sending
/// never blocks, and events sent after the pump is gone are dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: ClientEvent) {
        if self.tx.send(event).is_err() {
            trace!("event pump closed, dropping event");
        }
    }

    pub fn message(&self, message: Message) {
        self.send(ClientEvent::Message(message));
    }

    pub fn status(&self, status: impl Into<String>) {
        self.send(ClientEvent::Status(status.into()));
    }
}
