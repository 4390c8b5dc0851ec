//! Observer registry with unsubscribe-on-drop handles.

use pilot_domain::Message;
use std::sync::{Arc, Mutex, Weak};

type MessageObserver = Arc<dyn Fn(&Message) + Send + Sync>;
type StatusObserver = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    messages: Vec<(u64, MessageObserver)>,
    statuses: Vec<(u64, StatusObserver)>,
}

impl Registry {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove(&mut self, id: u64) {
        self.messages.retain(|(i, _)| *i != id);
        self.statuses.retain(|(i, _)| *i != id);
    }
}

/// Registered message and status observers.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct Observers {
    inner: Arc<Mutex<Registry>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe every decoded message.
    pub fn on_message<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.allocate();
        registry.messages.push((id, Arc::new(observer)));
        self.subscription(id)
    }

    /// Observe every status update.
    pub fn on_status<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.allocate();
        registry.statuses.push((id, Arc::new(observer)));
        self.subscription(id)
    }

    pub fn message_observer_count(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn status_observer_count(&self) -> usize {
        self.lock().statuses.len()
    }

    pub(crate) fn notify_message(&self, message: &Message) {
        // Snapshot so observers may (un)subscribe from inside a callback.
        let observers: Vec<MessageObserver> = self
            .lock()
            .messages
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in observers {
            observer(message);
        }
    }

    pub(crate) fn notify_status(&self, status: &str) {
        let observers: Vec<StatusObserver> = self
            .lock()
            .statuses
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in observers {
            observer(status);
        }
    }

    fn subscription(&self, id: u64) -> Subscription {
        Subscription {
            registry: Arc::downgrade(&self.inner),
            id,
            detached: false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keeps an observer registered.
///
/// Dropping the handle unsubscribes; [`Subscription::detach`] keeps the
/// observer for as long as the registry lives.
#[must_use = "dropping a Subscription unsubscribes the observer immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
    detached: bool,
}

impl Subscription {
    pub fn detach(mut self) {
        self.detached = true;
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("detached", &self.detached)
            .finish()
    }
}
