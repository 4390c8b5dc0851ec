//! Single-consumer delivery of client events to observers.

use super::event::{ClientEvent, EventSink};
use super::observers::Observers;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Create a connected sink/pump pair.
///
/// The sink goes to the client; the pump stays with the host, which drives
/// it from exactly one task so observers never run concurrently.
pub fn event_channel() -> (EventSink, EventPump) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        EventSink::new(tx),
        EventPump {
            rx,
            observers: Observers::new(),
        },
    )
}

/// Consumer side of the event channel.
pub struct EventPump {
    rx: mpsc::UnboundedReceiver<ClientEvent>,
    observers: Observers,
}

impl EventPump {
    /// Registry handle for subscribing before (or while) the pump runs.
    pub fn observers(&self) -> Observers {
        self.observers.clone()
    }

    /// Deliver events in arrival order until cancelled or every sink is gone.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("event pump cancelled");
                    break;
                }
                event = self.rx.recv() => match event {
                    Some(event) => self.deliver(&event),
                    None => {
                        debug!("all event sinks dropped, pump exiting");
                        break;
                    }
                }
            }
        }
    }

    /// Deliver whatever is queued right now without waiting.
    ///
    /// Returns the number of events delivered.
    pub fn drain(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.deliver(&event);
            delivered += 1;
        }
        delivered
    }

    fn deliver(&self, event: &ClientEvent) {
        match event {
            ClientEvent::Message(message) => self.observers.notify_message(message),
            ClientEvent::Status(status) => self.observers.notify_status(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_domain::{Message, MessageKind};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_drain_delivers_in_order() {
        let (sink, mut pump) = event_channel();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (m, s) = (Arc::clone(&seen), Arc::clone(&seen));
        let observers = pump.observers();
        let _a = observers.on_message(move |msg| m.lock().unwrap().push(msg.content().to_string()));
        let _b = observers.on_status(move |st| s.lock().unwrap().push(format!("[{st}]")));

        sink.status("Connecting to Codex...");
        sink.message(Message::assistant("one"));
        sink.message(Message::assistant("two"));

        assert_eq!(pump.drain(), 3);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["[Connecting to Codex...]", "one", "two"]
        );
        assert_eq!(pump.drain(), 0);
    }

    #[test]
    fn test_sink_outlives_pump() {
        let (sink, pump) = event_channel();
        drop(pump);
        sink.status("nobody listening");
    }

    #[tokio::test]
    async fn test_run_stops_when_sinks_dropped() {
        let (sink, pump) = event_channel();
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let k = Arc::clone(&kinds);
        pump.observers()
            .on_message(move |msg| k.lock().unwrap().push(msg.kind()))
            .detach();

        sink.message(Message::error("boom"));
        drop(sink);

        pump.run(CancellationToken::new()).await;
        assert_eq!(*kinds.lock().unwrap(), vec![MessageKind::Error]);
    }

    #[tokio::test]
    async fn test_spawned_run_flushes_queue_after_last_sink_drops() {
        let (sink, pump) = event_channel();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        pump.observers()
            .on_status(move |st| s.lock().unwrap().push(st.to_string()))
            .detach();
        let handle = tokio::spawn(pump.run(CancellationToken::new()));

        let second = sink.clone();
        sink.status("Connected to Codex");
        drop(sink);
        second.status("Disconnected");
        drop(second);

        handle.await.unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["Connected to Codex", "Disconnected"]
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let (_sink, pump) = event_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(pump.run(cancel.clone()));
        cancel.cancel();
        handle.await.unwrap();
    }
}
