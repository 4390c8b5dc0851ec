//! Knowing when the agent is done with a prompt.
//!
//! The REPL waits between prompts until the turn ends, so agent output does
//! not interleave with the line editor.

use pilot_application::Observers;
use pilot_domain::{Message, MessageKind, TASK_COMPLETED, TURN_ABORTED};
use std::sync::Arc;
use tokio::sync::watch;

/// Whether a message closes the current turn.
pub fn ends_turn(message: &Message) -> bool {
    match message.kind() {
        MessageKind::Error => true,
        MessageKind::Status => matches!(message.content(), TASK_COMPLETED | TURN_ABORTED),
        _ => false,
    }
}

/// Whether a client status closes the current turn (the prompt never got
/// to the agent).
pub fn status_ends_turn(status: &str) -> bool {
    status.starts_with("Failed to") || status.starts_with("Error:")
}

/// Counts finished turns.
pub struct TurnWaiter {
    rx: watch::Receiver<u64>,
}

impl TurnWaiter {
    /// Forget turns that ended before now.
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }

    /// Wait for the next turn end. Returns `false` if tracking stopped.
    pub async fn wait(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Register observers that count turn ends for the lifetime of `observers`.
pub fn track_turns(observers: &Observers) -> TurnWaiter {
    let (tx, rx) = watch::channel(0u64);
    let tx = Arc::new(tx);

    let on_message = Arc::clone(&tx);
    observers
        .on_message(move |message| {
            if ends_turn(message) {
                on_message.send_modify(|n| *n += 1);
            }
        })
        .detach();
    observers
        .on_status(move |status| {
            if status_ends_turn(status) {
                tx.send_modify(|n| *n += 1);
            }
        })
        .detach();

    TurnWaiter { rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_application::event_channel;
    use std::time::Duration;

    #[test]
    fn test_turn_end_detection() {
        assert!(ends_turn(&Message::status(TASK_COMPLETED)));
        assert!(ends_turn(&Message::status(TURN_ABORTED)));
        assert!(ends_turn(&Message::error("Connection error: eof")));
        assert!(!ends_turn(&Message::status("Task started")));
        assert!(!ends_turn(&Message::assistant(TASK_COMPLETED)));

        assert!(status_ends_turn("Failed to connect: nope"));
        assert!(status_ends_turn("Error: broken pipe"));
        assert!(!status_ends_turn("Connected to Codex"));
    }

    #[tokio::test]
    async fn test_waiter_sees_new_turn_end_only() {
        let (sink, mut pump) = event_channel();
        let mut waiter = track_turns(&pump.observers());

        sink.message(Message::status(TASK_COMPLETED));
        pump.drain();
        waiter.mark_seen();

        let early = tokio::time::timeout(Duration::from_millis(20), waiter.wait()).await;
        assert!(early.is_err());

        sink.status("Failed to start session: broken pipe");
        pump.drain();
        assert!(waiter.wait().await);
    }
}
