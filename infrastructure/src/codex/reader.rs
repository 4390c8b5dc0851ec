//! Background line reader for one Codex connection.
//!
//! Reads stdout (and stderr, merged line-wise) until the stream ends, an I/O
//! error occurs, or the connection's [`CancellationToken`] fires. Only the
//! first two are reported to observers; cancellation is silent.
//!
//! Lines are split on raw bytes and decoded lossily, so output that is not
//! valid UTF-8 costs one line, not the connection.

use crate::codex::decoder::decode_line;
use crate::codex::session::SharedSession;
use pilot_application::{AgentOutput, EventSink};
use pilot_domain::Message;
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

/// Newline-delimited reader over one agent pipe.
///
/// Partial lines stay in `buf` when a read is cancelled by `select!`, so the
/// next call picks up where the last one stopped.
struct RawLines {
    reader: BufReader<AgentOutput>,
    buf: Vec<u8>,
}

impl RawLines {
    fn new(output: AgentOutput) -> Self {
        Self {
            reader: BufReader::new(output),
            buf: Vec::new(),
        }
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 && self.buf.is_empty() {
            return Ok(None);
        }
        let mut line = std::mem::take(&mut self.buf);
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        Ok(Some(match String::from_utf8(line) {
            Ok(text) => text,
            Err(e) => {
                debug!("Replacing invalid UTF-8 in Codex output line");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        }))
    }
}

pub(crate) struct LineReader {
    session: SharedSession,
    events: EventSink,
    cancel: CancellationToken,
}

impl LineReader {
    pub(crate) fn new(
        session: SharedSession,
        events: EventSink,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session,
            events,
            cancel,
        }
    }

    pub(crate) async fn run(self, output: AgentOutput, diagnostics: Option<AgentOutput>) {
        let mut lines = RawLines::new(output);
        let mut diagnostics = diagnostics.map(RawLines::new);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Line reader cancelled");
                    return;
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => self.handle_line(&line),
                    Ok(None) => {
                        self.fail("Codex closed its output stream");
                        return;
                    }
                    Err(e) => {
                        self.fail(&e.to_string());
                        return;
                    }
                },
                line = next_diagnostic(&mut diagnostics) => match line {
                    Ok(Some(line)) => self.handle_diagnostic(&line),
                    Ok(None) => {
                        trace!("Codex stderr closed");
                        diagnostics = None;
                    }
                    Err(e) => {
                        debug!("Codex stderr read failed: {}", e);
                        diagnostics = None;
                    }
                },
            }
        }
    }

    fn handle_line(&self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let decoded = decode_line(line);
        if !decoded.identity.is_empty() {
            let mut session = self.session.lock();
            if session.learn(decoded.identity) {
                debug!(
                    "Session identity now session_id={:?} conversation_id={:?}",
                    session.identity().session_id(),
                    session.identity().conversation_id()
                );
            }
        }
        if let Some(message) = decoded.message {
            self.events.message(message);
        }
    }

    /// stderr carries protocol lines only by accident; plain log output is
    /// kept out of the decoder.
    fn handle_diagnostic(&self, line: &str) {
        if line.trim_start().starts_with('{') {
            self.handle_line(line);
        } else if !line.trim().is_empty() {
            debug!("codex stderr: {}", line);
        }
    }

    fn fail(&self, reason: &str) {
        if self.cancel.is_cancelled() {
            return;
        }
        error!("Error reading from Codex MCP: {}", reason);
        self.session.lock().connection_lost();
        self.events.status(format!("Error: {reason}"));
        self.events
            .message(Message::error(format!("Connection error: {reason}")));
    }
}

async fn next_diagnostic(diagnostics: &mut Option<RawLines>) -> io::Result<Option<String>> {
    match diagnostics {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_application::{ClientEvent, EventPump, event_channel};
    use pilot_domain::{ConnectionState, MessageKind};
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, DuplexStream, duplex};

    struct Harness {
        session: SharedSession,
        pump: EventPump,
        cancel: CancellationToken,
        stdout: DuplexStream,
        stderr: DuplexStream,
        task: tokio::task::JoinHandle<()>,
    }

    fn start() -> Harness {
        let (sink, pump) = event_channel();
        let session = SharedSession::new();
        {
            let mut state = session.lock();
            state.begin_connecting();
            state.connection_established();
        }
        let cancel = CancellationToken::new();
        let (stdout, agent_out) = duplex(4096);
        let (stderr, agent_err) = duplex(4096);
        let reader = LineReader::new(session.clone(), sink, cancel.clone());
        let task = tokio::spawn(reader.run(Box::new(agent_out), Some(Box::new(agent_err))));
        Harness {
            session,
            pump,
            cancel,
            stdout,
            stderr,
            task,
        }
    }

    fn collect(pump: &mut EventPump) -> Vec<ClientEvent> {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let (m, s) = (seen.clone(), seen.clone());
        let observers = pump.observers();
        let _a = observers.on_message(move |msg| {
            m.lock().unwrap().push(ClientEvent::Message(msg.clone()))
        });
        let _b = observers.on_status(move |st| {
            s.lock().unwrap().push(ClientEvent::Status(st.to_string()))
        });
        pump.drain();
        let out = seen.lock().unwrap().clone();
        out
    }

    async fn wait_for_session(session: &SharedSession, id: &str) {
        let learned = async {
            while session.snapshot().identity().session_id() != Some(id) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), learned)
            .await
            .expect("session id never learned");
    }

    #[tokio::test]
    async fn test_decodes_lines_and_learns_identity() {
        let mut h = start();
        h.stdout
            .write_all(
                b"\n{\"method\":\"codex/event\",\"params\":{\"msg\":{\"type\":\"agent_message\",\"message\":\"Hi\",\"session_id\":\"s1\"}}}\n",
            )
            .await
            .unwrap();
        wait_for_session(&h.session, "s1").await;
        h.cancel.cancel();
        h.task.await.unwrap();

        let events = collect(&mut h.pump);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ClientEvent::Message(m) => assert_eq!(m.content(), "Hi"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_line_does_not_stop_reading() {
        let mut h = start();
        h.stdout.write_all(b"{oops\n").await.unwrap();
        h.stdout
            .write_all(b"{\"method\":\"codex/event\",\"params\":{\"msg\":{\"type\":\"task_complete\"}}}\n")
            .await
            .unwrap();
        drop(h.stdout);
        h.task.await.unwrap();

        let events = collect(&mut h.pump);
        assert!(matches!(&events[0], ClientEvent::Message(m) if m.content() == "Task completed"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_reading() {
        let mut h = start();
        h.stdout.write_all(b"\xff\xfe not utf8\n").await.unwrap();
        h.stdout
            .write_all(
                b"{\"method\":\"codex/event\",\"params\":{\"msg\":{\"type\":\"agent_message\",\"message\":\"after\",\"session_id\":\"s1\"}}}\r\n",
            )
            .await
            .unwrap();
        wait_for_session(&h.session, "s1").await;
        assert!(h.session.snapshot().is_connected());
        h.cancel.cancel();
        h.task.await.unwrap();

        let events = collect(&mut h.pump);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ClientEvent::Message(m) if m.content() == "after"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_on_stderr_is_skipped() {
        let mut h = start();
        h.stderr.write_all(b"warn \xc3\x28 bad byte\n").await.unwrap();
        h.stderr
            .write_all(b"{\"method\":\"codex/event\",\"params\":{\"msg\":{\"type\":\"task_started\",\"session_id\":\"s2\"}}}\n")
            .await
            .unwrap();
        wait_for_session(&h.session, "s2").await;
        assert!(h.session.snapshot().is_connected());
    }

    #[tokio::test]
    async fn test_end_of_stream_reports_error_and_drops_session() {
        let mut h = start();
        h.session.lock().mark_started();
        drop(h.stdout);
        h.task.await.unwrap();

        let events = collect(&mut h.pump);
        assert_eq!(
            events[0],
            ClientEvent::Status("Error: Codex closed its output stream".to_string())
        );
        match &events[1] {
            ClientEvent::Message(m) => {
                assert_eq!(m.kind(), MessageKind::Error);
                assert_eq!(m.content(), "Connection error: Codex closed its output stream");
            }
            other => panic!("unexpected {other:?}"),
        }
        let state = h.session.snapshot();
        assert_eq!(state.connection(), ConnectionState::Disconnected);
        assert!(!state.identity().is_started());
    }

    #[tokio::test]
    async fn test_cancellation_is_silent() {
        let mut h = start();
        h.cancel.cancel();
        h.task.await.unwrap();

        assert!(collect(&mut h.pump).is_empty());
        assert!(h.session.snapshot().is_connected());
    }

    #[tokio::test]
    async fn test_stderr_json_is_decoded_and_closing_it_is_harmless() {
        let mut h = start();
        h.stderr.write_all(b"2024-01-01 INFO starting\n").await.unwrap();
        h.stderr
            .write_all(b"{\"method\":\"codex/event\",\"params\":{\"msg\":{\"type\":\"task_started\",\"session_id\":\"from-stderr\"}}}\n")
            .await
            .unwrap();
        wait_for_session(&h.session, "from-stderr").await;
        drop(h.stderr);

        h.stdout
            .write_all(b"{\"method\":\"codex/event\",\"params\":{\"msg\":{\"type\":\"turn_aborted\",\"session_id\":\"from-stdout\"}}}\n")
            .await
            .unwrap();
        wait_for_session(&h.session, "from-stdout").await;
        assert!(h.session.snapshot().is_connected());
        h.cancel.cancel();
        h.task.await.unwrap();

        let contents: Vec<String> = collect(&mut h.pump)
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::Message(m) => Some(m.into_content()),
                ClientEvent::Status(_) => None,
            })
            .collect();
        assert_eq!(contents, vec!["Task started", "Turn aborted"]);
    }
}
