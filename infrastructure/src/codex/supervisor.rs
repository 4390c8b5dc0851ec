//! One live connection to a Codex process: its input writer, its reader task
//! and the process handle.

use crate::codex::reader::LineReader;
use crate::codex::session::SharedSession;
use pilot_application::{AgentInput, AgentProcess, AgentStreams, EventSink};
use std::io;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub(crate) struct AgentConnection {
    writer: BufWriter<AgentInput>,
    process: Box<dyn AgentProcess>,
    cancel: CancellationToken,
    reader: JoinHandle<()>,
}

impl AgentConnection {
    /// Take ownership of freshly launched streams and start reading.
    pub(crate) fn open(streams: AgentStreams, session: SharedSession, events: EventSink) -> Self {
        let AgentStreams {
            output,
            diagnostics,
            input,
            process,
        } = streams;
        let cancel = CancellationToken::new();
        let reader = LineReader::new(session, events, cancel.clone());
        let reader = tokio::spawn(reader.run(output, diagnostics));

        Self {
            writer: BufWriter::new(input),
            process,
            cancel,
            reader,
        }
    }

    /// Write one already-terminated line and flush it.
    pub(crate) async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await
    }

    /// Stop reading, close stdin and kill the process.
    ///
    /// Returns once the reader task has exited, so no event from this
    /// connection is emitted afterwards.
    pub(crate) async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Err(e) = self.writer.shutdown().await {
            debug!("Closing Codex stdin failed: {}", e);
        }
        if let Err(e) = self.process.terminate().await {
            debug!("Terminating Codex process failed: {}", e);
        }
        if let Err(e) = (&mut self.reader).await {
            debug!("Line reader task ended abnormally: {}", e);
        }
    }
}

impl Drop for AgentConnection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
