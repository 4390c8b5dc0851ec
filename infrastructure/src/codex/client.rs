//! Codex MCP client.
//!
//! [`CodexClient`] owns at most one [`AgentConnection`] and the session state
//! shared with that connection's reader. Connecting, sending and
//! disconnecting are serialized on the connection lock, so the start/continue
//! decision, the write and the `started` transition happen as one step.

use crate::codex::error::{CodexError, Result};
use crate::codex::protocol::{self, JsonRpcRequest};
use crate::codex::session::SharedSession;
use crate::codex::supervisor::AgentConnection;
use async_trait::async_trait;
use pilot_application::{
    AgentClient, AgentClientError, AgentLauncher, ClientConfig, EventSink, ProjectInfoProvider,
};
use pilot_domain::{ConnectionState, PromptRoute, SessionIdentity};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, trace, warn};

/// Status strings emitted to observers.
pub mod status {
    pub const CONNECTING: &str = "Connecting to Codex...";
    pub const CONNECTED: &str = "Connected to Codex";
    pub const STARTING_SESSION: &str = "Starting Codex session...";
    pub const DISCONNECTED: &str = "Disconnected";
}

pub struct CodexClient {
    launcher: Arc<dyn AgentLauncher>,
    project: Arc<dyn ProjectInfoProvider>,
    config: ClientConfig,
    session: SharedSession,
    connection: Mutex<Option<AgentConnection>>,
    events: EventSink,
}

impl CodexClient {
    pub fn new(
        launcher: Arc<dyn AgentLauncher>,
        project: Arc<dyn ProjectInfoProvider>,
        config: ClientConfig,
        events: EventSink,
    ) -> Self {
        Self {
            launcher,
            project,
            config,
            session: SharedSession::new(),
            connection: Mutex::new(None),
            events,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start `codex mcp-server` unless a live connection exists.
    pub async fn connect(&self) -> Result<()> {
        let mut slot = self.connection.lock().await;
        self.ensure_connected(&mut slot).await
    }

    /// Send a prompt, starting or continuing the session as appropriate.
    ///
    /// Never fails: problems are logged and reported as status updates.
    pub async fn send_message(&self, prompt: &str) {
        let mut slot = self.connection.lock().await;
        if self.ensure_connected(&mut slot).await.is_err() {
            return;
        }
        let Some(connection) = slot.as_mut() else {
            return;
        };

        let route = self.session.lock().route();
        match route {
            PromptRoute::Start => self.start_session(connection, prompt).await,
            PromptRoute::Restart => {
                warn!("No session ID available, starting new session");
                self.start_session(connection, prompt).await
            }
            PromptRoute::Continue {
                session_id,
                conversation_id,
            } => {
                self.continue_session(connection, &session_id, &conversation_id, prompt)
                    .await
            }
        }
    }

    /// Stop the process and forget the session.
    pub async fn disconnect(&self) {
        let mut slot = self.connection.lock().await;
        if let Some(mut connection) = slot.take() {
            connection.shutdown().await;
        }
        self.session.lock().reset();
        self.events.status(status::DISCONNECTED);
        info!("Disconnected from Codex MCP");
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.session.lock().connection()
    }

    pub fn session_identity(&self) -> SessionIdentity {
        self.session.lock().identity().clone()
    }

    async fn ensure_connected(&self, slot: &mut Option<AgentConnection>) -> Result<()> {
        if slot.is_some() && self.session.lock().is_connected() {
            return Ok(());
        }
        // The reader gave up on this one; make sure the process is gone.
        if let Some(mut stale) = slot.take() {
            info!("Discarding lost Codex connection");
            stale.shutdown().await;
        }

        self.session.lock().begin_connecting();
        self.events.status(status::CONNECTING);
        info!("Starting Codex MCP server");

        let project = self.project.project_context();
        match self.launcher.launch(project.root()).await {
            Ok(streams) => {
                self.session.lock().connection_established();
                self.events.status(status::CONNECTED);
                *slot = Some(AgentConnection::open(
                    streams,
                    self.session.clone(),
                    self.events.clone(),
                ));
                info!("Connected to Codex MCP");
                Ok(())
            }
            Err(e) => {
                error!("Failed to connect to Codex MCP: {}", e);
                self.session.lock().connection_failed();
                self.events.status(format!("Failed to connect: {e}"));
                Err(e.into())
            }
        }
    }

    async fn start_session(&self, connection: &mut AgentConnection, prompt: &str) {
        self.events.status(status::STARTING_SESSION);

        let mut context = self.project.project_context();
        if !self.config.include_project_context {
            context = context.without_preamble();
        }
        let request = protocol::start_session_request(
            context.enhance_prompt(prompt),
            &self.config.sandbox,
            &self.config.approval_policy,
            context.root(),
        );

        match write_request(connection, &request).await {
            Ok(()) => {
                if self.session.lock().mark_started() {
                    info!("Started Codex session with prompt: {}", prompt);
                } else {
                    debug!("Codex went away right after the start request");
                }
            }
            Err(e) => {
                error!("Failed to start Codex session: {}", e);
                self.events.status(format!("Failed to start session: {e}"));
            }
        }
    }

    async fn continue_session(
        &self,
        connection: &mut AgentConnection,
        session_id: &str,
        conversation_id: &str,
        prompt: &str,
    ) {
        let request = protocol::reply_request(session_id, conversation_id, prompt);
        match write_request(connection, &request).await {
            Ok(()) => info!("Continued Codex session with prompt: {}", prompt),
            Err(e) => {
                error!("Failed to continue Codex session: {}", e);
                self.events.status(format!("Failed to continue session: {e}"));
            }
        }
    }
}

async fn write_request<P: Serialize>(
    connection: &mut AgentConnection,
    request: &JsonRpcRequest<P>,
) -> Result<()> {
    let line = request.encode_line()?;
    trace!("Sending to Codex: {}", line.trim_end());
    connection.write_line(&line).await?;
    Ok(())
}

impl From<CodexError> for AgentClientError {
    fn from(e: CodexError) -> Self {
        AgentClientError::ConnectionError(e.to_string())
    }
}

#[async_trait]
impl AgentClient for CodexClient {
    async fn connect(&self) -> std::result::Result<(), AgentClientError> {
        CodexClient::connect(self).await.map_err(Into::into)
    }

    async fn disconnect(&self) {
        CodexClient::disconnect(self).await
    }

    async fn send_message(&self, prompt: &str) {
        CodexClient::send_message(self, prompt).await
    }

    fn connection_state(&self) -> ConnectionState {
        CodexClient::connection_state(self)
    }

    fn session_identity(&self) -> SessionIdentity {
        CodexClient::session_identity(self)
    }
}
