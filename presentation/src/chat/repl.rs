//! REPL (Read-Eval-Print Loop) for an interactive Codex session

use super::turn::TurnWaiter;
use crate::ConsoleRenderer;
use colored::Colorize;
use pilot_application::AgentClient;
use pilot_domain::Message;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const HISTORY_SIZE: usize = 1000;

/// What the loop should do after a slash command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Exit,
}

/// Interactive chat REPL
///
/// Agent output is printed by whoever drives the event pump; the REPL only
/// reads prompts, forwards them and waits for the turn to end.
pub struct ChatRepl<C: AgentClient + 'static> {
    client: Arc<C>,
    turns: TurnWaiter,
    renderer: ConsoleRenderer,
    history_path: Option<PathBuf>,
}

impl<C: AgentClient + 'static> ChatRepl<C> {
    /// Create a new ChatRepl
    pub fn new(client: Arc<C>, turns: TurnWaiter) -> Self {
        Self {
            client,
            turns,
            renderer: ConsoleRenderer::new(),
            history_path: dirs::data_dir().map(|p| p.join("codex-pilot").join("history.txt")),
        }
    }

    /// Override (or disable) the history file
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Run the interactive REPL, optionally sending `initial` first
    pub async fn run(&mut self, initial: Option<String>) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => debug!("History disabled: {}", e),
            }
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("codex".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        if let Some(text) = initial {
            if let Some(echo) = self.renderer.format_message(&Message::user(text.as_str())) {
                println!("{}", echo);
            }
            self.submit(&text).await;
        }

        loop {
            let signal = tokio::task::block_in_place(|| editor.read_line(&prompt));

            match signal {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(line).await == CommandResult::Exit {
                            break;
                        }
                        continue;
                    }

                    self.submit(line).await;
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Codex Pilot - Chat             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Commands:");
        println!("  {}      - Show this help", "/help".cyan());
        println!("  {}    - Show connection and session", "/status".cyan());
        println!("  {} - Restart Codex with a fresh session", "/reconnect".cyan());
        println!("  {}      - Exit", "/quit".cyan());
        println!();
    }

    /// Send a prompt and wait until the agent finishes the turn (or Ctrl+C).
    async fn submit(&mut self, prompt: &str) {
        self.turns.mark_seen();
        self.client.send_message(prompt).await;

        tokio::select! {
            _ = self.turns.wait() => {}
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "(stopped waiting; the agent keeps working)".dimmed());
            }
        }
    }

    /// Handle slash commands.
    pub async fn handle_command(&self, cmd: &str) -> CommandResult {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                CommandResult::Exit
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?     - Show this help");
                println!("  /status           - Show connection and session");
                println!("  /reconnect        - Restart Codex with a fresh session");
                println!("  /quit, /exit, /q  - Exit");
                println!();
                println!("Anything else is sent to Codex. The first prompt starts a");
                println!("session; later prompts continue it.");
                println!();
                CommandResult::Continue
            }
            "/status" => {
                println!("{}", self.status_report());
                CommandResult::Continue
            }
            "/reconnect" => {
                self.client.disconnect().await;
                if let Err(e) = self.client.connect().await {
                    eprintln!("{} {}", "Reconnect failed:".red(), e);
                }
                CommandResult::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                CommandResult::Continue
            }
        }
    }

    fn status_report(&self) -> String {
        let identity = self.client.session_identity();
        format!(
            "Connection:   {}\nSession:      {}\nConversation: {}\nStarted:      {}",
            self.client.connection_state(),
            identity.session_id().unwrap_or("-"),
            identity.conversation_id().unwrap_or("-"),
            identity.is_started()
        )
    }
}
