//! Console rendering of agent messages and status updates

use colored::Colorize;
use pilot_domain::{Message, MessageKind, metadata_keys};
use std::io::Write;

/// Renders [`Message`]s and status strings for a terminal
#[derive(Debug, Clone, Default)]
pub struct ConsoleRenderer {
    show_deltas: bool,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print streamed reasoning fragments (the full reasoning text is
    /// printed either way).
    pub fn with_deltas(mut self, show: bool) -> Self {
        self.show_deltas = show;
        self
    }

    /// Format one message, or `None` when it should not be shown
    pub fn format_message(&self, message: &Message) -> Option<String> {
        let content = message.content();
        let text = match message.kind() {
            MessageKind::User => format!("{} {}", ">".bold(), content.bold()),
            MessageKind::Assistant => format!("{}\n{}", "codex".green().bold(), content),
            MessageKind::ToolCall => {
                let needs_approval = message
                    .metadata()
                    .and_then(|m| m.get_bool(metadata_keys::NEEDS_APPROVAL))
                    .unwrap_or(false);
                if needs_approval {
                    format!("{} {}", "?".yellow().bold(), content.yellow())
                } else {
                    format!("{} {}", "$".cyan().bold(), content.cyan())
                }
            }
            MessageKind::ToolResult => {
                let success = message
                    .metadata()
                    .and_then(|m| m.get_bool(metadata_keys::SUCCESS))
                    .unwrap_or(true);
                let mark = if success { "ok".green() } else { "failed".red() };
                format!("{}\n{}", mark.bold(), Self::indent(content, "  ").dimmed())
            }
            MessageKind::Reasoning => format!("{}", content.dimmed().italic()),
            MessageKind::ReasoningDelta => {
                if !self.show_deltas {
                    return None;
                }
                format!("{}", content.dimmed())
            }
            MessageKind::Status => format!("{}", format!("[{content}]").blue()),
            MessageKind::Error => format!("{} {}", "error:".red().bold(), content),
        };
        Some(text)
    }

    /// Format a client status line
    pub fn format_status(&self, status: &str) -> String {
        if status.starts_with("Error") || status.starts_with("Failed") {
            format!("{} {}", "!".red().bold(), status.red())
        } else {
            format!("{}", format!("· {status}").dimmed())
        }
    }

    pub fn print_message(&self, message: &Message) {
        let Some(text) = self.format_message(message) else {
            return;
        };
        if message.kind() == MessageKind::ReasoningDelta {
            print!("{}", text);
            let _ = std::io::stdout().flush();
        } else {
            println!("{}", text);
        }
    }

    pub fn print_status(&self, status: &str) {
        println!("{}", self.format_status(status));
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
