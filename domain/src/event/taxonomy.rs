//! Event taxonomy: maps a [`CodexEvent`] to zero or one [`Message`].

use super::codex_event::{
    CodexEvent, ExecApprovalRequest, ExecCommandBegin, ExecCommandEnd, PatchApplyBegin,
    PatchApplyEnd,
};
use crate::message::entities::Message;
use crate::message::metadata::{Metadata, keys};

/// Reasoning summaries longer than this many characters are truncated.
pub const REASONING_PREVIEW_CHARS: usize = 100;

pub const TASK_STARTED: &str = "Task started";
pub const TASK_COMPLETED: &str = "Task completed";
pub const TURN_ABORTED: &str = "Turn aborted";

const MESSAGE_FALLBACK: &str = "Message received";
const REASONING_FALLBACK: &str = "Thinking...";
const UNKNOWN_COMMAND: &str = "Unknown command";
const COMMAND_COMPLETED: &str = "Command completed";
const PATCH_SUCCEEDED: &str = "Files modified successfully";
const PATCH_FAILED: &str = "Failed to modify files";

impl CodexEvent {
    /// Convert this event into a displayable message.
    ///
    /// Returns `None` for events that are understood but not shown
    /// (section breaks, diffs, token counts) and for unrecognized types.
    pub fn into_message(self) -> Option<Message> {
        match self {
            CodexEvent::AgentMessage { message } => Some(Message::assistant(
                message.unwrap_or_else(|| MESSAGE_FALLBACK.to_string()),
            )),
            CodexEvent::ExecCommandBegin(begin) => Some(exec_begin_message(begin)),
            CodexEvent::ExecCommandEnd(end) => Some(exec_end_message(end)),
            CodexEvent::AgentReasoning { text } => Some(Message::reasoning(preview_reasoning(
                text.as_deref().unwrap_or(REASONING_FALLBACK),
            ))),
            CodexEvent::AgentReasoningDelta { delta } => {
                Some(Message::reasoning_delta(delta.unwrap_or_default()))
            }
            CodexEvent::TaskStarted => Some(Message::status(TASK_STARTED)),
            CodexEvent::TaskComplete => Some(Message::status(TASK_COMPLETED)),
            CodexEvent::TurnAborted => Some(Message::status(TURN_ABORTED)),
            CodexEvent::ExecApprovalRequest(request) => Some(approval_message(request)),
            CodexEvent::PatchApplyBegin(begin) => Some(patch_begin_message(begin)),
            CodexEvent::PatchApplyEnd(end) => Some(patch_end_message(end)),
            CodexEvent::AgentReasoningSectionBreak
            | CodexEvent::TurnDiff
            | CodexEvent::TokenCount
            | CodexEvent::Unrecognized => None,
        }
    }
}

/// Keep the first [`REASONING_PREVIEW_CHARS`] characters, appending `...`
/// only when something was cut.
pub fn preview_reasoning(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(REASONING_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn exec_begin_message(begin: ExecCommandBegin) -> Message {
    let command = begin
        .command
        .map(|c| c.render())
        .unwrap_or_else(|| UNKNOWN_COMMAND.to_string());

    let mut metadata = Metadata::new();
    metadata.insert(keys::COMMAND, command.as_str());
    metadata.insert_opt(keys::CALL_ID, begin.call_id);
    metadata.insert_opt(keys::CWD, begin.cwd);

    Message::tool_call(format!("Executing: {}", command), metadata)
}

fn exec_end_message(end: ExecCommandEnd) -> Message {
    let success = end.success.unwrap_or(end.error.is_none());
    let content = end
        .output
        .clone()
        .or_else(|| end.error.clone())
        .unwrap_or_else(|| COMMAND_COMPLETED.to_string());

    let mut metadata = Metadata::new();
    metadata.insert_opt(keys::OUTPUT, end.output);
    metadata.insert_opt(keys::ERROR, end.error);
    metadata.insert(keys::SUCCESS, success);
    metadata.insert_opt(keys::CALL_ID, end.call_id);

    Message::tool_result(content, metadata)
}

fn approval_message(request: ExecApprovalRequest) -> Message {
    let command = request
        .codex_command
        .map(|argv| argv.join(" "))
        .or_else(|| request.command.map(|c| c.render()))
        .unwrap_or_else(|| UNKNOWN_COMMAND.to_string());

    let mut metadata = Metadata::new();
    metadata.insert(keys::COMMAND, command.as_str());
    metadata.insert_opt(keys::CALL_ID, request.codex_call_id.or(request.call_id));
    metadata.insert(keys::NEEDS_APPROVAL, true);

    Message::tool_call(format!("Requesting permission: {}", command), metadata)
}

fn patch_begin_message(begin: PatchApplyBegin) -> Message {
    let file_count = begin.changes.as_ref().map_or(0, |changes| changes.len());
    let files = if file_count == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", file_count)
    };

    let mut metadata = Metadata::new();
    metadata.insert(keys::FILE_COUNT, file_count);
    metadata.insert_opt(keys::CALL_ID, begin.call_id);
    if let Some(changes) = begin.changes {
        metadata.insert(
            keys::CHANGES,
            serde_json::Value::Object(changes).to_string(),
        );
    }

    Message::tool_call(format!("Modifying {}...", files), metadata)
}

fn patch_end_message(end: PatchApplyEnd) -> Message {
    let success = end.success.unwrap_or(false);
    let content = match (success, &end.stdout, &end.stderr) {
        (true, Some(stdout), _) => stdout.clone(),
        (false, _, Some(stderr)) => stderr.clone(),
        (true, None, _) => PATCH_SUCCEEDED.to_string(),
        (false, _, None) => PATCH_FAILED.to_string(),
    };

    let mut metadata = Metadata::new();
    metadata.insert(keys::SUCCESS, success);
    metadata.insert_opt(keys::OUTPUT, end.stdout);
    metadata.insert_opt(keys::ERROR, end.stderr);
    metadata.insert_opt(keys::CALL_ID, end.call_id);

    Message::tool_result(content, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::entities::MessageKind;
    use serde_json::json;

    fn map(msg: serde_json::Value) -> Option<Message> {
        CodexEvent::from_msg(msg).unwrap().into_message()
    }

    #[test]
    fn test_agent_message_uses_message_field() {
        let message = map(json!({"type": "agent_message", "message": "Hi"})).unwrap();
        assert_eq!(message.kind(), MessageKind::Assistant);
        assert_eq!(message.content(), "Hi");
        assert!(message.metadata().is_none());
    }

    #[test]
    fn test_agent_message_falls_back() {
        let message = map(json!({"type": "agent_message"})).unwrap();
        assert_eq!(message.content(), "Message received");
    }

    #[test]
    fn test_exec_command_begin_builds_tool_call() {
        let message = map(json!({
            "type": "exec_command_begin",
            "command": "cargo build",
            "call_id": "c1",
            "cwd": "/work"
        }))
        .unwrap();

        assert_eq!(message.kind(), MessageKind::ToolCall);
        assert_eq!(message.content(), "Executing: cargo build");
        let metadata = message.metadata().unwrap();
        assert_eq!(metadata.get_str(keys::COMMAND), Some("cargo build"));
        assert_eq!(metadata.get_str(keys::CALL_ID), Some("c1"));
        assert_eq!(metadata.get_str(keys::CWD), Some("/work"));
    }

    #[test]
    fn test_exec_command_begin_without_optional_fields() {
        let message = map(json!({"type": "exec_command_begin", "command": "ls"})).unwrap();
        let metadata = message.metadata().unwrap();
        assert_eq!(metadata.len(), 1);
        assert!(!metadata.contains_key(keys::CALL_ID));
    }

    #[test]
    fn test_exec_command_end_prefers_output() {
        let message = map(json!({
            "type": "exec_command_end",
            "output": "done",
            "error": "warning",
            "call_id": "c1"
        }))
        .unwrap();
        assert_eq!(message.kind(), MessageKind::ToolResult);
        assert_eq!(message.content(), "done");
        // error present and success absent -> failure
        assert_eq!(message.metadata().unwrap().get_bool(keys::SUCCESS), Some(false));
    }

    #[test]
    fn test_exec_command_end_error_without_success_is_failure() {
        let message = map(json!({"type": "exec_command_end", "error": "exit 1"})).unwrap();
        assert_eq!(message.content(), "exit 1");
        let metadata = message.metadata().unwrap();
        assert_eq!(metadata.get_bool(keys::SUCCESS), Some(false));
        assert_eq!(metadata.get_str(keys::ERROR), Some("exit 1"));
        assert!(!metadata.contains_key(keys::OUTPUT));
    }

    #[test]
    fn test_exec_command_end_without_output_or_error_is_success() {
        let message = map(json!({"type": "exec_command_end"})).unwrap();
        assert_eq!(message.content(), "Command completed");
        assert_eq!(message.metadata().unwrap().get_bool(keys::SUCCESS), Some(true));
    }

    #[test]
    fn test_exec_command_end_explicit_success_wins() {
        let message = map(json!({
            "type": "exec_command_end",
            "error": "stderr noise",
            "success": true
        }))
        .unwrap();
        assert_eq!(message.metadata().unwrap().get_bool(keys::SUCCESS), Some(true));
    }

    #[test]
    fn test_reasoning_short_text_is_unchanged() {
        let text = "a".repeat(100);
        let message = map(json!({"type": "agent_reasoning", "text": text})).unwrap();
        assert_eq!(message.kind(), MessageKind::Reasoning);
        assert_eq!(message.content(), text);
    }

    #[test]
    fn test_reasoning_long_text_is_truncated() {
        let text = "b".repeat(150);
        let message = map(json!({"type": "agent_reasoning", "text": text})).unwrap();
        assert_eq!(message.content().chars().count(), 103);
        assert!(message.content().ends_with("..."));
        assert_eq!(&message.content()[..100], &text[..100]);
    }

    #[test]
    fn test_reasoning_truncation_counts_characters() {
        let text = "é".repeat(101);
        let preview = preview_reasoning(&text);
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.starts_with(&"é".repeat(100)));
    }

    #[test]
    fn test_reasoning_without_text_falls_back() {
        let message = map(json!({"type": "agent_reasoning"})).unwrap();
        assert_eq!(message.content(), "Thinking...");
    }

    #[test]
    fn test_reasoning_delta_passes_raw_delta() {
        let message = map(json!({"type": "agent_reasoning_delta", "delta": " the"})).unwrap();
        assert_eq!(message.kind(), MessageKind::ReasoningDelta);
        assert_eq!(message.content(), " the");

        let empty = map(json!({"type": "agent_reasoning_delta"})).unwrap();
        assert_eq!(empty.content(), "");
    }

    #[test]
    fn test_lifecycle_events_become_status() {
        for (event_type, expected) in [
            ("task_started", TASK_STARTED),
            ("task_complete", TASK_COMPLETED),
            ("turn_aborted", TURN_ABORTED),
        ] {
            let message = map(json!({"type": event_type})).unwrap();
            assert_eq!(message.kind(), MessageKind::Status);
            assert_eq!(message.content(), expected);
        }
    }

    #[test]
    fn test_approval_request_prefers_codex_command_array() {
        let message = map(json!({
            "type": "exec_approval_request",
            "codex_command": ["rm", "-rf", "target"],
            "command": "ignored",
            "codex_call_id": "a1",
            "call_id": "ignored"
        }))
        .unwrap();

        assert_eq!(message.kind(), MessageKind::ToolCall);
        assert_eq!(message.content(), "Requesting permission: rm -rf target");
        let metadata = message.metadata().unwrap();
        assert_eq!(metadata.get_str(keys::COMMAND), Some("rm -rf target"));
        assert_eq!(metadata.get_str(keys::CALL_ID), Some("a1"));
        assert_eq!(metadata.get_bool(keys::NEEDS_APPROVAL), Some(true));
    }

    #[test]
    fn test_approval_request_falls_back_to_scalar_then_unknown() {
        let scalar = map(json!({
            "type": "exec_approval_request",
            "command": "git push",
            "call_id": "a2"
        }))
        .unwrap();
        let metadata = scalar.metadata().unwrap();
        assert_eq!(metadata.get_str(keys::COMMAND), Some("git push"));
        assert_eq!(metadata.get_str(keys::CALL_ID), Some("a2"));

        let unknown = map(json!({"type": "exec_approval_request"})).unwrap();
        assert_eq!(
            unknown.metadata().unwrap().get_str(keys::COMMAND),
            Some("Unknown command")
        );
    }

    #[test]
    fn test_patch_begin_pluralizes_file_count() {
        let one = map(json!({
            "type": "patch_apply_begin",
            "changes": {"src/lib.rs": {"update": {}}},
            "call_id": "p1"
        }))
        .unwrap();
        assert_eq!(one.content(), "Modifying 1 file...");
        let metadata = one.metadata().unwrap();
        assert_eq!(metadata.get_i64(keys::FILE_COUNT), Some(1));
        assert_eq!(metadata.get_str(keys::CALL_ID), Some("p1"));
        let changes: serde_json::Value =
            serde_json::from_str(metadata.get_str(keys::CHANGES).unwrap()).unwrap();
        assert!(changes.get("src/lib.rs").is_some());

        let many = map(json!({
            "type": "patch_apply_begin",
            "changes": {"a.rs": {}, "b.rs": {}, "c.rs": {}}
        }))
        .unwrap();
        assert_eq!(many.content(), "Modifying 3 files...");

        let none = map(json!({"type": "patch_apply_begin"})).unwrap();
        assert_eq!(none.content(), "Modifying 0 files...");
        assert!(!none.metadata().unwrap().contains_key(keys::CHANGES));
    }

    #[test]
    fn test_patch_end_selects_stream_by_outcome() {
        let ok = map(json!({"type": "patch_apply_end", "success": true, "stdout": "patched"}))
            .unwrap();
        assert_eq!(ok.kind(), MessageKind::ToolResult);
        assert_eq!(ok.content(), "patched");

        let failed = map(json!({
            "type": "patch_apply_end",
            "success": false,
            "stdout": "partial",
            "stderr": "conflict"
        }))
        .unwrap();
        assert_eq!(failed.content(), "conflict");
        let metadata = failed.metadata().unwrap();
        assert_eq!(metadata.get_bool(keys::SUCCESS), Some(false));
        assert_eq!(metadata.get_str(keys::OUTPUT), Some("partial"));
        assert_eq!(metadata.get_str(keys::ERROR), Some("conflict"));

        let bare_ok = map(json!({"type": "patch_apply_end", "success": true})).unwrap();
        assert_eq!(bare_ok.content(), "Files modified successfully");

        let bare_fail = map(json!({"type": "patch_apply_end"})).unwrap();
        assert_eq!(bare_fail.content(), "Failed to modify files");
    }

    #[test]
    fn test_filtered_types_produce_nothing() {
        for event_type in [
            "agent_reasoning_section_break",
            "turn_diff",
            "token_count",
            "session_configured",
        ] {
            assert!(map(json!({"type": event_type})).is_none(), "{}", event_type);
        }
    }
}
