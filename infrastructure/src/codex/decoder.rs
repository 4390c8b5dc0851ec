//! Protocol decoder: one inbound line in, identity updates and at most one
//! [`Message`] out.
//!
//! Decoding is pure. The caller owns session state and applies the returned
//! [`IdentityUpdate`] under its own lock.

use crate::codex::error::DecodeError;
use crate::codex::protocol::{Envelope, classify};
use pilot_domain::{CodexEvent, IdentityUpdate, Message};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

/// Content shown for a response whose first content block has no text.
pub const RESPONSE_RECEIVED: &str = "Response received";

/// Result of decoding one line.
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    pub identity: IdentityUpdate,
    pub message: Option<Message>,
}

/// Decode one line, logging and swallowing every failure.
pub fn decode_line(line: &str) -> Decoded {
    trace!("Codex line: {}", line);
    match try_decode_line(line) {
        Ok(decoded) => decoded,
        Err(DecodeError::Unrecognized) => {
            debug!("Unhandled message shape: {}", preview(line));
            Decoded::default()
        }
        Err(e @ DecodeError::Rpc { .. }) => {
            warn!("Codex returned an error: {}", e);
            Decoded::default()
        }
        Err(e) => {
            warn!("Failed to decode Codex line: {} ({})", e, preview(line));
            Decoded::default()
        }
    }
}

/// Decode one line, reporting why it produced nothing.
pub fn try_decode_line(line: &str) -> Result<Decoded, DecodeError> {
    let json: Value = serde_json::from_str(line).map_err(DecodeError::InvalidJson)?;
    if !json.is_object() {
        return Err(DecodeError::NotAnObject);
    }

    match classify(&json) {
        Envelope::Event => decode_event(&json),
        Envelope::Response => decode_response(&json),
        Envelope::ErrorResponse => Err(rpc_error(&json)),
        Envelope::Notification { method } => {
            debug!("Ignoring notification {}", method);
            Ok(Decoded::default())
        }
        Envelope::Unrecognized => Err(DecodeError::Unrecognized),
    }
}

fn decode_event(json: &Value) -> Result<Decoded, DecodeError> {
    let msg = json
        .get("params")
        .and_then(|p| p.get("msg"))
        .and_then(Value::as_object)
        .ok_or(DecodeError::MalformedEnvelope("codex/event without params.msg"))?;
    let event_type = msg
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MalformedEnvelope("codex/event msg without type"))?
        .to_string();

    // Identifiers are picked up even when the event body itself is unusable.
    let identity = event_identity(msg);

    let event = match CodexEvent::from_msg(Value::Object(msg.clone())) {
        Ok(event) => event,
        Err(source) => {
            let error = DecodeError::MalformedEvent {
                event_type: event_type.clone(),
                source,
            };
            warn!("Dropping Codex event: {}", error);
            return Ok(Decoded {
                identity,
                message: None,
            });
        }
    };
    if matches!(event, CodexEvent::Unrecognized) {
        debug!("Unknown Codex event type: {}", event_type);
    }

    Ok(Decoded {
        identity,
        message: event.into_message(),
    })
}

/// Scan the event body, then its `data` object, in a fixed key order.
///
/// Later keys win, so a camelCase key overrides its snake_case sibling and
/// `data` overrides the body.
fn event_identity(msg: &Map<String, Value>) -> IdentityUpdate {
    let mut update = IdentityUpdate::default();
    scan_identifiers(msg, &mut update);
    if let Some(data) = msg.get("data").and_then(Value::as_object) {
        scan_identifiers(data, &mut update);
    }
    update
}

fn scan_identifiers(object: &Map<String, Value>, update: &mut IdentityUpdate) {
    for key in ["session_id", "sessionId"] {
        if let Some(id) = object.get(key).and_then(Value::as_str) {
            update.set_session_id(id);
        }
    }
    for key in ["conversation_id", "conversationId"] {
        if let Some(id) = object.get(key).and_then(Value::as_str) {
            update.set_conversation_id(id);
        }
    }
}

fn decode_response(json: &Value) -> Result<Decoded, DecodeError> {
    let result = json
        .get("result")
        .and_then(Value::as_object)
        .ok_or(DecodeError::MalformedEnvelope("result is not an object"))?;

    let id_source = match result.get("meta") {
        Some(meta) => meta.as_object(),
        None => Some(result),
    };
    let mut identity = IdentityUpdate::default();
    if let Some(source) = id_source {
        if let Some(id) = source.get("sessionId").and_then(Value::as_str) {
            identity.set_session_id(id);
        }
        if let Some(id) = source.get("conversationId").and_then(Value::as_str) {
            identity.set_conversation_id(id);
        }
    }

    let message = match result.get("content") {
        Some(Value::Array(blocks)) => blocks.first().map(|block| {
            let text = block
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or(RESPONSE_RECEIVED);
            Message::assistant(text)
        }),
        Some(Value::String(text)) => Some(Message::assistant(text.as_str())),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => {
            Some(Message::assistant(scalar.to_string()))
        }
        _ => None,
    };

    Ok(Decoded { identity, message })
}

fn rpc_error(json: &Value) -> DecodeError {
    let error = &json["error"];
    DecodeError::Rpc {
        code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
        message: error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string(),
    }
}

fn preview(line: &str) -> &str {
    match line.char_indices().nth(200) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
