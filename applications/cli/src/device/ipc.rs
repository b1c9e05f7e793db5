//! mpv JSON IPC framing
//!
//! Requests and replies are single JSON lines. Replies carry the request id
//! they answer; lines without one are asynchronous events.

use cadence_playback::{PlaybackError, Result};
use serde_json::{json, Value};

/// Encode a command as one request line (without the newline)
pub fn build_request(command: &Value, request_id: u64) -> String {
    json!({ "command": command, "request_id": request_id }).to_string()
}

/// Decode a line read from the socket
///
/// Returns `None` for events and replies to other requests. A reply whose
/// `error` is not `"success"` becomes a device error.
pub fn parse_reply(line: &str, request_id: u64) -> Option<Result<Value>> {
    let value: Value = serde_json::from_str(line).ok()?;

    if value.get("request_id").and_then(Value::as_u64) != Some(request_id) {
        return None;
    }

    match value.get("error").and_then(Value::as_str) {
        Some("success") => Some(Ok(value.get("data").cloned().unwrap_or(Value::Null))),
        Some(error) => Some(Err(PlaybackError::Device(error.to_string()))),
        None => Some(Err(PlaybackError::Device(
            "reply without status".to_string(),
        ))),
    }
}
