//! Shape-based classification of inbound worker frames.
//!
//! The worker protocol carries no discriminator; frames are classified
//! by which fields are present, in a fixed precedence order. Ambiguous
//! payloads take the first matching branch.

use calix_core::{Error, Result};
use serde_json::Value;

/// A classified reply from the bubble worker.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerReply {
    /// Result of an executed CLI command.
    CommandResult {
        command: Option<String>,
        stdout: String,
        stderr: Option<String>,
    },
    /// Liveness acknowledgment.
    Pong,
    /// Worker identity and active session count.
    WorkerInfo {
        worker_id: String,
        active_sessions: u64,
    },
    /// Anything else; rendered as pretty-printed JSON.
    Other(Value),
}

/// Classify one inbound text frame.
///
/// Precedence: `stdout` present, then `type == "pong"`, then a usable
/// `worker_id`, then the raw payload.
pub fn classify_reply(text: &str) -> Result<WorkerReply> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::Protocol(format!("invalid worker frame: {}", e)))?;

    if let Some(stdout) = value.get("stdout") {
        let stdout = field_text(stdout);
        let command = value
            .get("command")
            .and_then(Value::as_str)
            .map(str::to_string);
        let stderr = match value.get("stderr") {
            None | Some(Value::Null) => None,
            Some(v) => Some(field_text(v)),
        };
        return Ok(WorkerReply::CommandResult {
            command,
            stdout,
            stderr,
        });
    }

    if value.get("type").and_then(Value::as_str) == Some("pong") {
        return Ok(WorkerReply::Pong);
    }

    if let Some(worker_id) = usable_worker_id(&value) {
        let active_sessions = value
            .get("active_sessions")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        return Ok(WorkerReply::WorkerInfo {
            worker_id,
            active_sessions,
        });
    }

    Ok(WorkerReply::Other(value))
}

/// Render a field as display text: strings verbatim, anything else as JSON.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A `worker_id` counts only when it carries a non-empty identity.
fn usable_worker_id(value: &Value) -> Option<String> {
    match value.get("worker_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_result() {
        let reply = classify_reply(r#"{"stdout":"ok","command":"ls"}"#).unwrap();
        assert_eq!(
            reply,
            WorkerReply::CommandResult {
                command: Some("ls".to_string()),
                stdout: "ok".to_string(),
                stderr: None,
            }
        );
    }

    #[test]
    fn test_command_result_with_stderr() {
        let reply = classify_reply(r#"{"stdout":"","stderr":"boom","command":"x"}"#).unwrap();
        assert_eq!(
            reply,
            WorkerReply::CommandResult {
                command: Some("x".to_string()),
                stdout: String::new(),
                stderr: Some("boom".to_string()),
            }
        );
    }

    #[test]
    fn test_null_stdout_still_classifies_as_result() {
        // Presence of the field decides, not its value.
        let reply = classify_reply(r#"{"stdout":null}"#).unwrap();
        assert_eq!(
            reply,
            WorkerReply::CommandResult {
                command: None,
                stdout: "null".to_string(),
                stderr: None,
            }
        );
    }

    #[test]
    fn test_pong() {
        let reply = classify_reply(r#"{"type":"pong"}"#).unwrap();
        assert_eq!(reply, WorkerReply::Pong);
    }

    #[test]
    fn test_worker_info() {
        let reply =
            classify_reply(r#"{"worker_id":"bubble-001","active_sessions":3}"#).unwrap();
        assert_eq!(
            reply,
            WorkerReply::WorkerInfo {
                worker_id: "bubble-001".to_string(),
                active_sessions: 3,
            }
        );
    }

    #[test]
    fn test_worker_info_missing_sessions_defaults_to_zero() {
        let reply = classify_reply(r#"{"worker_id":"bubble-001"}"#).unwrap();
        assert_eq!(
            reply,
            WorkerReply::WorkerInfo {
                worker_id: "bubble-001".to_string(),
                active_sessions: 0,
            }
        );
    }

    #[test]
    fn test_precedence_stdout_beats_pong() {
        let reply = classify_reply(r#"{"stdout":"x","type":"pong"}"#).unwrap();
        assert!(matches!(reply, WorkerReply::CommandResult { .. }));
    }

    #[test]
    fn test_precedence_pong_beats_worker_id() {
        let reply = classify_reply(r#"{"type":"pong","worker_id":"w"}"#).unwrap();
        assert_eq!(reply, WorkerReply::Pong);
    }

    #[test]
    fn test_empty_worker_id_falls_through() {
        let reply = classify_reply(r#"{"worker_id":""}"#).unwrap();
        assert_eq!(reply, WorkerReply::Other(json!({"worker_id": ""})));
    }

    #[test]
    fn test_unknown_shape_is_other() {
        let reply = classify_reply(r#"{"status":"alive","edges":7}"#).unwrap();
        assert_eq!(reply, WorkerReply::Other(json!({"status":"alive","edges":7})));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = classify_reply("not json").unwrap_err();
        assert!(err.to_string().contains("invalid worker frame"));
    }
}
