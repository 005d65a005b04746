use bookcheck_logging::bc_debug;
use serde_json::{json, Value};

/// `message` of the progress event substituted for an unparseable payload.
pub const PARSE_ERROR_MESSAGE: &str = "json_parse_error";

/// Parses one `data:` payload. Invalid JSON never fails the stream: it is
/// replaced by a progress event that carries the raw text.
pub fn decode_payload(payload: &str) -> Value {
    match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(err) => {
            bc_debug!("Unparseable SSE payload ({err}): {payload:?}");
            parse_error_event(payload)
        }
    }
}

pub fn parse_error_event(raw: &str) -> Value {
    json!({
        "type": "progress",
        "payload": {
            "message": PARSE_ERROR_MESSAGE,
            "raw": raw,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_payload_is_passed_through() {
        assert_eq!(
            decode_payload(r#"{"type":"custom","payload":[1,2]}"#),
            json!({"type": "custom", "payload": [1, 2]})
        );
    }

    #[test]
    fn invalid_payload_becomes_progress_event() {
        assert_eq!(
            decode_payload("not-json"),
            json!({"type": "progress", "payload": {"message": "json_parse_error", "raw": "not-json"}})
        );
    }
}
