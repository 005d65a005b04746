use std::sync::Once;

use bookcheck_core::{dispatch, LogEntry, LogLevel, StreamEvent, StreamState, Verdict};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bookcheck_logging::initialize_for_tests);
}

fn apply_all(events: &[serde_json::Value]) -> StreamState {
    events.iter().fold(StreamState::new(), |state, value| {
        dispatch(state, &StreamEvent::from_json(value.clone()))
    })
}

fn progress(message: &str) -> serde_json::Value {
    json!({"type": "progress", "payload": {"message": message}})
}

fn comparison(field: &str, status: &str) -> serde_json::Value {
    json!({
        "type": "comparison",
        "payload": {
            "field": field,
            "initial_value": "Hyatt",
            "final_value": "Hyatt",
            "status": status,
            "explanation": "ok",
            "evidence": ["a"]
        }
    })
}

fn final_event(overall: &str) -> serde_json::Value {
    json!({"type": "final", "payload": {"summary": {"overall": overall}}})
}

#[test]
fn progress_comparison_final_scenario() {
    init_logging();
    let state = apply_all(&[
        progress("start"),
        comparison("hotel_name", "match"),
        final_event("match"),
    ]);

    assert_eq!(
        state.logs(),
        &[
            LogEntry::new(LogLevel::Info, "start"),
            LogEntry::new(LogLevel::Info, "Comparison: hotel_name => match"),
            LogEntry::new(LogLevel::Success, "Final: MATCH"),
        ]
    );
    assert_eq!(state.comparisons().len(), 1);
    let record = &state.comparisons()[0];
    assert_eq!(record.field, "hotel_name");
    assert_eq!(record.initial_value.as_deref(), Some("Hyatt"));
    assert_eq!(record.evidence, vec!["a".to_string()]);

    let result = state.final_result().expect("final result set");
    assert_eq!(result.label(), "MATCH");
    assert_eq!(result.verdict(), Some(Verdict::Match));
}

#[test]
fn final_label_is_upper_cased_verbatim() {
    init_logging();
    for (overall, expected) in [
        ("match", "MATCH"),
        ("mismatch", "MISMATCH"),
        ("Unclear", "UNCLEAR"),
        ("partial", "PARTIAL"),
    ] {
        let state = apply_all(&[final_event(overall)]);
        assert_eq!(state.final_result().unwrap().label(), expected);
    }

    let state = apply_all(&[final_event("partial")]);
    assert_eq!(state.final_result().unwrap().verdict(), None);
}

#[test]
fn repeated_final_does_not_overwrite() {
    init_logging();
    let state = apply_all(&[final_event("mismatch"), final_event("match")]);

    assert_eq!(state.final_result().unwrap().label(), "MISMATCH");
    assert_eq!(state.logs().len(), 1);
}

#[test]
fn logs_and_comparisons_are_append_only() {
    init_logging();
    let events = vec![
        progress("one"),
        comparison("hotel_name", "match"),
        comparison("hotel_name", "mismatch"),
        progress("two"),
        comparison("guests", "unclear"),
    ];

    let mut state = StreamState::new();
    let mut previous_logs: Vec<LogEntry> = Vec::new();
    for value in &events {
        state = dispatch(state, &StreamEvent::from_json(value.clone()));
        assert_eq!(&state.logs()[..previous_logs.len()], previous_logs.as_slice());
        previous_logs = state.logs().to_vec();
    }

    assert!(state.logs().len() >= 2 + 3);
    assert_eq!(state.comparisons().len(), 3);
    let fields: Vec<_> = state.comparisons().iter().map(|c| c.field.as_str()).collect();
    assert_eq!(fields, vec!["hotel_name", "hotel_name", "guests"]);
}

#[test]
fn unknown_event_type_changes_nothing() {
    init_logging();
    let before = apply_all(&[progress("start")]);
    let after = dispatch(
        before.clone(),
        &StreamEvent::from_json(json!({"type": "heartbeat", "payload": {}})),
    );

    assert_eq!(before, after);
}

#[test]
fn progress_without_message_logs_payload_json() {
    init_logging();
    let state = apply_all(&[json!({"type": "progress", "payload": {"stage": "ocr"}})]);

    assert_eq!(state.logs()[0].text, r#"{"stage":"ocr"}"#);
}

#[test]
fn parse_error_diagnostic_keeps_raw_text() {
    init_logging();
    let state = apply_all(&[json!({
        "type": "progress",
        "payload": {"message": "json_parse_error", "raw": "not-json"}
    })]);

    assert_eq!(state.logs().len(), 1);
    assert_eq!(state.logs()[0].level, LogLevel::Info);
    assert!(state.logs()[0].text.contains("json_parse_error"));
    assert!(state.logs()[0].text.contains("not-json"));
}

#[test]
fn backend_diagnostics_log_only_their_message() {
    init_logging();
    let state = apply_all(&[
        json!({
            "type": "progress",
            "payload": {"message": "missing_event_type", "raw": {"foo": "bar", "trace": "x"}}
        }),
        json!({
            "type": "progress",
            "payload": {"message": "invalid_event_skipped", "raw": "Traceback (most recent call last)"}
        }),
    ]);

    let texts: Vec<&str> = state.logs().iter().map(|log| log.text.as_str()).collect();
    assert_eq!(texts, vec!["missing_event_type", "invalid_event_skipped"]);
}

#[test]
fn extraction_is_recorded_without_log() {
    init_logging();
    let state = apply_all(&[json!({
        "type": "extraction",
        "payload": {
            "screenshot": {
                "screenshot_id": "quote.png",
                "classification": "initial_quote",
                "extraction": {
                    "hotel_name": "Hyatt",
                    "check_in": "2024-05-01",
                    "check_out": "unclear",
                    "guests": 2,
                    "total_price": 431.5
                }
            }
        }
    })]);

    assert!(state.logs().is_empty());
    assert_eq!(state.extractions().len(), 1);
    let record = &state.extractions()[0];
    assert_eq!(record.screenshot_id, "quote.png");
    assert_eq!(record.classification, "initial_quote");
    assert_eq!(record.extraction.guests.as_deref(), Some("2"));
    assert_eq!(record.extraction.total_price.as_deref(), Some("431.5"));
}

#[test]
fn malformed_final_is_reported_as_error_log() {
    init_logging();
    let state = apply_all(&[json!({"type": "final", "payload": {"summary": "done"}})]);

    assert!(state.final_result().is_none());
    assert_eq!(state.logs().len(), 1);
    assert_eq!(state.logs()[0].level, LogLevel::Error);
    assert!(state.logs()[0].text.starts_with("Malformed final event"));
}
