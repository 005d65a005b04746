use bookcheck_logging::{bc_debug, bc_warn};

use crate::event::StreamEvent;
use crate::state::{FinalResult, LogLevel, StreamState};

/// Applies one decoded event to the accumulated stream state.
///
/// Mutation is append-only; the final result is assigned at most once and a
/// repeated `final` event leaves the state untouched.
pub fn dispatch(mut state: StreamState, event: &StreamEvent) -> StreamState {
    match event {
        StreamEvent::Progress { text } => {
            state.push_log(LogLevel::Info, text.clone());
        }
        StreamEvent::Comparison(record) => {
            state.push_log(
                LogLevel::Info,
                format!("Comparison: {} => {}", record.field, record.status),
            );
            state.push_comparison(record.clone());
        }
        StreamEvent::Extraction(record) => {
            state.push_extraction(record.clone());
        }
        StreamEvent::Final(summary) => {
            let result = FinalResult::new(&summary.overall, summary.detail.clone());
            let text = format!("Final: {}", result.label());
            if state.set_final_result(result) {
                state.push_log(LogLevel::Success, text);
            } else {
                bc_warn!("Ignoring repeated final event ({})", summary.overall);
            }
        }
        StreamEvent::Malformed { kind, reason } => {
            state.push_log(LogLevel::Error, format!("Malformed {kind} event: {reason}"));
        }
        StreamEvent::Unknown { kind } => {
            bc_debug!("Ignoring event of unknown type {:?}", kind);
        }
    }
    state
}
