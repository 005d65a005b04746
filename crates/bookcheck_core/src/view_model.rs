use crate::selection::MIN_FILES;
use crate::{AppState, LogEntry, MatchStatus, SessionId, SessionState, Verdict};

/// Placeholder shown for fields the service could not read.
pub const UNCLEAR: &str = "unclear";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub session_id: SessionId,
    pub files: Vec<FileRowView>,
    pub selection_hint: Option<&'static str>,
    pub can_start: bool,
    pub logs: Vec<LogEntry>,
    pub extractions: Vec<ExtractionRowView>,
    pub comparisons: Vec<ComparisonRowView>,
    pub final_label: Option<String>,
    pub final_detail: Option<String>,
    pub banner: Option<VerdictBanner>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRowView {
    pub screenshot_id: String,
    pub classification: String,
    pub hotel_name: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: String,
    pub total_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRowView {
    pub field: String,
    pub initial_value: String,
    pub final_value: String,
    pub status: MatchStatus,
    pub explanation: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictBanner {
    pub verdict: Verdict,
    pub text: &'static str,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let stream = state.stream();
        let final_result = stream.final_result();
        let selection_hint = match state.files().len() {
            0 => Some("No images selected"),
            n if n < MIN_FILES => Some("At least two screenshots required"),
            _ => None,
        };

        Self {
            session: state.session(),
            session_id: state.session_id(),
            files: state
                .files()
                .iter()
                .map(|file| FileRowView {
                    name: file.name.clone(),
                    size: file.size,
                })
                .collect(),
            selection_hint,
            can_start: state.session() != SessionState::Running
                && state.files().len() >= MIN_FILES,
            logs: stream.logs().to_vec(),
            extractions: stream
                .extractions()
                .iter()
                .map(|record| {
                    let fields = &record.extraction;
                    ExtractionRowView {
                        screenshot_id: record.screenshot_id.clone(),
                        classification: record.classification.clone(),
                        hotel_name: or_unclear(&fields.hotel_name),
                        check_in: or_unclear(&fields.check_in),
                        check_out: or_unclear(&fields.check_out),
                        guests: or_unclear(&fields.guests),
                        total_price: or_unclear(&fields.total_price),
                    }
                })
                .collect(),
            comparisons: stream
                .comparisons()
                .iter()
                .map(|record| ComparisonRowView {
                    field: record.field.clone(),
                    initial_value: record.initial_value.clone().unwrap_or_default(),
                    final_value: record.final_value.clone().unwrap_or_default(),
                    status: record.match_status(),
                    explanation: record.explanation.clone(),
                    evidence: record.evidence.join(", "),
                })
                .collect(),
            final_label: final_result.map(|result| result.label().to_string()),
            final_detail: final_result.and_then(|result| result.detail().map(ToOwned::to_owned)),
            banner: final_result
                .and_then(|result| result.verdict())
                .map(|verdict| VerdictBanner {
                    verdict,
                    text: verdict.banner_text(),
                }),
            dirty: state.is_dirty(),
        }
    }
}

fn or_unclear(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| UNCLEAR.to_string())
}
