//! Bookcheck core: event model, stream reducer and session state machine.
mod dispatch;
mod effect;
mod event;
mod msg;
mod selection;
mod state;
mod update;
mod view_model;

pub use dispatch::dispatch;
pub use effect::Effect;
pub use event::{
    ComparisonRecord, ExtractedFields, ExtractionRecord, FinalSummary, MatchStatus, StreamEvent,
    PARSE_ERROR_MESSAGE,
};
pub use msg::Msg;
pub use selection::{FileCandidate, MAX_FILE_BYTES, MIN_FILES};
pub use state::{
    AppState, FinalResult, LogEntry, LogLevel, SessionId, SessionState, StreamState, Verdict,
};
pub use update::update;
pub use view_model::{
    AppViewModel, ComparisonRowView, ExtractionRowView, FileRowView, VerdictBanner, UNCLEAR,
};
