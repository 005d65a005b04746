use crate::event::{ComparisonRecord, ExtractionRecord};
use crate::selection::FileCandidate;
use crate::view_model::AppViewModel;

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Success => "success",
        }
    }
}

/// One line of the user-facing stream log. Timestamps are applied at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub text: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
    Unclear,
}

impl Verdict {
    pub fn banner_text(self) -> &'static str {
        match self {
            Verdict::Match => "Initial quote and booking match!",
            Verdict::Mismatch => "Initial quote and booking do not match",
            Verdict::Unclear => "Unable to determine if initial quote and booking match",
        }
    }
}

/// Terminal verdict of a session, stored upper-cased exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResult {
    label: String,
    detail: Option<String>,
}

impl FinalResult {
    pub fn new(overall: &str, detail: Option<String>) -> Self {
        Self {
            label: overall.to_uppercase(),
            detail,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// `None` for labels outside MATCH/MISMATCH/UNCLEAR.
    pub fn verdict(&self) -> Option<Verdict> {
        match self.label.as_str() {
            "MATCH" => Some(Verdict::Match),
            "MISMATCH" => Some(Verdict::Mismatch),
            "UNCLEAR" => Some(Verdict::Unclear),
            _ => None,
        }
    }
}

/// Everything accumulated from one upload session's event stream.
///
/// `logs`, `extractions` and `comparisons` only ever grow; `final_result`
/// is assigned at most once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamState {
    logs: Vec<LogEntry>,
    extractions: Vec<ExtractionRecord>,
    comparisons: Vec<ComparisonRecord>,
    final_result: Option<FinalResult>,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn extractions(&self) -> &[ExtractionRecord] {
        &self.extractions
    }

    pub fn comparisons(&self) -> &[ComparisonRecord] {
        &self.comparisons
    }

    pub fn final_result(&self) -> Option<&FinalResult> {
        self.final_result.as_ref()
    }

    pub(crate) fn push_log(&mut self, level: LogLevel, text: impl Into<String>) {
        self.logs.push(LogEntry::new(level, text));
    }

    pub(crate) fn push_extraction(&mut self, record: ExtractionRecord) {
        self.extractions.push(record);
    }

    pub(crate) fn push_comparison(&mut self, record: ComparisonRecord) {
        self.comparisons.push(record);
    }

    /// Returns `false` without touching state when a result is already set.
    pub(crate) fn set_final_result(&mut self, result: FinalResult) -> bool {
        if self.final_result.is_some() {
            return false;
        }
        self.final_result = Some(result);
        true
    }
}

/// Whole client state: file selection, context text, and the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    files: Vec<FileCandidate>,
    context: String,
    session: SessionState,
    session_id: SessionId,
    stream: StreamState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    pub fn files(&self) -> &[FileCandidate] {
        &self.files
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn stream(&self) -> &StreamState {
        &self.stream
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reports whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_files(&mut self, files: Vec<FileCandidate>) {
        self.files = files;
        self.dirty = true;
    }

    pub(crate) fn set_context(&mut self, context: String) {
        if self.context != context {
            self.context = context;
            self.dirty = true;
        }
    }

    pub(crate) fn stream_mut(&mut self) -> &mut StreamState {
        self.dirty = true;
        &mut self.stream
    }

    pub(crate) fn replace_stream(&mut self, stream: StreamState) {
        self.stream = stream;
        self.dirty = true;
    }

    /// Starts a fresh session and returns its id.
    pub(crate) fn begin_session(&mut self) -> SessionId {
        self.session_id += 1;
        self.session = SessionState::Running;
        self.stream = StreamState::new();
        self.dirty = true;
        self.session_id
    }

    pub(crate) fn finish_session(&mut self) {
        if self.session != SessionState::Finished {
            self.session = SessionState::Finished;
            self.dirty = true;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.files.clear();
        self.context.clear();
        self.session = SessionState::Idle;
        self.stream = StreamState::new();
        self.dirty = true;
    }

    /// True when events tagged with `session` belong to the live session.
    pub(crate) fn accepts(&self, session: SessionId) -> bool {
        session == self.session_id && self.session != SessionState::Idle
    }
}
