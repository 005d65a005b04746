use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

pub type SessionId = u64;

/// One image to post, read from disk when the upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
    /// Sent as the `context` form field when present.
    pub context: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server closed the response body.
    Completed,
    /// The caller cancelled the session.
    Cancelled,
    /// The configured stream timeout elapsed.
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub end: StreamEnd,
    /// Events handed to the sink, synthesized ones included.
    pub events: usize,
    /// Undelivered partial-frame text dropped at the end, in bytes.
    pub discarded_bytes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// One decoded `data:` payload, in arrival order.
    Stream { session: SessionId, event: Value },
    /// The session's read loop ended.
    Finished {
        session: SessionId,
        result: Result<StreamSummary, UploadError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct UploadError {
    pub kind: FailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    FileRead,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::FileRead => write!(f, "file read error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
