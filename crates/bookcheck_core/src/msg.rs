use crate::{FileCandidate, SessionId, StreamEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked (or dropped) files; unacceptable ones are filtered out.
    FilesSelected(Vec<FileCandidate>),
    /// User edited the free-text context.
    ContextChanged(String),
    /// User asked to start validation.
    StartClicked,
    /// User cleared the form, cancelling any running upload.
    ClearClicked,
    /// Engine decoded one event for a session.
    StreamEvent {
        session: SessionId,
        event: StreamEvent,
    },
    /// Engine could not complete the upload or lost the stream.
    UploadFailed { session: SessionId, message: String },
    /// Engine reached the end of the response stream.
    StreamClosed { session: SessionId },
    /// Render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
