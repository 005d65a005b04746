use crate::{FileCandidate, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post the files (and context, if any) and stream the response into the session.
    StartUpload {
        session: SessionId,
        files: Vec<FileCandidate>,
        context: Option<String>,
    },
    /// Stop reading the running session's stream.
    CancelUpload,
}
