use std::path::PathBuf;

/// Largest accepted image, in bytes.
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Minimum number of screenshots needed to compare a quote against a booking.
pub const MIN_FILES: usize = 2;

/// A file the user picked, described without reading its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileCandidate {
    pub fn dedupe_key(&self) -> String {
        format!("{}_{}", self.name, self.size)
    }

    pub fn is_acceptable(&self) -> bool {
        self.mime.starts_with("image/") && self.size <= MAX_FILE_BYTES
    }
}

/// Appends acceptable candidates to `current`. A repeated key replaces the
/// earlier entry but keeps its position.
pub(crate) fn merge_selection(
    mut current: Vec<FileCandidate>,
    incoming: Vec<FileCandidate>,
) -> Vec<FileCandidate> {
    for candidate in incoming.into_iter().filter(FileCandidate::is_acceptable) {
        let key = candidate.dedupe_key();
        match current.iter().position(|file| file.dedupe_key() == key) {
            Some(index) => current[index] = candidate,
            None => current.push(candidate),
        }
    }
    current
}
