use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bookcheck_core::{FileCandidate, MAX_FILE_BYTES};
use bookcheck_logging::{bc_info, bc_warn};

/// Describes each path for selection. Unreadable paths are skipped; non-images
/// and oversized files are kept here and dropped by the reducer. Every skip is
/// reported on `notices`, the same channel the stream log is rendered to.
pub fn candidates_from_paths<W: Write>(
    paths: &[PathBuf],
    notices: &mut W,
) -> io::Result<Vec<FileCandidate>> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        match describe(path) {
            Ok(candidate) => {
                if !candidate.is_acceptable() {
                    bc_info!("Skipping {:?}: mime={} size={}", path, candidate.mime, candidate.size);
                    writeln!(
                        notices,
                        "Skipping {}: expected an image of at most {} MB",
                        path.display(),
                        MAX_FILE_BYTES / (1024 * 1024)
                    )?;
                }
                candidates.push(candidate);
            }
            Err(err) => {
                bc_warn!("Cannot read {:?}: {}", path, err);
                writeln!(notices, "Skipping {}: {err}", path.display())?;
            }
        }
    }
    Ok(candidates)
}

fn describe(path: &Path) -> io::Result<FileCandidate> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(FileCandidate {
        path: path.to_path_buf(),
        name,
        size: metadata.len(),
        mime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn describes_images_and_skips_missing_paths() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("quote.PNG");
        let notes = dir.path().join("notes.txt");
        fs::write(&image, [0u8; 16]).unwrap();
        fs::write(&notes, "hello").unwrap();

        let mut notices = Vec::new();
        let candidates = candidates_from_paths(
            &[image.clone(), dir.path().join("missing.jpg"), notes],
            &mut notices,
        )
        .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "quote.PNG");
        assert_eq!(candidates[0].size, 16);
        assert_eq!(candidates[0].mime, "image/png");
        assert!(candidates[0].is_acceptable());
        assert_eq!(candidates[1].mime, "text/plain");
        assert!(!candidates[1].is_acceptable());

        let notices = String::from_utf8(notices).unwrap();
        let lines: Vec<&str> = notices.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Skipping ") && lines[0].contains("missing.jpg"));
        assert!(lines[1].ends_with("notes.txt: expected an image of at most 5 MB"));
    }
}
