//! SSE framing: blank-line delimited messages carrying `data:` lines.

/// Separates two SSE messages.
pub const FRAME_DELIMITER: &str = "\n\n";

const DATA_MARKER: &str = "data:";

/// Splits `buffer` into complete frames and the unterminated tail.
///
/// Delimiters are matched left to right without overlap. A buffer with no
/// delimiter yields no frames and is returned whole as the tail.
pub fn split_frames(buffer: &str) -> (Vec<&str>, &str) {
    let mut parts: Vec<&str> = buffer.split(FRAME_DELIMITER).collect();
    let rest = parts.pop().unwrap_or_default();
    (parts, rest)
}

/// Extracts every `data:` value of a frame, one payload per line.
///
/// Lines are trimmed and blank lines skipped; other SSE fields (`event:`,
/// `id:`, comments) are ignored. Multi-line data is not joined.
pub fn data_payloads(frame: &str) -> Vec<&str> {
    frame
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.strip_prefix(DATA_MARKER))
        .map(str::trim)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_delimiter_means_no_frames() {
        assert_eq!(split_frames("data: {\"a\":1}"), (vec![], "data: {\"a\":1}"));
        assert_eq!(split_frames(""), (vec![], ""));
    }

    #[test]
    fn trailing_delimiter_leaves_empty_tail() {
        assert_eq!(split_frames("data: 1\n\ndata: 2\n\n"), (vec!["data: 1", "data: 2"], ""));
    }

    #[test]
    fn odd_newline_run_stays_in_tail() {
        assert_eq!(split_frames("data: 1\n\n\n"), (vec!["data: 1"], "\n"));
    }

    #[test]
    fn each_data_line_is_a_payload() {
        let frame = "event: update\n  data: {\"a\":1}  \n\n: comment\ndata:{\"b\":2}\nid: 7";
        assert_eq!(data_payloads(frame), vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        assert_eq!(data_payloads("data: x\r\ndata: y\r"), vec!["x", "y"]);
    }
}
