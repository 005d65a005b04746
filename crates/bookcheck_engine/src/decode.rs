use bookcheck_logging::bc_warn;
use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown charset label {label:?}")]
    UnknownCharset { label: String },
}

/// Looks up an encoding by its WHATWG label.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, DecodeError> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| DecodeError::UnknownCharset {
        label: label.to_string(),
    })
}

/// Picks the stream encoding from a Content-Type header: its charset when known, UTF-8 otherwise.
pub fn encoding_for_content_type(content_type: Option<&str>) -> &'static Encoding {
    let Some(label) = content_type.and_then(extract_charset) else {
        return UTF_8;
    };
    match encoding_for_label(&label) {
        Ok(encoding) => encoding,
        Err(err) => {
            bc_warn!("{err}; decoding stream as UTF-8");
            UTF_8
        }
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()))
        })
        .next()
        .map(|s| s.to_string())
}

/// Incremental text decoder. Multi-byte sequences split across chunks are
/// carried over to the next call; a leading BOM overrides the configured encoding.
pub struct StreamTextDecoder {
    decoder: Decoder,
}

impl StreamTextDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
        }
    }

    /// Appends the text decoded from `bytes` to `out`. Pass `last = true` once
    /// at end of input to flush a dangling partial sequence as U+FFFD.
    pub fn decode_into(&mut self, bytes: &[u8], last: bool, out: &mut String) {
        let mut remaining = bytes;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(remaining.len())
                .unwrap_or(remaining.len() * 3 + 4);
            out.reserve(needed);
            let (result, read, _replaced) = self.decoder.decode_to_string(remaining, out, last);
            remaining = &remaining[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_is_read_from_content_type() {
        let enc = encoding_for_content_type(Some("text/event-stream; Charset=\"ISO-8859-1\""));
        assert_eq!(enc.name(), "windows-1252");
        assert_eq!(encoding_for_content_type(Some("text/event-stream")), UTF_8);
        assert_eq!(encoding_for_content_type(None), UTF_8);
    }

    #[test]
    fn unknown_charset_falls_back_to_utf8() {
        assert_eq!(
            encoding_for_label("klingon"),
            Err(DecodeError::UnknownCharset {
                label: "klingon".to_string()
            })
        );
        assert_eq!(
            encoding_for_content_type(Some("text/event-stream; charset=klingon")),
            UTF_8
        );
    }

    #[test]
    fn split_multibyte_sequence_is_carried_over() {
        let bytes = "héllo €".as_bytes();
        let mut decoder = StreamTextDecoder::new(UTF_8);
        let mut out = String::new();
        for byte in bytes {
            decoder.decode_into(std::slice::from_ref(byte), false, &mut out);
        }
        decoder.decode_into(&[], true, &mut out);
        assert_eq!(out, "héllo €");
    }

    #[test]
    fn dangling_sequence_is_flushed_as_replacement() {
        let mut decoder = StreamTextDecoder::new(UTF_8);
        let mut out = String::new();
        decoder.decode_into(&[b'a', 0xE2, 0x82], false, &mut out);
        assert_eq!(out, "a");
        decoder.decode_into(&[], true, &mut out);
        assert_eq!(out, "a\u{FFFD}");
    }
}
