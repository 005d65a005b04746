use encoding_rs::Encoding;

use crate::decode::StreamTextDecoder;
use crate::frame::split_frames;

/// Accumulates decoded text from a byte stream and hands out complete frames.
///
/// Only the unterminated tail is retained between calls.
pub struct BufferAssembler {
    decoder: StreamTextDecoder,
    buffer: String,
}

impl BufferAssembler {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: StreamTextDecoder::new(encoding),
            buffer: String::new(),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.decoder.decode_into(chunk, false, &mut self.buffer);
    }

    /// Flushes the text decoder at end of input.
    pub fn finish(&mut self) {
        self.decoder.decode_into(&[], true, &mut self.buffer);
    }

    /// Removes and returns every complete frame, keeping the tail buffered.
    pub fn take_frames(&mut self) -> Vec<String> {
        let (frames, rest) = split_frames(&self.buffer);
        if frames.is_empty() {
            return Vec::new();
        }
        let consumed = self.buffer.len() - rest.len();
        let frames = frames.into_iter().map(ToOwned::to_owned).collect();
        self.buffer.drain(..consumed);
        frames
    }

    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Drops the buffered tail, returning it.
    pub fn discard(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;

    #[test]
    fn delimiter_split_across_chunks_is_reassembled() {
        let mut assembler = BufferAssembler::new(UTF_8);
        assembler.push(b"data: 1\n");
        assert!(assembler.take_frames().is_empty());
        assert_eq!(assembler.pending(), "data: 1\n");

        assembler.push(b"\ndata: 2");
        assert_eq!(assembler.take_frames(), vec!["data: 1".to_string()]);
        assert_eq!(assembler.pending(), "data: 2");

        assert_eq!(assembler.discard(), "data: 2");
        assert_eq!(assembler.pending(), "");
    }
}
