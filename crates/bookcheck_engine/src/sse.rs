use encoding_rs::{Encoding, UTF_8};
use serde_json::Value;

use crate::assembler::BufferAssembler;
use crate::decode::encoding_for_content_type;
use crate::event::decode_payload;
use crate::frame::data_payloads;

/// Turns response body chunks into decoded events, in arrival order.
///
/// The output does not depend on where chunk boundaries fall.
pub struct SseDecoder {
    assembler: BufferAssembler,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new(UTF_8)
    }
}

impl SseDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            assembler: BufferAssembler::new(encoding),
        }
    }

    pub fn for_content_type(content_type: Option<&str>) -> Self {
        Self::new(encoding_for_content_type(content_type))
    }

    /// Feeds one chunk and returns the events of every frame it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.assembler.push(chunk);
        self.drain()
    }

    /// Flushes the text decoder at end of input and returns any last events.
    pub fn finish(&mut self) -> Vec<Value> {
        self.assembler.finish();
        self.drain()
    }

    /// Drops the unterminated tail, returning it. It cannot be a complete frame.
    pub fn discard_pending(&mut self) -> String {
        self.assembler.discard()
    }

    fn drain(&mut self) -> Vec<Value> {
        let mut events = Vec::new();
        for frame in self.assembler.take_frames() {
            events.extend(data_payloads(&frame).into_iter().map(decode_payload));
        }
        events
    }
}
