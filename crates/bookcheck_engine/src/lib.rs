//! Bookcheck engine: multipart upload, SSE decoding and session execution.
mod assembler;
mod decode;
mod engine;
mod event;
mod frame;
mod sse;
mod types;
mod upload;

pub use assembler::BufferAssembler;
pub use decode::{encoding_for_content_type, encoding_for_label, DecodeError, StreamTextDecoder};
pub use engine::{EngineError, EngineHandle};
pub use event::{decode_payload, parse_error_event, PARSE_ERROR_MESSAGE};
pub use frame::{data_payloads, split_frames, FRAME_DELIMITER};
pub use sse::SseDecoder;
pub use types::{
    EngineEvent, FailureKind, SessionId, StreamEnd, StreamSummary, UploadError, UploadFile,
    UploadRequest,
};
pub use upload::{
    ChannelEventSink, EventSink, ReqwestUploader, UploadSettings, Uploader, CONTEXT_FIELD,
    FILES_FIELD,
};
