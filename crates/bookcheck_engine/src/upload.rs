use std::time::Duration;

use bookcheck_logging::{bc_debug, bc_info, bc_trace, bc_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::sse::SseDecoder;
use crate::{
    EngineEvent, FailureKind, SessionId, StreamEnd, StreamSummary, UploadError, UploadRequest,
};

/// Multipart field repeated once per uploaded image.
pub const FILES_FIELD: &str = "files";
/// Optional multipart text field with the user's context.
pub const CONTEXT_FIELD: &str = "context";

const STREAM_PATH: &str = "stream";

#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Base URL of the analysis service; requests go to `{backend_url}/stream`.
    pub backend_url: String,
    pub connect_timeout: Duration,
    /// Ends an open stream after this long. `None` reads until the server closes.
    pub stream_timeout: Option<Duration>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            stream_timeout: None,
        }
    }
}

/// Receives each decoded event as soon as its frame is complete.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Value);
}

/// Forwards events to the engine's event channel, tagged with their session.
pub struct ChannelEventSink {
    session: SessionId,
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(session: SessionId, tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { session, tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: Value) {
        let _ = self.tx.send(EngineEvent::Stream {
            session: self.session,
            event,
        });
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Posts the request and streams the response into `sink` until the server
    /// closes, `cancel` fires, or the stream timeout elapses.
    async fn upload(
        &self,
        request: UploadRequest,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .build()
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))
    }

    fn endpoint(&self) -> Result<Url, UploadError> {
        let base = self.settings.backend_url.trim_end_matches('/');
        Url::parse(&format!("{base}/{STREAM_PATH}"))
            .map_err(|err| UploadError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

pub(crate) async fn build_form(request: UploadRequest) -> Result<Form, UploadError> {
    let mut form = Form::new();
    for file in request.files {
        let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
            UploadError::new(
                FailureKind::FileRead,
                format!("{}: {err}", file.path.display()),
            )
        })?;
        let part = Part::bytes(bytes)
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|err| UploadError::new(FailureKind::InvalidRequest, err.to_string()))?;
        form = form.part(FILES_FIELD, part);
    }
    if let Some(context) = request.context.filter(|context| !context.is_empty()) {
        form = form.text(CONTEXT_FIELD, context);
    }
    Ok(form)
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        request: UploadRequest,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, UploadError> {
        let url = self.endpoint()?;
        let client = self.build_client()?;
        let file_count = request.files.len();
        let form = build_form(request).await?;

        let deadline = self
            .settings
            .stream_timeout
            .map(|timeout| tokio::time::Instant::now() + timeout);
        let timeout = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(timeout);

        bc_info!("Posting {} file(s) to {}", file_count, url);
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                bc_info!("Upload cancelled before the response arrived");
                return Ok(StreamSummary {
                    end: StreamEnd::Cancelled,
                    events: 0,
                    discarded_bytes: 0,
                });
            }
            _ = &mut timeout => {
                return Err(UploadError::new(
                    FailureKind::Timeout,
                    "no response before the stream timeout",
                ));
            }
            result = client.post(url).multipart(form).send() => result.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        bc_debug!("Response {} content-type {:?}", status, content_type);

        let mut decoder = SseDecoder::for_content_type(content_type.as_deref());
        let mut events = 0usize;
        let mut stream = response.bytes_stream();

        // Every event from one chunk reaches the sink before the next read.
        let end = loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break StreamEnd::Cancelled,
                _ = &mut timeout => break StreamEnd::TimedOut,
                next = stream.next() => next,
            };
            match next {
                Some(Ok(chunk)) => {
                    bc_trace!("Read {} byte(s) of stream body", chunk.len());
                    for event in decoder.push(&chunk) {
                        sink.emit(event);
                        events += 1;
                    }
                }
                Some(Err(err)) => return Err(map_reqwest_error(err)),
                None => {
                    for event in decoder.finish() {
                        sink.emit(event);
                        events += 1;
                    }
                    break StreamEnd::Completed;
                }
            }
        };

        let pending = decoder.discard_pending();
        if !pending.is_empty() {
            bc_warn!(
                "Discarding {} byte(s) of unterminated SSE data at stream end",
                pending.len()
            );
        }
        bc_info!("Stream ended ({:?}) after {} event(s)", end, events);

        Ok(StreamSummary {
            end,
            events,
            discarded_bytes: pending.len(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return UploadError::new(FailureKind::InvalidRequest, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
