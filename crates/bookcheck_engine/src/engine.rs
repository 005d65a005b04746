use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use bookcheck_logging::bc_debug;
use tokio_util::sync::CancellationToken;

use crate::upload::{ChannelEventSink, ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, SessionId, UploadRequest};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Start {
        session: SessionId,
        request: UploadRequest,
    },
    Cancel,
}

/// Runs upload sessions on a background runtime. At most one session streams
/// at a time; starting another cancels the previous one.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings) -> Result<Self, EngineError> {
        Self::with_uploader(Arc::new(ReqwestUploader::new(settings)))
    }

    pub fn with_uploader(uploader: Arc<dyn Uploader>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut active: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start { session, request } => {
                        if let Some(previous) = active.take() {
                            previous.cancel();
                        }
                        let cancel = CancellationToken::new();
                        active = Some(cancel.clone());
                        let uploader = uploader.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_session(uploader.as_ref(), session, request, cancel, event_tx)
                                .await;
                        });
                    }
                    EngineCommand::Cancel => {
                        if let Some(active) = active.take() {
                            active.cancel();
                        }
                    }
                }
            }
            bc_debug!("Engine command channel closed; shutting down runtime");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn start(&self, session: SessionId, request: UploadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Start { session, request });
    }

    pub fn cancel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel);
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn run_session(
    uploader: &dyn Uploader,
    session: SessionId,
    request: UploadRequest,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelEventSink::new(session, event_tx.clone());
    let result = uploader.upload(request, &sink, &cancel).await;
    let _ = event_tx.send(EngineEvent::Finished { session, result });
}
