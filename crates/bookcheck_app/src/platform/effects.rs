use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use bookcheck_core::{Effect, FileCandidate, Msg, StreamEvent};
use bookcheck_engine::{
    EngineError, EngineEvent, EngineHandle, StreamEnd, UploadFile, UploadRequest, UploadSettings,
};
use bookcheck_logging::{bc_error, bc_info, bc_warn};

const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: UploadSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartUpload {
                    session,
                    files,
                    context,
                } => {
                    bc_info!(
                        "StartUpload session={} files={} context_len={}",
                        session,
                        files.len(),
                        context.as_deref().map_or(0, str::len)
                    );
                    self.engine.start(session, upload_request(files, context));
                }
                Effect::CancelUpload => {
                    bc_info!("CancelUpload");
                    self.engine.cancel();
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let msg = match engine.recv_timeout(POLL_INTERVAL) {
                Some(event) => map_engine_event(event),
                None => Msg::Tick,
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        });
    }
}

fn upload_request(files: Vec<FileCandidate>, context: Option<String>) -> UploadRequest {
    UploadRequest {
        files: files
            .into_iter()
            .map(|file| UploadFile {
                path: file.path,
                name: file.name,
                mime: file.mime,
            })
            .collect(),
        context,
    }
}

fn map_engine_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Stream { session, event } => Msg::StreamEvent {
            session,
            event: StreamEvent::from_json(event),
        },
        EngineEvent::Finished { session, result } => match result {
            Ok(summary) => {
                if summary.end == StreamEnd::TimedOut {
                    bc_warn!("Session {} stream timed out after {} event(s)", session, summary.events);
                }
                Msg::StreamClosed { session }
            }
            Err(err) => {
                bc_error!("Session {} failed: {}", session, err);
                Msg::UploadFailed {
                    session,
                    message: err.to_string(),
                }
            }
        },
    }
}
