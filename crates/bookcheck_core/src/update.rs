use crate::selection::{merge_selection, MIN_FILES};
use crate::state::LogLevel;
use crate::{dispatch, AppState, Effect, Msg, SessionState, StreamEvent};

const START_MESSAGE: &str = "Uploading images and starting processing...";
const TOO_FEW_FILES_MESSAGE: &str = "Select at least two images.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(candidates) => {
            if candidates.is_empty() {
                return (state, Vec::new());
            }
            let merged = merge_selection(state.files().to_vec(), candidates);
            if merged != state.files() {
                state.set_files(merged);
            }
            Vec::new()
        }
        Msg::ContextChanged(context) => {
            state.set_context(context);
            Vec::new()
        }
        Msg::StartClicked => {
            if state.session() == SessionState::Running {
                return (state, Vec::new());
            }
            if state.files().len() < MIN_FILES {
                state
                    .stream_mut()
                    .push_log(LogLevel::Warn, TOO_FEW_FILES_MESSAGE);
                return (state, Vec::new());
            }

            let session = state.begin_session();
            state.stream_mut().push_log(LogLevel::Info, START_MESSAGE);

            let context = if state.context().trim().is_empty() {
                None
            } else {
                Some(state.context().to_string())
            };
            vec![Effect::StartUpload {
                session,
                files: state.files().to_vec(),
                context,
            }]
        }
        Msg::ClearClicked => {
            let was_running = state.session() == SessionState::Running;
            state.reset();
            if was_running {
                vec![Effect::CancelUpload]
            } else {
                Vec::new()
            }
        }
        Msg::StreamEvent { session, event } => {
            if !state.accepts(session) {
                return (state, Vec::new());
            }
            let is_final = matches!(event, StreamEvent::Final(_));
            let stream = std::mem::take(state.stream_mut());
            state.replace_stream(dispatch(stream, &event));
            if is_final && state.stream().final_result().is_some() {
                state.finish_session();
            }
            Vec::new()
        }
        Msg::UploadFailed { session, message } => {
            if !state.accepts(session) {
                return (state, Vec::new());
            }
            state.stream_mut().push_log(LogLevel::Error, message);
            state.finish_session();
            Vec::new()
        }
        Msg::StreamClosed { session } => {
            if state.accepts(session) {
                state.finish_session();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
