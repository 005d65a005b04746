use std::io::{self, Stdout};
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::Context;
use bookcheck_core::{update, AppState, Msg, SessionState};
use bookcheck_logging::{bc_debug, bc_info};
use clap::Parser;

use super::cli::Cli;
use super::effects::EffectRunner;
use super::ui::TerminalRenderer;
use super::{config, files, logging};

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = config::load(&cli).context("loading settings")?;
    logging::initialize(&config);
    bc_info!(
        "Starting bookcheck backend={} images={}",
        config.upload.backend_url,
        cli.images.len()
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects =
        EffectRunner::new(config.upload.clone(), msg_tx.clone()).context("starting upload engine")?;

    let interrupt_tx = msg_tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(Msg::ClearClicked);
    })
    .context("installing Ctrl-C handler")?;

    let candidates = files::candidates_from_paths(&cli.images, &mut io::stdout())?;
    let mut app = App::new(effects, TerminalRenderer::new(io::stdout()));
    app.step(Msg::FilesSelected(candidates))?;
    app.renderer.render_selection(&app.state.view())?;
    if let Some(context) = cli.context.clone() {
        app.step(Msg::ContextChanged(context))?;
    }
    app.step(Msg::StartClicked)?;

    let mut cancelled = false;
    while app.state.session() == SessionState::Running {
        let Ok(msg) = msg_rx.recv() else {
            break;
        };
        if msg == Msg::ClearClicked {
            cancelled = true;
        }
        app.step(msg)?;
    }

    if cancelled {
        bc_info!("Session cancelled by user");
        println!("Cancelled.");
        return Ok(ExitCode::FAILURE);
    }

    let view = app.state.view();
    app.renderer.render_summary(&view)?;
    bc_info!("Done final={:?}", view.final_label);
    Ok(if view.final_label.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

struct App {
    state: AppState,
    effects: EffectRunner,
    renderer: TerminalRenderer<Stdout>,
}

impl App {
    fn new(effects: EffectRunner, renderer: TerminalRenderer<Stdout>) -> Self {
        Self {
            state: AppState::new(),
            effects,
            renderer,
        }
    }

    fn step(&mut self, msg: Msg) -> io::Result<()> {
        if msg != Msg::Tick {
            bc_debug!("Msg {:?}", msg);
        }
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.effects.run(effects);
        if state.consume_dirty() {
            self.renderer.render(&state.view())?;
        }
        self.state = state;
        Ok(())
    }
}
