use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use dashboard_client::HttpAnalysisService;
use dashboard_core::{update, AppState, Msg};
use dashboard_logging::{dash_debug, dash_info};

use super::commands::{self, Command, HELP};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::render::render;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Line(String),
    Service(Msg),
    Warning(String),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    logging::initialize(config.log_destination, config.level());
    dash_info!("Starting dashboard against {}", config.api_base_url);

    let query = config
        .initial_query()
        .context("invalid page_size in configuration")?;
    let service = HttpAnalysisService::new(&config.service_settings())
        .context("building the analysis service client")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(Arc::new(service), event_tx.clone())
        .context("starting the service runtime")?;
    runner.check_health();
    spawn_input_reader(event_tx);

    println!("{HELP}");
    let mut state = AppState::with_query(query);
    state = dispatch(state, Msg::RefreshClicked, &runner);
    print_screen(&mut state);

    'events: while let Ok(first) = event_rx.recv() {
        // Drain whatever else is queued so a burst of responses renders once.
        let batch: Vec<AppEvent> = std::iter::once(first).chain(event_rx.try_iter()).collect();
        for event in batch {
            let (next, keep_running) = handle_event(state, event, &runner);
            state = next;
            if !keep_running {
                break 'events;
            }
        }
        print_screen(&mut state);
    }

    dash_info!("Dashboard exiting");
    Ok(())
}

fn handle_event(mut state: AppState, event: AppEvent, runner: &EffectRunner) -> (AppState, bool) {
    match event {
        AppEvent::Line(line) => match commands::parse(&line, &state.view()) {
            Command::Dispatch(msgs) => {
                for msg in msgs {
                    state = dispatch(state, msg, runner);
                }
            }
            Command::Help => {
                println!("{HELP}");
                prompt();
            }
            Command::Quit => return (state, false),
            Command::Invalid(message) => {
                println!("? {message}");
                prompt();
            }
        },
        AppEvent::Service(msg) => state = dispatch(state, msg, runner),
        AppEvent::Warning(message) => {
            println!("! {message}");
            prompt();
        }
        AppEvent::InputClosed => return (state, false),
    }
    (state, true)
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    dash_debug!("Dispatching {:?}", msg);
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}

fn print_screen(state: &mut AppState) {
    if !state.consume_dirty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "\n{}> ", render(&state.view()));
    let _ = stdout.flush();
}

fn prompt() {
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "> ");
    let _ = stdout.flush();
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if event_tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}
