use std::env;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::clock::{ClockTick, ProgressClock};
use crate::config;
use crate::process::build_catalog;

mod event_loop;
mod logging;
mod settings;


const USAGE: &str = "\
usage: proctune [--dump-config | --help]

Plays a simulated track catalog as processes and threads in the terminal.

options:
  --dump-config   print the effective settings as TOML and exit
  -h, --help      print this help and exit

config: $PROCTUNE_CONFIG_PATH, else $XDG_CONFIG_HOME/proctune/config.toml
        env overrides use PROCTUNE__SECTION__KEY";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run,
    DumpConfig,
    Help,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Command> {
    let mut command = Command::Run;
    for arg in args {
        command = match arg.as_str() {
            "--dump-config" => Command::DumpConfig,
            "-h" | "--help" => return Ok(Command::Help),
            other => anyhow::bail!("unknown argument `{other}`\n\n{USAGE}"),
        };
    }
    Ok(command)
}

pub fn run() -> anyhow::Result<()> {
    let command = parse_args(env::args().skip(1))?;
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let (settings, fallback) = settings::load_settings();

    if command == Command::DumpConfig {
        if let Some(e) = &fallback {
            eprintln!("proctune: {e}; showing defaults");
        }
        let toml = settings.to_toml().context("failed to render settings")?;
        print!("{toml}");
        return Ok(());
    }

    if let Err(e) = logging::init(&settings.logging) {
        eprintln!("proctune: logging disabled: {e:#}");
    }
    log::info!(
        "starting with config {}",
        config::resolve_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );
    if let Some(e) = &fallback {
        log::warn!("{e}; using defaults");
        eprintln!("proctune: {e}; using defaults");
    }

    let mut app = App::new(build_catalog(&settings.tracks));
    log::info!(
        "catalog ready: {} processes, {} threads",
        app.tracks.len(),
        app.thread_count()
    );

    let (clock_tx, clock_rx) = mpsc::channel::<ClockTick>();
    let mut clock = ProgressClock::new(Duration::from_millis(settings.clock.tick_ms), clock_tx);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("failed to enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
            return Err(e).context("failed to set up terminal");
        }
    };

    let run_result = {
        let mut state = event_loop::EventLoopState::new();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut clock,
            &clock_rx,
            &mut state,
        )
    };
    clock.stop();

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    match &run_result {
        Ok(()) => log::info!("shutting down"),
        Err(e) => log::error!("event loop failed: {e:#}"),
    }
    run_result
}
