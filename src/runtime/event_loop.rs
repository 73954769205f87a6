use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Intent, Transition};
use crate::clock::{ClockTick, ProgressClock, TickRates};
use crate::config;
use crate::process::{ProcessState, TrackId};
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a track row stays highlighted after its state changed.
const FLASH_FOR: Duration = Duration::from_millis(500);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    flash: Option<(TrackId, Instant)>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a state change so the UI can briefly highlight its row.
    fn note(&mut self, transition: Option<Transition>) {
        if let Some(t) = transition.filter(Transition::changed) {
            self.flash = Some((t.track, Instant::now()));
        }
    }

    /// The track row to highlight right now, if any.
    pub fn highlight(&self) -> Option<TrackId> {
        self.flash
            .filter(|(_, at)| at.elapsed() < FLASH_FOR)
            .map(|(id, _)| id)
    }
}

/// Main terminal event loop: draws, applies clock ticks and key presses, and
/// keeps the progress clock in step with the app. Returns `Ok(())` when
/// shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    clock: &mut ProgressClock,
    clock_rx: &mpsc::Receiver<ClockTick>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    let rates = TickRates::from_settings(settings);

    loop {
        let highlight = state.highlight();
        terminal
            .draw(|f| ui::draw(f, app, highlight, &settings.ui, &settings.controls))
            .context("failed to draw frame")?;

        while let Ok(tick) = clock_rx.try_recv() {
            if !clock.accepts(tick) {
                log::trace!("dropping stale tick (generation {})", tick.generation);
                continue;
            }
            handle_clock_tick(settings, &rates, app, state);
            clock.sync(app.clock_should_run(), app.current_id());
        }

        if event::poll(POLL_INTERVAL).context("failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("failed to read terminal event")? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state) {
                    break;
                }
                clock.sync(app.clock_should_run(), app.current_id());
            }
        }
    }

    clock.stop();
    Ok(())
}

/// Advance the current track by one tick; on completion optionally move on
/// to the next track.
pub(super) fn handle_clock_tick(
    settings: &config::Settings,
    rates: &TickRates,
    app: &mut App,
    state: &mut EventLoopState,
) {
    let before = app.current_track().map(|t| (t.id, t.state));
    if !app.on_clock_tick(rates) {
        return;
    }

    if let Some((track, from)) = before {
        state.note(Some(Transition {
            track,
            from,
            to: ProcessState::End,
        }));
    }

    if settings.playback.auto_advance {
        dispatch(app, state, Intent::Next);
        app.cursor_to_current();
    }
}

fn dispatch(app: &mut App, state: &mut EventLoopState, intent: Intent) {
    log::debug!("intent {intent:?}");
    let transition = app.apply(intent);
    state.note(transition);
}

/// Map one key press onto cursor moves or intents. Returns true on quit.
pub(super) fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.cursor_to_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.cursor_to_last(),
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Enter => {
            if let Some(id) = app.cursor_track().map(|t| t.id) {
                dispatch(app, state, Intent::Select(id));
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => dispatch(app, state, Intent::PlayPause),
        KeyCode::Char('l') | KeyCode::Char('n') => {
            dispatch(app, state, Intent::Next);
            app.cursor_to_current();
        }
        KeyCode::Char('L') => seek_by(app, state, settings.controls.seek_step),
        KeyCode::Char('H') => seek_by(app, state, -settings.controls.seek_step),
        KeyCode::Char(c @ '0'..='9') => {
            let digit = f64::from(c as u8 - b'0');
            dispatch(app, state, Intent::Seek(digit * 10.0));
        }
        KeyCode::Char('x') => dispatch(app, state, Intent::Terminate),
        KeyCode::Char('i') => dispatch(app, state, Intent::Interrupt),
        KeyCode::Char('K') => app.toggle_details_window(),
        _ => {}
    }

    false
}

fn seek_by(app: &mut App, state: &mut EventLoopState, delta: f64) {
    if let Some(progress) = app.current_track().map(|t| t.progress) {
        dispatch(app, state, Intent::Seek(progress + delta));
    }
}
