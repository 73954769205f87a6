use super::*;
use crate::clock::TickRates;
use crate::config::TrackSeed;
use crate::process::{ProcessState, Track, TrackId, build_catalog, builtin_seeds};
use std::time::Duration;

fn seed(title: &str, state: ProcessState, progress: f64) -> TrackSeed {
    TrackSeed {
        title: title.into(),
        artist: "Artist".into(),
        duration: 10,
        cover: String::new(),
        state,
        progress,
    }
}

/// The shipped catalog: states [new, ready, waiting, end].
fn app() -> App {
    App::new(build_catalog(&builtin_seeds()))
}

fn id(app: &App, idx: usize) -> TrackId {
    app.tracks[idx].id
}

fn all_threads_active(track: &Track) -> bool {
    track.threads.iter().all(|t| t.active)
}

fn no_threads_active(track: &Track) -> bool {
    track.threads.iter().all(|t| !t.active)
}

fn threads_reset(track: &Track) -> bool {
    no_threads_active(track) && track.threads.iter().all(|t| t.progress == 0.0)
}

fn assert_invariants(app: &App) {
    for t in &app.tracks {
        assert!(
            (0.0..=100.0).contains(&t.progress),
            "{} progress {}",
            t.title,
            t.progress
        );
        if t.state != ProcessState::Running && Some(t.id) == app.current_id() {
            assert!(
                no_threads_active(t),
                "{} has active threads while {}",
                t.title,
                t.state
            );
        }
    }
}

#[test]
fn walkthrough_select_play_complete() {
    let mut app = app();
    let first = id(&app, 0);

    app.select(first);
    assert_eq!(app.tracks[0].state, ProcessState::Ready);
    assert_eq!(app.current_id(), Some(first));

    app.play_pause();
    assert!(app.is_playing());
    assert_eq!(app.tracks[0].state, ProcessState::Running);
    assert!(all_threads_active(&app.tracks[0]));

    app.progress_tick(100.0);
    assert_eq!(app.tracks[0].state, ProcessState::End);
    assert_eq!(app.tracks[0].progress, 100.0);
    assert!(no_threads_active(&app.tracks[0]));
    assert!(!app.is_playing());
    assert_invariants(&app);
}

#[test]
fn operations_without_current_track_are_noops() {
    let mut app = app();
    let snapshot = app.tracks.clone();

    app.play_pause();
    app.terminate();
    app.interrupt();
    app.progress_tick(50.0);
    app.seek(30.0);

    assert_eq!(app.tracks, snapshot);
    assert!(!app.is_playing());
    assert_eq!(app.current_id(), None);
    assert_eq!(app.apply(Intent::Terminate), None);
}

#[test]
fn select_promotes_new_only_once_and_leaves_other_states() {
    let mut app = app();
    for idx in 0..app.tracks.len() {
        let before = app.tracks[idx].state;
        app.select(id(&app, idx));
        let expected = if before == ProcessState::New {
            ProcessState::Ready
        } else {
            before
        };
        assert_eq!(app.tracks[idx].state, expected);
    }

    // Selecting again does not move a READY track anywhere.
    app.select(id(&app, 0));
    assert_eq!(app.tracks[0].state, ProcessState::Ready);
}

#[test]
fn select_unknown_id_is_ignored() {
    let mut app = app();
    app.select(TrackId(42));
    assert_eq!(app.current_id(), None);
}

#[test]
fn select_touches_only_the_named_track() {
    let mut app = app();
    let others: Vec<Track> = app.tracks[1..].to_vec();
    app.select(id(&app, 0));
    assert_eq!(&app.tracks[1..], others.as_slice());
}

#[test]
fn play_pause_toggles_running_and_waiting() {
    let mut app = app();
    app.select(id(&app, 2)); // waiting

    app.play_pause();
    assert_eq!(app.tracks[2].state, ProcessState::Running);
    assert!(all_threads_active(&app.tracks[2]));
    assert!(app.clock_should_run());

    app.play_pause();
    assert_eq!(app.tracks[2].state, ProcessState::Waiting);
    assert!(no_threads_active(&app.tracks[2]));
    assert!(!app.is_playing());
    assert!(!app.clock_should_run());
}

#[test]
fn play_pause_on_terminated_track_does_nothing() {
    let mut app = app();
    app.select(id(&app, 3)); // end
    let snapshot = app.tracks.clone();

    app.play_pause();
    assert_eq!(app.tracks, snapshot);
    assert!(!app.is_playing());
}

#[test]
fn progress_tick_clamps_negative_and_nan() {
    let mut app = app();
    app.select(id(&app, 1));

    app.progress_tick(-5.0);
    assert_eq!(app.tracks[1].progress, 0.0);
    app.progress_tick(f64::NAN);
    assert_eq!(app.tracks[1].progress, 0.0);
    app.progress_tick(42.0);
    assert_eq!(app.tracks[1].progress, 42.0);
    assert_eq!(app.tracks[1].state, ProcessState::Ready);
}

#[test]
fn progress_tick_treats_infinities_as_zero() {
    let mut app = app();
    app.select(id(&app, 0));
    app.play_pause();

    app.progress_tick(f64::INFINITY);
    assert_eq!(app.tracks[0].progress, 0.0);
    assert_eq!(app.tracks[0].state, ProcessState::Running);
    assert!(app.is_playing());

    app.progress_tick(f64::NEG_INFINITY);
    assert_eq!(app.tracks[0].progress, 0.0);
    assert_eq!(app.tracks[0].state, ProcessState::Running);
    assert_invariants(&app);
}

#[test]
fn progress_past_100_completes_by_tick_or_seek() {
    let mut by_tick = app();
    by_tick.select(id(&by_tick, 1));
    by_tick.play_pause();
    by_tick.progress_tick(250.0);

    let mut by_seek = app();
    by_seek.select(id(&by_seek, 1));
    by_seek.play_pause();
    by_seek.seek(250.0);

    for app in [&by_tick, &by_seek] {
        let t = &app.tracks[1];
        assert_eq!(t.state, ProcessState::End);
        assert_eq!(t.progress, 100.0);
        assert!(no_threads_active(t));
        assert!(!app.is_playing());
    }
}

#[test]
fn seek_clamps_and_ignores_terminated_tracks() {
    let mut app = app();
    app.select(id(&app, 2));
    app.seek(-10.0);
    assert_eq!(app.tracks[2].progress, 0.0);
    app.seek(33.0);
    assert_eq!(app.tracks[2].progress, 33.0);
    assert_eq!(app.tracks[2].state, ProcessState::Waiting);

    app.select(id(&app, 3));
    app.seek(10.0);
    assert_eq!(app.tracks[3].progress, 100.0);
    assert_eq!(app.tracks[3].state, ProcessState::End);
}

#[test]
fn terminate_is_idempotent_and_resets_threads() {
    let mut app = app();
    app.select(id(&app, 0));
    app.play_pause();

    app.terminate();
    let once = app.tracks.clone();
    assert_eq!(once[0].state, ProcessState::End);
    assert_eq!(once[0].progress, 100.0);
    assert!(threads_reset(&once[0]));
    assert!(!app.is_playing());

    app.terminate();
    assert_eq!(app.tracks, once);
}

#[test]
fn interrupt_is_idempotent_and_returns_to_ready() {
    let mut app = app();
    app.select(id(&app, 2));
    app.play_pause();
    app.progress_tick(80.0);

    app.interrupt();
    let once = app.tracks.clone();
    assert_eq!(once[2].state, ProcessState::Ready);
    assert_eq!(once[2].progress, 0.0);
    assert!(threads_reset(&once[2]));
    assert!(!app.is_playing());

    app.interrupt();
    assert_eq!(app.tracks, once);
}

#[test]
fn next_cycles_through_catalog_order() {
    let mut app = app();
    let n = app.tracks.len();
    let mut seen = Vec::new();
    for _ in 0..(2 * n) {
        app.next();
        seen.push(app.current_index().unwrap());
    }
    let expected: Vec<usize> = (0..2 * n).map(|i| i % n).collect();
    assert_eq!(seen, expected);
}

#[test]
fn next_on_single_track_stays_put_and_on_empty_is_noop() {
    let mut single = App::new(build_catalog(&[seed("Only", ProcessState::New, 0.0)]));
    single.next();
    single.next();
    assert_eq!(single.current_index(), Some(0));
    assert_eq!(single.tracks[0].state, ProcessState::Ready);

    let mut empty = App::new(Vec::new());
    empty.next();
    assert_eq!(empty.current_id(), None);
}

#[test]
fn next_leaves_previous_track_state_but_stops_playback() {
    let mut app = app();
    app.select(id(&app, 1));
    app.play_pause();
    assert!(app.is_playing());

    app.next();
    assert_eq!(app.current_index(), Some(2));
    // The skipped track keeps RUNNING; only the play flag moves on.
    assert_eq!(app.tracks[1].state, ProcessState::Running);
    assert!(!app.is_playing());
    assert!(!app.clock_should_run());
}

#[test]
fn reselecting_current_track_keeps_playing() {
    let mut app = app();
    app.select(id(&app, 1));
    app.play_pause();
    app.select(id(&app, 1));
    assert!(app.is_playing());
}

#[test]
fn apply_reports_transitions() {
    let mut app = app();
    let first = id(&app, 0);

    let t = app.apply(Intent::Select(first)).unwrap();
    assert_eq!(t.track, first);
    assert_eq!((t.from, t.to), (ProcessState::New, ProcessState::Ready));
    assert!(t.changed());

    let t = app.apply(Intent::PlayPause).unwrap();
    assert_eq!((t.from, t.to), (ProcessState::Ready, ProcessState::Running));

    let t = app.apply(Intent::Tick(10.0)).unwrap();
    assert!(!t.changed());

    let t = app.apply(Intent::Seek(100.0)).unwrap();
    assert_eq!(t.to, ProcessState::End);

    let t = app.apply(Intent::Interrupt).unwrap();
    assert_eq!((t.from, t.to), (ProcessState::End, ProcessState::Ready));

    let t = app.apply(Intent::Next).unwrap();
    assert_eq!(t.track, id(&app, 1));
}

#[test]
fn clock_tick_advances_active_threads_and_progress() {
    let mut app = App::new(build_catalog(&[seed("A", ProcessState::Ready, 0.0)]));
    for (t, start) in app.tracks[0].threads.iter_mut().zip([10.0, 20.0, 30.0]) {
        t.progress = start;
    }
    let rates = TickRates {
        interval: Duration::from_millis(100),
        speed: 1.0,
        decode_step: 2.0,
        buffer_step: 1.0,
        play_step: 0.5,
    };

    // Not playing: nothing moves.
    app.select(id(&app, 0));
    assert!(!app.on_clock_tick(&rates));
    assert_eq!(app.tracks[0].progress, 0.0);

    app.play_pause();
    assert!(!app.on_clock_tick(&rates));
    let t = &app.tracks[0];
    // 10 second track, 0.1 s tick -> 1% per tick.
    assert!((t.progress - 1.0).abs() < 1e-9);
    let progress: Vec<f64> = t.threads.iter().map(|th| th.progress).collect();
    assert_eq!(progress, vec![12.0, 21.0, 30.5]);
}

#[test]
fn clock_ticks_run_a_track_to_completion() {
    let mut app = App::new(build_catalog(&[seed("A", ProcessState::Ready, 95.0)]));
    let rates = TickRates {
        interval: Duration::from_millis(100),
        speed: 1.0,
        ..TickRates::default()
    };
    app.select(id(&app, 0));
    app.play_pause();

    let mut completed_after = None;
    for i in 1..=10 {
        if app.on_clock_tick(&rates) {
            completed_after = Some(i);
            break;
        }
    }
    // 95% + 1% per tick: 5 ticks, allowing for float rounding on the last.
    let ticks = completed_after.expect("track should complete");
    assert!((5..=6).contains(&ticks));
    assert_eq!(app.tracks[0].state, ProcessState::End);
    assert!(!app.clock_should_run());
    assert!(!app.on_clock_tick(&rates));
}

#[test]
fn thread_progress_wraps_during_playback() {
    let mut app = App::new(build_catalog(&[seed("A", ProcessState::Ready, 0.0)]));
    app.tracks[0].threads[0].progress = 99.0;
    let rates = TickRates::default();
    app.select(id(&app, 0));
    app.play_pause();

    app.on_clock_tick(&rates);
    assert_eq!(app.tracks[0].threads[0].progress, 0.0);
}

#[test]
fn display_indices_group_by_state_bucket() {
    let mut app = App::new(build_catalog(&[
        seed("A", ProcessState::End, 100.0),
        seed("B", ProcessState::New, 0.0),
        seed("C", ProcessState::Waiting, 10.0),
        seed("D", ProcessState::New, 0.0),
    ]));
    assert_eq!(app.display_indices(), vec![1, 3, 2, 0]);
    assert_eq!(app.cursor, 1);

    app.select(id(&app, 3));
    app.play_pause();
    // D is now RUNNING and sorts ahead of WAITING.
    assert_eq!(app.display_indices(), vec![1, 3, 2, 0]);
    app.select(id(&app, 1));
    assert_eq!(app.display_indices(), vec![1, 3, 2, 0]);
    assert_eq!(app.tracks_in_state(ProcessState::Ready).count(), 1);
    assert_eq!(app.tracks_in_state(ProcessState::Running).count(), 1);
}

#[test]
fn cursor_walks_display_order_with_wraparound() {
    let mut app = app();
    assert_eq!(app.cursor, 0);

    app.cursor_down();
    assert_eq!(app.cursor, 1);
    app.cursor_up();
    app.cursor_up();
    assert_eq!(app.cursor, 3);

    app.cursor_to_first();
    assert_eq!(app.cursor, 0);
    app.cursor_to_last();
    assert_eq!(app.cursor, 3);

    app.next();
    app.next();
    app.cursor_to_current();
    assert_eq!(app.cursor, 1);
    assert_eq!(app.cursor_track().map(|t| t.id), app.current_id());
}

#[test]
fn thread_counts_follow_playback() {
    let mut app = app();
    assert_eq!(app.thread_count(), 12);
    assert_eq!(app.active_thread_count(), 0);

    app.select(id(&app, 1));
    app.play_pause();
    assert_eq!(app.active_thread_count(), 3);

    app.play_pause();
    assert_eq!(app.active_thread_count(), 0);
}
