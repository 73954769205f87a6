use super::*;
use crate::process::{ThreadKind, TrackId};
use std::sync::mpsc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

fn rates(tick_ms: u64, speed: f64) -> TickRates {
    TickRates {
        interval: Duration::from_millis(tick_ms),
        speed,
        ..TickRates::default()
    }
}

#[test]
fn track_step_reaches_100_after_duration_of_ticks() {
    let r = rates(100, 1.0);
    let step = r.track_step(237);
    let ticks_for_full_track = 100.0 / step;
    // 237 seconds at 10 ticks per second.
    assert!((ticks_for_full_track - 2370.0).abs() < 1e-6);
}

#[test]
fn track_step_scales_with_speed_and_handles_zero_duration() {
    let slow = rates(100, 1.0).track_step(60);
    let fast = rates(100, 4.0).track_step(60);
    assert!((fast - slow * 4.0).abs() < 1e-9);
    assert_eq!(rates(100, 1.0).track_step(0), 100.0);
}

#[test]
fn thread_steps_are_ordered_decode_buffer_play() {
    let r = TickRates::default();
    assert_eq!(r.thread_step(ThreadKind::Decode), 1.0);
    assert_eq!(r.thread_step(ThreadKind::Buffer), 0.5);
    assert_eq!(r.thread_step(ThreadKind::Play), 0.25);
}

#[test]
fn default_thread_steps_move_2_1_half_percent_per_200ms() {
    let r = TickRates::default();
    let ticks = (200 / r.interval.as_millis()) as f64;
    assert_eq!(r.thread_step(ThreadKind::Decode) * ticks, 2.0);
    assert_eq!(r.thread_step(ThreadKind::Buffer) * ticks, 1.0);
    assert_eq!(r.thread_step(ThreadKind::Play) * ticks, 0.5);
}

#[test]
fn started_clock_emits_ticks_for_its_generation() {
    let (tx, rx) = mpsc::channel();
    let mut clock = ProgressClock::new(Duration::from_millis(5), tx);
    assert!(!clock.is_running());

    let generation = clock.start(TrackId(1001));
    assert!(clock.is_running());
    assert_eq!(clock.target(), Some(TrackId(1001)));

    let tick = rx.recv_timeout(WAIT).expect("clock should tick");
    assert_eq!(tick.generation, generation);
    assert!(clock.accepts(tick));
}

#[test]
fn ticks_from_a_stopped_or_replaced_ticker_are_rejected() {
    let (tx, rx) = mpsc::channel();
    let mut clock = ProgressClock::new(Duration::from_millis(5), tx);

    let first = clock.start(TrackId(1001));
    let old_tick = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(old_tick.generation, first);

    let second = clock.start(TrackId(1002));
    assert_ne!(first, second);
    assert!(!clock.accepts(old_tick));

    assert!(clock.stop());
    assert!(!clock.stop());
    assert!(!clock.accepts(ClockTick { generation: second }));
    assert_eq!(clock.target(), None);
}

#[test]
fn stopped_clock_goes_quiet() {
    let (tx, rx) = mpsc::channel();
    let mut clock = ProgressClock::new(Duration::from_millis(5), tx);

    clock.start(TrackId(1001));
    rx.recv_timeout(WAIT).unwrap();
    clock.stop();

    // Let any in-flight tick land, then expect silence.
    std::thread::sleep(Duration::from_millis(50));
    while rx.try_recv().is_ok() {}
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn dropping_the_clock_cancels_its_ticker() {
    let (tx, rx) = mpsc::channel();
    let mut clock = ProgressClock::new(Duration::from_millis(5), tx);
    clock.start(TrackId(1001));
    rx.recv_timeout(WAIT).unwrap();
    drop(clock);

    std::thread::sleep(Duration::from_millis(50));
    while rx.try_recv().is_ok() {}
    // Every sender is gone once the ticker thread exits.
    assert_eq!(
        rx.recv_timeout(WAIT),
        Err(mpsc::RecvTimeoutError::Disconnected)
    );
}

#[test]
fn stopping_wakes_a_ticker_mid_interval() {
    let (tx, rx) = mpsc::channel();
    let mut clock = ProgressClock::new(Duration::from_secs(60), tx);
    clock.start(TrackId(1001));
    clock.stop();
    drop(clock);

    // The ticker held the last sender; it must exit long before its interval ends.
    assert_eq!(
        rx.recv_timeout(WAIT),
        Err(mpsc::RecvTimeoutError::Disconnected)
    );
}

#[test]
fn sync_starts_restarts_and_stops() {
    let (tx, _rx) = mpsc::channel();
    let mut clock = ProgressClock::new(Duration::from_millis(50), tx);

    clock.sync(false, Some(TrackId(1)));
    assert!(!clock.is_running());

    clock.sync(true, Some(TrackId(1)));
    assert!(clock.is_running());
    let gen_one = ClockTick { generation: 1 };
    assert!(clock.accepts(gen_one));

    // Same target keeps the same ticker.
    clock.sync(true, Some(TrackId(1)));
    assert!(clock.accepts(gen_one));

    // New target restarts under a new generation.
    clock.sync(true, Some(TrackId(2)));
    assert!(!clock.accepts(gen_one));
    assert_eq!(clock.target(), Some(TrackId(2)));

    clock.sync(true, None);
    assert!(!clock.is_running());

    clock.sync(true, Some(TrackId(2)));
    clock.sync(false, Some(TrackId(2)));
    assert!(!clock.is_running());
}
