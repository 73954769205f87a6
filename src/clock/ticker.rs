use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::process::TrackId;

/// Sequence number of a clock start. Ticks from older starts are ignored.
pub type Generation = u64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockTick {
    pub generation: Generation,
}

/// Cancel handle of one live ticker thread. Dropping it wakes and stops the
/// thread, even in the middle of a long interval.
struct Ticker {
    cancel: Sender<()>,
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.cancel.send(());
    }
}

/// Repeating timer that drives playback progress for the current track.
///
/// At most one ticker thread is live. Every `start` bumps the generation, so a
/// tick already queued by a cancelled ticker is rejected by [`accepts`].
///
/// [`accepts`]: ProgressClock::accepts
pub struct ProgressClock {
    interval: Duration,
    tx: Sender<ClockTick>,
    generation: Generation,
    target: Option<TrackId>,
    ticker: Option<Ticker>,
}

impl ProgressClock {
    pub fn new(interval: Duration, tx: Sender<ClockTick>) -> Self {
        Self {
            interval,
            tx,
            generation: 0,
            target: None,
            ticker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// The track the live ticker was started for.
    pub fn target(&self) -> Option<TrackId> {
        if self.is_running() { self.target } else { None }
    }

    /// Start ticking for `target`, replacing any live ticker.
    pub fn start(&mut self, target: TrackId) -> Generation {
        self.stop();

        self.generation += 1;
        self.target = Some(target);

        let (cancel, cancel_rx) = mpsc::channel::<()>();
        let tx = self.tx.clone();
        let interval = self.interval;
        let generation = self.generation;

        thread::spawn(move || {
            loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(ClockTick { generation }).is_err() {
                            break;
                        }
                    }
                    // Cancelled, or the handle is gone.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        self.ticker = Some(Ticker { cancel });
        log::debug!("clock started for pid {target} (generation {generation})");
        generation
    }

    /// Cancel the live ticker, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) => {
                drop(ticker);
                log::debug!("clock stopped (generation {})", self.generation);
                true
            }
            None => false,
        }
    }

    /// Whether `tick` belongs to the live ticker.
    pub fn accepts(&self, tick: ClockTick) -> bool {
        self.ticker.is_some() && tick.generation == self.generation
    }

    /// Bring the ticker in line with the app: run for `target` while
    /// `should_run`, restart when the target changes, stop otherwise.
    pub fn sync(&mut self, should_run: bool, target: Option<TrackId>) {
        match (should_run, target) {
            (true, Some(id)) => {
                if self.target() != Some(id) {
                    self.start(id);
                }
            }
            _ => {
                self.stop();
            }
        }
    }
}
