use std::time::Duration;

use crate::config::Settings;
use crate::process::ThreadKind;

/// How far one clock tick moves a track and each kind of thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRates {
    /// Wall time between ticks.
    pub interval: Duration,
    /// Playback speed multiplier.
    pub speed: f64,
    pub decode_step: f64,
    pub buffer_step: f64,
    pub play_step: f64,
}

impl Default for TickRates {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl TickRates {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval: Duration::from_millis(settings.clock.tick_ms),
            speed: settings.clock.speed,
            decode_step: settings.threads.decode_step,
            buffer_step: settings.threads.buffer_step,
            play_step: settings.threads.play_step,
        }
    }

    /// Percent added to a track of `duration_secs` length per tick.
    ///
    /// At speed 1.0 a track reaches 100% after `duration_secs` of ticking. A
    /// zero-length track completes on its first tick.
    pub fn track_step(&self, duration_secs: u32) -> f64 {
        if duration_secs == 0 {
            return 100.0;
        }
        100.0 * self.interval.as_secs_f64() * self.speed / f64::from(duration_secs)
    }

    /// Percent added to a thread of `kind` per tick. Decode runs fastest, play slowest.
    pub fn thread_step(&self, kind: ThreadKind) -> f64 {
        match kind {
            ThreadKind::Decode => self.decode_step,
            ThreadKind::Buffer => self.buffer_step,
            ThreadKind::Play => self.play_step,
        }
    }
}
