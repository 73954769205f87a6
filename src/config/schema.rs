use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::process::{ProcessState, builtin_seeds};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/proctune/config.toml` or `~/.config/proctune/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PROCTUNE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub clock: ClockSettings,
    pub threads: ThreadSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
    /// Catalog loaded at startup. Replacing this list replaces the whole catalog.
    pub tracks: Vec<TrackSeed>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clock: ClockSettings::default(),
            threads: ThreadSettings::default(),
            playback: PlaybackSettings::default(),
            controls: ControlsSettings::default(),
            ui: UiSettings::default(),
            logging: LoggingSettings::default(),
            tracks: builtin_seeds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Interval between progress ticks (milliseconds).
    pub tick_ms: u64,
    /// Playback speed multiplier. 1.0 finishes a track in its real duration.
    pub speed: f64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            speed: 1.0,
        }
    }
}

/// Per-tick progress increments for each thread kind (percent).
///
/// The defaults move decode, buffer and play threads by 10, 5 and 2.5 percent
/// per second at the default 100 ms tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadSettings {
    pub decode_step: f64,
    pub buffer_step: f64,
    pub play_step: f64,
}

impl Default for ThreadSettings {
    fn default() -> Self {
        Self {
            decode_step: 1.0,
            buffer_step: 0.5,
            play_step: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Select the following track once the current one runs to completion.
    pub auto_advance: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            auto_advance: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Percent to seek when pressing `H` / `L`.
    pub seek_step: f64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { seek_step: 5.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show next to the progress bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " OS Process Visualizer ~ Music Player with OS Concepts ".to_string(),
            time_fields: vec![TimeField::Elapsed, TimeField::Total],
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Where log records go. Without a file, logging stays off unless `RUST_LOG` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Default filter when `RUST_LOG` is not set (e.g. "info", "proctune=debug").
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// One catalog entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSeed {
    pub title: String,
    pub artist: String,
    /// Length in seconds.
    pub duration: u32,
    pub cover: String,
    pub state: ProcessState,
    pub progress: f64,
}

impl Default for TrackSeed {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            artist: "Unknown".to_string(),
            duration: 0,
            cover: String::new(),
            state: ProcessState::New,
            progress: 0.0,
        }
    }
}
