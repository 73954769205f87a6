//! Track and thread records plus the process-state enum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a track, by analogy with OS process states.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    #[default]
    New,
    Ready,
    Running,
    Waiting,
    #[serde(alias = "terminated", alias = "ended")]
    End,
}

impl ProcessState {
    /// All states in the order the state panel lists them.
    pub const ALL: [ProcessState; 5] = [
        ProcessState::New,
        ProcessState::Ready,
        ProcessState::Running,
        ProcessState::Waiting,
        ProcessState::End,
    ];

    /// Upper-case bucket label, e.g. `RUNNING`.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::End => "END",
        }
    }

    /// Lower-case word used in empty-bucket hints ("No ended processes").
    pub fn name(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::End => "ended",
        }
    }

    /// Human description shown under the transport controls.
    pub fn describe(self) -> &'static str {
        match self {
            Self::New => "Process Created",
            Self::Ready => "Process Ready",
            Self::Running => "Process Executing",
            Self::Waiting => "Process Waiting",
            Self::End => "Process Terminated",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The synthetic sub-activity a thread models.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ThreadKind {
    Decode,
    Buffer,
    Play,
}

impl ThreadKind {
    /// Kinds in the order every track owns them.
    pub const ALL: [ThreadKind; 3] = [ThreadKind::Decode, ThreadKind::Buffer, ThreadKind::Play];

    pub fn label(self) -> &'static str {
        match self {
            Self::Decode => "Decode",
            Self::Buffer => "Buffer",
            Self::Play => "Play",
        }
    }
}

/// Process identifier of a track. Shown as `PID` in the thread panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ThreadId(pub u32);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub id: ThreadId,
    pub kind: ThreadKind,
    /// Percent in `[0, 100]`; wraps to 0 instead of completing.
    pub progress: f64,
    pub active: bool,
}

impl Thread {
    pub fn new(id: ThreadId, kind: ThreadKind, progress: f64) -> Self {
        Self {
            id,
            kind,
            progress: clamp_percent(progress),
            active: false,
        }
    }

    /// Advance progress by `step`, looping back to 0 once it passes 100.
    pub fn advance(&mut self, step: f64) {
        let next = self.progress + step;
        self.progress = if next > 100.0 {
            0.0
        } else {
            clamp_percent(next)
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    /// Length in seconds.
    pub duration: u32,
    /// Cover art reference (usually a URL). May be empty.
    pub cover: String,
    pub state: ProcessState,
    /// Playback percent in `[0, 100]`.
    pub progress: f64,
    pub threads: Vec<Thread>,
}

impl Track {
    pub fn set_threads_active(&mut self, active: bool) {
        for t in &mut self.threads {
            t.active = active;
        }
    }

    /// Deactivate every thread and zero its progress.
    pub fn reset_threads(&mut self) {
        for t in &mut self.threads {
            t.active = false;
            t.progress = 0.0;
        }
    }

    pub fn active_thread_count(&self) -> usize {
        self.threads.iter().filter(|t| t.active).count()
    }

    /// Elapsed seconds implied by `progress`, rounded down.
    pub fn elapsed_secs(&self) -> u64 {
        ((self.progress / 100.0) * f64::from(self.duration)).floor() as u64
    }
}

/// Clamp a percentage into `[0, 100]`, mapping NaN to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
