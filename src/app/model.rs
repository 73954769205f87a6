//! Application model types: `App`, `Intent` and `Transition`.
//!
//! `App` owns the track catalog, the current track and the play flag. Its
//! transition methods are the only code that mutates track records.

use crate::clock::TickRates;
use crate::process::{ProcessState, Track, TrackId, clamp_percent};

/// A user- or clock-originated request to change state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Intent {
    Select(TrackId),
    PlayPause,
    /// Set the current track's progress (percent) as the clock would.
    Tick(f64),
    /// Jump the current track to a progress percent.
    Seek(f64),
    Terminate,
    Interrupt,
    Next,
}

/// The process state of the current track before and after an intent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    pub track: TrackId,
    pub from: ProcessState,
    pub to: ProcessState,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    current: Option<TrackId>,
    playing: bool,

    /// Browse cursor: index into `tracks` of the row under the cursor.
    pub cursor: usize,
    pub details_window: bool,
}

impl App {
    /// Create a new `App` over the provided `tracks`, with nothing selected.
    pub fn new(tracks: Vec<Track>) -> Self {
        let cursor = Self::display_order(&tracks).first().copied().unwrap_or(0);
        Self {
            tracks,
            current: None,
            playing: false,
            cursor,
            details_window: false,
        }
    }

    pub fn current_id(&self) -> Option<TrackId> {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn index_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.and_then(|id| self.index_of(id))
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_index().map(|i| &self.tracks[i])
    }

    fn current_track_mut(&mut self) -> Option<&mut Track> {
        let idx = self.current_index()?;
        self.tracks.get_mut(idx)
    }

    /// Whether the progress clock should be ticking right now.
    pub fn clock_should_run(&self) -> bool {
        self.playing
            && self
                .current_track()
                .map(|t| t.state != ProcessState::End)
                .unwrap_or(false)
    }

    /// Apply one intent and report the current track's state change.
    pub fn apply(&mut self, intent: Intent) -> Option<Transition> {
        let before: Vec<ProcessState> = self.tracks.iter().map(|t| t.state).collect();

        match intent {
            Intent::Select(id) => self.select(id),
            Intent::PlayPause => self.play_pause(),
            Intent::Tick(progress) => self.progress_tick(progress),
            Intent::Seek(value) => self.seek(value),
            Intent::Terminate => self.terminate(),
            Intent::Interrupt => self.interrupt(),
            Intent::Next => self.next(),
        }

        let idx = self.current_index()?;
        let track = &self.tracks[idx];
        let transition = Transition {
            track: track.id,
            from: before[idx],
            to: track.state,
        };
        if transition.changed() {
            log::info!(
                "pid {} \"{}\": {} -> {}",
                track.id,
                track.title,
                transition.from,
                transition.to
            );
        }
        Some(transition)
    }

    /// Make `id` the current track, promoting it from NEW to READY.
    ///
    /// Switching to a different track clears the play flag; the previous
    /// track keeps whatever state it had.
    pub fn select(&mut self, id: TrackId) {
        let Some(idx) = self.index_of(id) else {
            return;
        };

        if self.current != Some(id) {
            self.playing = false;
        }

        let track = &mut self.tracks[idx];
        if track.state == ProcessState::New {
            track.state = ProcessState::Ready;
        }
        self.current = Some(id);
    }

    /// Toggle the play flag: RUNNING with threads active, or WAITING with
    /// threads inactive. Terminated tracks cannot be started.
    pub fn play_pause(&mut self) {
        let playing = self.playing;
        let Some(track) = self.current_track_mut() else {
            return;
        };
        if track.state == ProcessState::End {
            return;
        }

        if playing {
            track.state = ProcessState::Waiting;
            track.set_threads_active(false);
        } else {
            track.state = ProcessState::Running;
            track.set_threads_active(true);
        }
        self.playing = !playing;
    }

    /// Set the current track's progress. Reaching 100 completes the track;
    /// non-finite values count as 0.
    pub fn progress_tick(&mut self, progress: f64) {
        let progress = if progress.is_finite() {
            progress.max(0.0)
        } else {
            0.0
        };

        let Some(track) = self.current_track_mut() else {
            return;
        };

        if progress >= 100.0 {
            track.progress = 100.0;
            track.state = ProcessState::End;
            track.set_threads_active(false);
            self.playing = false;
        } else {
            track.progress = progress;
        }
    }

    /// Jump the current track to `value` percent, clamped into `[0, 100]`.
    pub fn seek(&mut self, value: f64) {
        let seekable = self
            .current_track()
            .map(|t| t.state != ProcessState::End)
            .unwrap_or(false);
        if seekable {
            self.progress_tick(clamp_percent(value));
        }
    }

    /// Kill the current track: END at 100% with its threads reset.
    pub fn terminate(&mut self) {
        let Some(track) = self.current_track_mut() else {
            return;
        };
        track.state = ProcessState::End;
        track.progress = 100.0;
        track.reset_threads();
        self.playing = false;
    }

    /// Preempt the current track back to READY at 0% with its threads reset.
    pub fn interrupt(&mut self) {
        let Some(track) = self.current_track_mut() else {
            return;
        };
        track.state = ProcessState::Ready;
        track.progress = 0.0;
        track.reset_threads();
        self.playing = false;
    }

    /// Select the track after the current one in catalog order, wrapping
    /// around; the first track when nothing is current.
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let idx = match self.current_index() {
            Some(i) => (i + 1) % self.tracks.len(),
            None => 0,
        };
        let id = self.tracks[idx].id;
        self.select(id);
    }

    /// Advance the current track by one clock tick.
    ///
    /// Active threads move by their kind's step, then track progress moves by
    /// the duration-derived step. Returns true when this tick completed the track.
    pub fn on_clock_tick(&mut self, rates: &TickRates) -> bool {
        if !self.clock_should_run() {
            return false;
        }
        let Some(track) = self.current_track_mut() else {
            return false;
        };

        for thread in track.threads.iter_mut().filter(|t| t.active) {
            thread.advance(rates.thread_step(thread.kind));
        }
        let target = track.progress + rates.track_step(track.duration);

        self.apply(Intent::Tick(target));
        self.current_track()
            .map(|t| t.state == ProcessState::End)
            .unwrap_or(false)
    }

    pub fn tracks_in_state(&self, state: ProcessState) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.state == state)
    }

    pub fn thread_count(&self) -> usize {
        self.tracks.iter().map(|t| t.threads.len()).sum()
    }

    pub fn active_thread_count(&self) -> usize {
        self.tracks.iter().map(|t| t.active_thread_count()).sum()
    }

    fn display_order(tracks: &[Track]) -> Vec<usize> {
        let mut order = Vec::with_capacity(tracks.len());
        for state in ProcessState::ALL {
            order.extend(
                tracks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.state == state)
                    .map(|(i, _)| i),
            );
        }
        order
    }

    /// Track indices in the order the state panel lists them: grouped by
    /// process state, catalog order within a group.
    pub fn display_indices(&self) -> Vec<usize> {
        Self::display_order(&self.tracks)
    }

    /// Return the next visible index in display order after `current`.
    /// Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in display order before `current`.
    /// Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
            None => Some(display[display.len() - 1]),
        }
    }

    /// Move the cursor to the next visible track.
    pub fn cursor_down(&mut self) {
        if let Some(next) = self.next_in_view_from(self.cursor) {
            self.cursor = next;
        }
    }

    /// Move the cursor to the previous visible track.
    pub fn cursor_up(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn cursor_to_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.cursor = first;
        }
    }

    pub fn cursor_to_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.cursor = last;
        }
    }

    /// Put the cursor on the current track, if there is one.
    pub fn cursor_to_current(&mut self) {
        if let Some(idx) = self.current_index() {
            self.cursor = idx;
        }
    }

    pub fn cursor_track(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }
}
