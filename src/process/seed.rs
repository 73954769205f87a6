use rand::rng;
use rand::seq::SliceRandom;

use crate::config::TrackSeed;

use super::model::{ProcessState, Thread, ThreadId, ThreadKind, Track, TrackId, clamp_percent};

/// PID given to the first catalog entry; later entries count up from here.
pub const FIRST_PID: u32 = 1001;

/// The catalog shipped with the binary, used when the config has no `[[tracks]]`.
pub fn builtin_seeds() -> Vec<TrackSeed> {
    vec![
        TrackSeed {
            title: "Digital Dreams".into(),
            artist: "SynthWave".into(),
            duration: 237,
            cover: "https://images.unsplash.com/photo-1551288049-bebda4e38f71?q=80&w=150&auto=format&fit=crop".into(),
            state: ProcessState::New,
            progress: 0.0,
        },
        TrackSeed {
            title: "Neural Network".into(),
            artist: "Quantum Bits".into(),
            duration: 184,
            cover: "https://images.unsplash.com/photo-1596554517938-4a9498cf4c14?q=80&w=150&auto=format&fit=crop".into(),
            state: ProcessState::Ready,
            progress: 0.0,
        },
        TrackSeed {
            title: "Memory Allocation".into(),
            artist: "Stack Overflow".into(),
            duration: 312,
            cover: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?q=80&w=150&auto=format&fit=crop".into(),
            state: ProcessState::Waiting,
            progress: 75.0,
        },
        TrackSeed {
            title: "Idle Process".into(),
            artist: "System.Sleep".into(),
            duration: 205,
            cover: "https://images.unsplash.com/photo-1558304970-abd589baebe5?q=80&w=150&auto=format&fit=crop".into(),
            state: ProcessState::End,
            progress: 100.0,
        },
    ]
}

/// Turn seed entries into live tracks.
///
/// Tracks get sequential PIDs starting at [`FIRST_PID`] and one thread of each
/// kind, numbered across the whole catalog. Thread progress starts at a random
/// offset in `[0, 99]` and every thread starts inactive. Nothing is playing at
/// launch, so a seeded `running` state is parked as `waiting`.
pub fn build_catalog(seeds: &[TrackSeed]) -> Vec<Track> {
    let mut rng = rng();
    let mut offsets: Vec<u8> = (0..100).collect();
    let mut next_thread: u32 = 1;
    let mut tracks = Vec::with_capacity(seeds.len());

    for (i, seed) in seeds.iter().enumerate() {
        offsets.shuffle(&mut rng);

        let mut threads = Vec::with_capacity(ThreadKind::ALL.len());
        for (kind, offset) in ThreadKind::ALL.into_iter().zip(offsets.iter()) {
            threads.push(Thread::new(ThreadId(next_thread), kind, f64::from(*offset)));
            next_thread += 1;
        }

        let state = match seed.state {
            ProcessState::Running => ProcessState::Waiting,
            other => other,
        };

        tracks.push(Track {
            id: TrackId(FIRST_PID + i as u32),
            title: seed.title.clone(),
            artist: seed.artist.clone(),
            duration: seed.duration,
            cover: seed.cover.clone(),
            state,
            progress: clamp_percent(seed.progress),
            threads,
        });
    }

    tracks
}
