//! Process model: tracks viewed as OS processes, each owning three threads.
//!
//! Types live in `process::model`; the startup catalog is built by
//! `process::seed`.

mod model;
mod seed;

pub use model::*;
pub use seed::*;
