//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the track catalog, the
//! current track, the play flag and the browse cursor. Every process and
//! thread state change goes through its transition methods.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
