//! Progress clock: a cancellable repeating ticker and the per-tick arithmetic.
//!
//! The ticker thread only sends [`ClockTick`] messages; the event loop applies
//! them to the `App`, so all state changes stay on the main thread.

mod step;
mod ticker;

pub use step::*;
pub use ticker::*;

#[cfg(test)]
mod tests;
