//! proctune: a terminal music player that models each track as an operating
//! system process with decode, buffer and play threads.

mod app;
mod clock;
mod config;
mod process;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
