use std::fs::{self, OpenOptions};

use anyhow::Context;
use env_logger::{Builder, Env, Target};

use crate::config::LoggingSettings;

/// Install the global logger.
///
/// The terminal belongs to the UI, so records only go somewhere when
/// `logging.file` is set (appended to) or `RUST_LOG` asks for stderr output.
pub fn init(settings: &LoggingSettings) -> anyhow::Result<()> {
    let mut builder = match &settings.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create log dir {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;

            let mut builder =
                Builder::from_env(Env::default().default_filter_or(settings.level.as_str()));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("off")),
    };

    builder
        .format_timestamp_millis()
        .try_init()
        .context("logger already installed")?;
    Ok(())
}
