use std::{env, path::PathBuf};

use super::schema::Settings;

/// Errors raised while loading or checking settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `PROCTUNE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("PROCTUNE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.clock.tick_ms == 0 {
            return Err(invalid("clock.tick_ms must be >= 1"));
        }
        if !self.clock.speed.is_finite() || self.clock.speed <= 0.0 {
            return Err(invalid("clock.speed must be a positive number"));
        }

        let steps = [
            ("threads.decode_step", self.threads.decode_step),
            ("threads.buffer_step", self.threads.buffer_step),
            ("threads.play_step", self.threads.play_step),
        ];
        for (name, step) in steps {
            if !step.is_finite() || step < 0.0 {
                return Err(SettingsError::Invalid(format!("{name} must be >= 0")));
            }
        }

        let seek = self.controls.seek_step;
        if !seek.is_finite() || seek <= 0.0 || seek > 100.0 {
            return Err(invalid("controls.seek_step must be within (0, 100]"));
        }

        for (i, t) in self.tracks.iter().enumerate() {
            if t.duration == 0 {
                return Err(SettingsError::Invalid(format!(
                    "tracks[{i}] ({}) must have a duration >= 1",
                    t.title
                )));
            }
            if !(0.0..=100.0).contains(&t.progress) {
                return Err(SettingsError::Invalid(format!(
                    "tracks[{i}] ({}) progress must be within [0, 100]",
                    t.title
                )));
            }
        }

        Ok(())
    }

    /// Render the settings as TOML, as `--dump-config` prints them.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn invalid(msg: &str) -> SettingsError {
    SettingsError::Invalid(msg.to_string())
}

/// Resolve the config path from `PROCTUNE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("PROCTUNE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/proctune/config.toml`
/// or `~/.config/proctune/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("proctune").join("config.toml"))
}
