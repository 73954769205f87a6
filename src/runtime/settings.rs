use crate::config::{self, SettingsError};

/// Load and validate settings, falling back to defaults on any failure.
///
/// The logger is not up yet at this point (its destination comes from the
/// settings), so the failure is handed back for the caller to report.
pub fn load_settings() -> (config::Settings, Option<SettingsError>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(e) => (config::Settings::default(), Some(e)),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (config::Settings::default(), Some(e)),
    }
}
