//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive the clock,
//! controls, views and startup catalog, plus helpers to load it from disk.

mod load;
mod schema;

pub use load::{SettingsError, resolve_config_path};
pub use schema::*;
