//! Command-line entry points
//!
//! `server` runs the HTTP API; `classify` runs the classifier once against
//! a failure described on the command line.

pub mod classify;
pub mod server;

use crate::{Settings, config::ConfigLoader};
use std::path::PathBuf;

/// Load settings from an explicit path or the default location
///
/// Falls back to defaults when loading fails. Logging is not initialised
/// yet at this point, so the warning goes to stderr.
pub(crate) fn load_settings(config: Option<&str>) -> Settings {
    let config_path = match config {
        Some(config) => Some(PathBuf::from(config)),
        None => ConfigLoader::get_config_path(),
    };

    ConfigLoader::new()
        .load(config_path.as_deref())
        .unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to load configuration: {}. Using defaults.",
                e
            );
            Settings::default()
        })
}
