//! Version information utilities

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the current application version
pub fn get_version() -> &'static str {
    VERSION
}

/// User agent sent to the admin app
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), get_version())
}
