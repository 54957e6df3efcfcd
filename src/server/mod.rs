//! HTTP server implementation
//!
//! Exposes UI error acknowledgment and read access to the recorded
//! banking errors over an Axum router.

pub mod app;
pub mod handlers;

pub use app::{AppState, create_app, create_app_with_state};
