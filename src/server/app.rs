//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::{
    Result,
    admin::{AdminClient, SessionTerminator},
    config::Settings,
    error_log::MemoryErrorLog,
    handler::UiErrorHandler,
    storage::LocalStore,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Handler for errors reported by the banking widget
    pub ui_errors: Arc<UiErrorHandler>,
    /// Account and session store
    pub store: Arc<LocalStore>,
    /// Recorded error log
    pub error_log: Arc<MemoryErrorLog>,
    /// Application settings
    pub settings: Arc<Settings>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Wire up the state around an existing store and session terminator
    pub fn new(
        settings: Settings,
        store: Arc<LocalStore>,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Self {
        let error_log = Arc::new(MemoryErrorLog::new(settings.storage.error_log_capacity));
        let ui_errors = Arc::new(UiErrorHandler::new(
            error_log.clone(),
            store.clone(),
            terminator,
            settings.messages.title.clone(),
        ));

        Self {
            ui_errors,
            store,
            error_log,
            settings: Arc::new(settings),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Create the main Axum application from settings
///
/// Opens the configured store and connects to the admin app.
pub fn create_app(settings: Settings) -> Result<Router> {
    let store = Arc::new(LocalStore::from_settings(&settings.storage)?);
    let terminator = Arc::new(AdminClient::new(&settings.admin)?);

    Ok(create_app_with_state(AppState::new(
        settings, store, terminator,
    )))
}

/// Create the Axum application around prepared state
pub fn create_app_with_state(state: AppState) -> Router {
    let server = &state.settings.server;

    let router = Router::new()
        .route("/ping", get(super::handlers::ping))
        .route("/handle_ui_error", post(super::handlers::handle_ui_error))
        .route(
            "/accounts/{account}/error_message",
            get(super::handlers::account_error_message),
        )
        .route("/error_log", get(super::handlers::error_log))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(server.max_body_size)),
        );

    let router = if server.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app() {
        let _app = create_app(Settings::default()).unwrap();
    }

    #[test]
    fn test_create_app_rejects_invalid_admin_url() {
        let mut settings = Settings::default();
        settings.admin.base_url = "not a url".to_string();
        assert!(create_app(settings).is_err());
    }
}
