//! Common test utilities and helpers

#![allow(dead_code)]

use banking_error_handler::{
    ErrorClassifier, HttpFailure, LocalStore, MemoryErrorLog, Settings,
    admin::AdminClient,
    server::{AppState, create_app_with_state},
    storage::SessionRecord,
};
use reqwest::StatusCode;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT: &str = "Main Account";
pub const SESSION_SHORT: &str = "sess-short";
pub const SESSION_SECRET: &str = "sess-secret";
pub const END_SESSION_PATH: &str = "/api/method/banking_admin.api.end_session";

/// Classifier wired to an in-memory store holding [`ACCOUNT`]
pub struct ClassifierFixture {
    pub log: Arc<MemoryErrorLog>,
    pub store: Arc<LocalStore>,
    pub classifier: ErrorClassifier,
}

impl ClassifierFixture {
    pub fn new() -> Self {
        Self::with_store(LocalStore::in_memory())
    }

    pub fn with_store(store: LocalStore) -> Self {
        let store = Arc::new(store);
        store.insert_account(ACCOUNT).unwrap();
        let log = Arc::new(MemoryErrorLog::new(50));
        let classifier = ErrorClassifier::new(
            log.clone(),
            store.clone(),
            Settings::default().messages,
        );
        Self {
            log,
            store,
            classifier,
        }
    }
}

/// Failed response with a JSON body
pub fn json_failure(status: u16, body: serde_json::Value) -> HttpFailure {
    HttpFailure::with_status(StatusCode::from_u16(status).unwrap()).with_json(&body)
}

/// Failed response with an arbitrary content type and body
pub fn raw_failure(status: u16, content_type: &str, body: &str) -> HttpFailure {
    HttpFailure::with_status(StatusCode::from_u16(status).unwrap())
        .with_header("Content-Type", content_type)
        .with_body(body.as_bytes().to_vec())
}

/// Settings pointing the admin client at a mock server
pub fn settings_for_admin(admin_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.admin.base_url = admin_url.to_string();
    settings
}

/// Mock admin app answering end-session requests with `status`
pub async fn mock_admin(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(END_SESSION_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

/// Application router talking to the given admin app, with one account and one session
pub fn create_test_app(admin_url: &str) -> (axum::Router, AppState) {
    let settings = settings_for_admin(admin_url);
    let store = Arc::new(LocalStore::in_memory());
    store.insert_account(ACCOUNT).unwrap();
    store
        .insert_session(SessionRecord::new(SESSION_SHORT, SESSION_SECRET))
        .unwrap();
    let terminator = Arc::new(AdminClient::new(&settings.admin).unwrap());

    let state = AppState::new(settings, store, terminator);
    (create_app_with_state(state.clone()), state)
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
