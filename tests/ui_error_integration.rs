//! UI error acknowledgment against a mocked admin app

mod common;

use banking_error_handler::{
    Error, LocalStore, MemoryErrorLog, UiErrorHandler, admin::AdminClient,
    storage::SessionRecord,
};
use common::{END_SESSION_PATH, SESSION_SECRET, SESSION_SHORT, mock_admin, settings_for_admin};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handler_for(admin_url: &str, api_key: Option<&str>) -> (Arc<MemoryErrorLog>, UiErrorHandler) {
    let mut settings = settings_for_admin(admin_url);
    if let Some(key) = api_key {
        settings.admin.api_key = Some(key.to_string());
        settings.admin.api_secret = Some("secret".to_string());
    }

    let store = Arc::new(LocalStore::in_memory());
    store
        .insert_session(SessionRecord::new(SESSION_SHORT, SESSION_SECRET))
        .unwrap();
    let log = Arc::new(MemoryErrorLog::new(10));
    let handler = UiErrorHandler::new(
        log.clone(),
        store,
        Arc::new(AdminClient::new(&settings.admin).unwrap()),
        settings.messages.title,
    );
    (log, handler)
}

#[tokio::test]
async fn test_reported_error_is_logged_and_session_ended() {
    let admin = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(END_SESSION_PATH))
        .and(header("Authorization", "token key:secret"))
        .and(body_json(json!({
            "session_id": SESSION_SECRET,
            "session_id_short": SESSION_SHORT
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&admin)
        .await;
    let (log, handler) = handler_for(&admin.uri(), Some("key"));

    handler
        .handle_ui_error(
            Some(r#"{"message": {"code": "LINK_FAILED"}}"#),
            SESSION_SHORT,
        )
        .await
        .unwrap();

    // structured messages are logged as compact JSON
    assert_eq!(log.entries()[0].message, r#"{"code":"LINK_FAILED"}"#);
}

#[tokio::test]
async fn test_missing_message_logs_empty_text() {
    let admin = mock_admin(200).await;
    let (log, handler) = handler_for(&admin.uri(), None);

    handler
        .handle_ui_error(Some(r#"{"status": "closed"}"#), SESSION_SHORT)
        .await
        .unwrap();

    assert_eq!(log.entries()[0].message, "");
}

#[tokio::test]
async fn test_admin_rejection_propagates() {
    let admin = mock_admin(403).await;
    let (_log, handler) = handler_for(&admin.uri(), None);

    let error = handler
        .handle_ui_error(None, SESSION_SHORT)
        .await
        .unwrap_err();

    match error {
        Error::Upstream(failure) => assert_eq!(failure.status().as_u16(), 403),
        other => panic!("Expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_session_never_reaches_admin() {
    let admin = mock_admin(200).await;
    let (_log, handler) = handler_for(&admin.uri(), None);

    let result = handler.handle_ui_error(None, "unknown").await;

    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert!(admin.received_requests().await.unwrap().is_empty());
}
