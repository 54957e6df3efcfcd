//! Acknowledgment of errors reported by the client-side banking widget
//!
//! The widget reports its own failures together with the short id of the
//! banking session it was running; the session is then ended on the admin
//! app. Failures here are returned as they are and never classified.

use crate::{
    Result,
    admin::SessionTerminator,
    error_log::ErrorLog,
    handler::payload,
    storage::SessionStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Handles errors reported by the client-side widget
pub struct UiErrorHandler {
    log: Arc<dyn ErrorLog>,
    sessions: Arc<dyn SessionStore>,
    terminator: Arc<dyn SessionTerminator>,
    title: String,
}

impl UiErrorHandler {
    /// Create a handler; `title` is used for error log entries
    pub fn new(
        log: Arc<dyn ErrorLog>,
        sessions: Arc<dyn SessionStore>,
        terminator: Arc<dyn SessionTerminator>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            log,
            sessions,
            terminator,
            title: title.into(),
        }
    }

    /// Log the reported error and end the banking session
    ///
    /// `error` is the JSON payload reported by the widget and may be absent
    /// or empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use banking_error_handler::{
    ///     LocalStore, MemoryErrorLog, Result, UiErrorHandler,
    ///     admin::SessionTerminator, storage::SessionRecord,
    /// };
    ///
    /// struct Noop;
    ///
    /// #[async_trait::async_trait]
    /// impl SessionTerminator for Noop {
    ///     async fn end_session(&self, _: &str, _: &str) -> Result<()> {
    ///         Ok(())
    ///     }
    /// }
    ///
    /// # tokio_test::block_on(async {
    /// let store = Arc::new(LocalStore::in_memory());
    /// store.insert_session(SessionRecord::new("short", "secret")).unwrap();
    /// let log = Arc::new(MemoryErrorLog::new(10));
    /// let handler = UiErrorHandler::new(log.clone(), store, Arc::new(Noop), "Banking Error");
    ///
    /// handler
    ///     .handle_ui_error(Some(r#"{"message": "link failed"}"#), "short")
    ///     .await
    ///     .unwrap();
    /// assert_eq!(log.entries()[0].message, "link failed");
    /// # });
    /// ```
    pub async fn handle_ui_error(&self, error: Option<&str>, session_id_short: &str) -> Result<()> {
        if let Some(raw) = error.filter(|raw| !raw.is_empty()) {
            let reported: serde_json::Value = serde_json::from_str(raw)?;
            self.log
                .log_error(&self.title, &payload::text(payload::field(&reported, "message")));
        } else {
            debug!("UI error for session {} carried no payload", session_id_short);
        }

        let session = self.sessions.get_session(session_id_short)?;
        self.terminator
            .end_session(session.session_id(), session_id_short)
            .await?;

        info!("Ended banking session {} after UI error", session_id_short);
        Ok(())
    }
}

impl std::fmt::Debug for UiErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiErrorHandler")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
