//! Banking error classifier
//!
//! Turns a failure caught around a banking-provider call into at most one
//! [`BankingError`]. Rules are tried in order and the first one that
//! recognises the response wins; each recognised failure is logged, written
//! to the related bank account and then raised.

use crate::{
    Error, Result,
    config::MessageSettings,
    error::{BankingError, ErrorKind, format_error_chain},
    error_log::ErrorLog,
    handler::{
        failure::{Failure, HttpFailure},
        payload,
    },
    storage::AccountStore,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Vendor code for a consent the user has not granted yet
pub const CONSENT_NOT_GRANTED: &str = "CONSENT.RESOURCE_NOT_GRANTED";

/// Outcome of evaluating the rules against a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Rule that matched
    pub kind: ErrorKind,
    /// Text for the diagnostic log entry
    pub diagnostic: String,
    /// User-facing message; `None` when the payload holds no recognisable error
    pub message: Option<String>,
}

impl Classification {
    fn raise(kind: ErrorKind, diagnostic: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            diagnostic: diagnostic.into(),
            message: Some(message.into()),
        }
    }
}

type Rule = fn(&HttpFailure, &MessageSettings) -> Result<Option<Classification>>;

/// Rules that only need the response itself, in evaluation order
const RULES: [Rule; 3] = [authentication_error, authorization_error, non_json_error];

/// Classifies banking-provider failures
pub struct ErrorClassifier {
    log: Arc<dyn ErrorLog>,
    accounts: Arc<dyn AccountStore>,
    messages: MessageSettings,
}

impl ErrorClassifier {
    /// Create a classifier writing to the given log and account store
    pub fn new(
        log: Arc<dyn ErrorLog>,
        accounts: Arc<dyn AccountStore>,
        messages: MessageSettings,
    ) -> Self {
        Self {
            log,
            accounts,
            messages,
        }
    }

    /// Messages used for user-facing errors
    pub fn messages(&self) -> &MessageSettings {
        &self.messages
    }

    /// Handle a failure on behalf of an optional bank account
    ///
    /// Returns `Ok(())` when the response carries no recognisable error.
    /// Failures without a response come back as [`Error::Unhandled`] holding
    /// the original error.
    pub fn handle(&self, failure: Failure, account: Option<&str>) -> Result<()> {
        let response = match failure {
            Failure::Http(response) => response,
            Failure::Other(error) => {
                self.record_in_account(account, &self.messages.retry);
                self.log
                    .log_error(&self.messages.title, &format_error_chain(error.as_ref()));
                return Err(Error::Unhandled(error));
            }
        };

        let classification = match self.classify(&response) {
            Ok(classification) => classification,
            Err(e @ Error::Json(_)) => {
                self.log
                    .log_error(&self.messages.title, &response.body_text());
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        self.log
            .log_error(&self.messages.title, &classification.diagnostic);

        match classification.message {
            Some(message) => {
                self.record_in_account(account, &message);
                Err(BankingError::new(classification.kind, &self.messages.title, message).into())
            }
            None => {
                // HTTP failure without a recognisable error payload is let through
                debug!(
                    "No banking error recognised in {} response",
                    response.status()
                );
                Ok(())
            }
        }
    }

    /// Evaluate the rules without logging or persisting anything
    pub fn classify(&self, response: &HttpFailure) -> Result<Classification> {
        for rule in RULES {
            if let Some(classification) = rule(response, &self.messages)? {
                return Ok(classification);
            }
        }

        let body = response.json()?;
        if let Some(classification) = upstream_server_error(response, &body, &self.messages) {
            return Ok(classification);
        }
        Ok(vendor_error(&body, &self.messages))
    }

    /// Write an error message to the account and commit it right away
    ///
    /// No-op without an account.
    pub fn set_in_account(&self, account: Option<&str>, message: &str) -> Result<()> {
        let Some(account) = account else {
            return Ok(());
        };

        self.accounts.set_error_message(account, message)?;
        self.accounts.commit()
    }

    /// Like [`set_in_account`](Self::set_in_account), but a failed write is
    /// only warned about so the failure being handled is still returned
    fn record_in_account(&self, account: Option<&str>, message: &str) {
        if let Err(e) = self.set_in_account(account, message) {
            warn!(
                "Failed to store error message on account {}: {}",
                account.unwrap_or_default(),
                e
            );
        }
    }
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

fn authentication_error(
    response: &HttpFailure,
    messages: &MessageSettings,
) -> Result<Option<Classification>> {
    if response.status() != StatusCode::UNAUTHORIZED {
        return Ok(None);
    }

    Ok(Some(Classification::raise(
        ErrorKind::Authentication,
        response.body_text(),
        &messages.invalid_credentials,
    )))
}

fn authorization_error(
    response: &HttpFailure,
    messages: &MessageSettings,
) -> Result<Option<Classification>> {
    if response.status() != StatusCode::FORBIDDEN {
        return Ok(None);
    }

    let body = response.json()?;
    let message = match payload::field(&body, "message") {
        Some(Value::String(text)) => text.clone(),
        _ => messages.invalid_access.clone(),
    };

    Ok(Some(Classification::raise(
        ErrorKind::Authorization,
        response.body_text(),
        message,
    )))
}

/// Gateway errors and similar pages that carry no JSON
fn non_json_error(
    response: &HttpFailure,
    messages: &MessageSettings,
) -> Result<Option<Classification>> {
    if response.is_json() {
        return Ok(None);
    }

    Ok(Some(Classification::raise(
        ErrorKind::NonJsonGateway,
        response.body_text(),
        &messages.retry,
    )))
}

/// The admin app's own framework crashed and reported an exception
fn upstream_server_error(
    response: &HttpFailure,
    body: &Value,
    messages: &MessageSettings,
) -> Option<Classification> {
    let content = payload::message_content(body);

    if payload::is_truthy(&content) || payload::field(body, "exc_type").is_none() {
        return None;
    }

    let message = match payload::truthy_field(body, "exception") {
        Some(exception) => payload::text(Some(exception)),
        None => messages.server_error.clone(),
    };

    Some(Classification::raise(
        ErrorKind::UpstreamServer,
        response.body_text(),
        message,
    ))
}

/// Business errors reported by the aggregator inside the `message` envelope
fn vendor_error(body: &Value, messages: &MessageSettings) -> Classification {
    let content = payload::message_content(body);
    let error_data = payload::error_data(&content);

    // only the extracted error object is logged, never the raw body
    let diagnostic = error_data.to_string();

    let message = match payload::field(&error_data, "errors") {
        Some(Value::Array(errors)) if !errors.is_empty() => {
            Some(error_list(errors, messages))
        }
        _ if payload::truthy_field(&error_data, "message").is_some() => {
            Some(augment_message(&error_data, messages))
        }
        _ => None,
    };

    Classification {
        kind: ErrorKind::Vendor,
        diagnostic,
        message,
    }
}

/// Render multiple vendor errors as an HTML list below the lead-in
fn error_list(errors: &[Value], messages: &MessageSettings) -> String {
    let lines: Vec<String> = errors
        .iter()
        .map(|error| {
            format!(
                "{} - {}",
                payload::text(payload::field(error, "location")),
                augment_message(error, messages)
            )
        })
        .collect();

    format!(
        "{}<br><ul><li>{}</li></ul>",
        messages.failure_lead_in,
        lines.join("</li><li>")
    )
}

/// Message of a vendor error, with instructions added for known codes
pub fn augment_message(error: &Value, messages: &MessageSettings) -> String {
    let message = payload::text(payload::field(error, "message"));

    match payload::field(error, "code").and_then(Value::as_str) {
        Some(CONSENT_NOT_GRANTED) => format!("{} {}", message, messages.consent_hint()),
        _ => message,
    }
}
