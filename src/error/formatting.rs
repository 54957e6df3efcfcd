//! Error formatting utilities
//!
//! Renders errors for log entries and JSON API responses, walking the
//! source chain so nested causes are not lost.

use crate::Error;
use serde_json;
use std::error::Error as StdError;

/// Format error for display
///
/// Adds nested causes that are not already part of the top-level message.
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::Banking(banking) => {
            format!("{} [{}]: {}", banking.title, banking.kind, banking.message)
        }

        Error::Upstream(failure) => {
            format!(
                "Upstream request failed with {}: {}",
                failure.status(),
                failure.body_text()
            )
        }

        Error::Storage { operation, details } => {
            format!("Storage error during {}: {}", operation, details)
        }

        // For standard errors, use their Display implementation
        _ => error.to_string(),
    };

    append_causes(formatted, error.source())
}

/// Format any error together with its chain of causes
///
/// Used where no backtrace is available: the cause chain is the closest
/// thing to one for failures that never reached the provider.
pub fn format_error_chain(error: &(dyn StdError + 'static)) -> String {
    append_causes(error.to_string(), error.source())
}

fn append_causes(mut result: String, mut source: Option<&(dyn StdError + 'static)>) -> String {
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !result.contains(&cause_text) {
            result = format!("{} (caused by {})", result, cause_text);
        }
        source = cause.source();
    }
    result
}

/// Format error for JSON API responses
pub fn format_error_for_api(error: &Error) -> serde_json::Value {
    let mut body = serde_json::json!({
        "error": format_error(error),
        "category": error.category(),
        "retryable": error.is_retryable(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if let Error::Banking(banking) = error {
        body["title"] = serde_json::Value::String(banking.title.clone());
        body["message"] = serde_json::Value::String(banking.message.clone());
    }

    body
}

/// Format error for logging with structured data
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
        "retryable": error.is_retryable(),
    });

    match error {
        Error::Banking(banking) => {
            log_data["kind"] = serde_json::Value::String(banking.kind.as_str().to_string());
        }
        Error::Upstream(failure) => {
            log_data["status"] = serde_json::Value::Number(failure.status().as_u16().into());
        }
        _ => {}
    }

    log_data
}
