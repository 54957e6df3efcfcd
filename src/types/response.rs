//! Response type definitions

use crate::error::{BankingError, ErrorKind};
use crate::error_log::ErrorLogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(server_uptime: u64, version: impl Into<String>) -> Self {
        Self {
            server_uptime,
            version: version.into(),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// Error timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            context: None,
            details: None,
            timestamp: Some(Utc::now()),
            version: Some(crate::utils::version::get_version().to_string()),
        }
    }

    /// Create error response with context
    pub fn with_context(error: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..Self::new(error)
        }
    }

    /// Create error response for a crate error
    ///
    /// The context is the error category; details carry the structured
    /// form of the error.
    pub fn from_error(error: &crate::Error) -> Self {
        Self {
            context: Some(error.category().to_string()),
            details: Some(crate::error::format_error_for_api(error)),
            ..Self::new(error.to_string())
        }
    }
}

/// Committed error message of a bank account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountErrorResponse {
    /// Account name
    pub account: String,

    /// Last banking error shown for the account
    pub error_message: Option<String>,
}

/// Snapshot of the recorded error log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorLogResponse {
    /// Entries, oldest first
    pub entries: Vec<ErrorLogEntry>,
}

/// How a classification run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyOutcome {
    /// The failure was normalised into a banking error
    BankingError,
    /// The failure was swallowed without an error
    NoError,
    /// The failure body could not be parsed
    MalformedBody,
}

/// Result of classifying a single failure from the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyReport {
    /// How the run ended
    pub outcome: ClassifyOutcome,

    /// Error kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,

    /// Error title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Error message shown to the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Committed error message of the account, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_error_message: Option<String>,

    /// Error log entries written during the run
    pub logs: Vec<ErrorLogEntry>,
}

impl ClassifyReport {
    /// Create a report without error details
    pub fn new(outcome: ClassifyOutcome, logs: Vec<ErrorLogEntry>) -> Self {
        Self {
            outcome,
            kind: None,
            title: None,
            message: None,
            account_error_message: None,
            logs,
        }
    }

    /// Create a report for a banking error
    pub fn banking(error: &BankingError, logs: Vec<ErrorLogEntry>) -> Self {
        Self {
            kind: Some(error.kind),
            title: Some(error.title.clone()),
            message: Some(error.message.clone()),
            ..Self::new(ClassifyOutcome::BankingError, logs)
        }
    }

    /// Attach the committed account error message
    pub fn with_account_error_message(mut self, message: Option<String>) -> Self {
        self.account_error_message = message;
        self
    }
}
