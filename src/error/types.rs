//! Error types for the banking error handler
//!
//! Provides the crate-wide error enum together with the single domain error
//! that every recognised banking-provider failure is normalised into.

use crate::handler::HttpFailure;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a banking-provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No HTTP response was received (network, timeout, unexpected failure)
    NetworkOrUnexpected,
    /// HTTP 401
    Authentication,
    /// HTTP 403
    Authorization,
    /// Response without a JSON content type (gateway pages and similar)
    NonJsonGateway,
    /// The admin app's own framework crashed
    UpstreamServer,
    /// Business error reported by the aggregator
    Vendor,
}

impl ErrorKind {
    /// Stable snake_case name, as used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkOrUnexpected => "network_or_unexpected",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::NonJsonGateway => "non_json_gateway",
            ErrorKind::UpstreamServer => "upstream_server",
            ErrorKind::Vendor => "vendor",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing banking error
///
/// Raised for every recognised banking-provider failure. `message` may carry
/// HTML (the multi-error case renders a list) and is meant to be shown to the
/// end user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{title}: {message}")]
pub struct BankingError {
    /// Which rule recognised the failure
    pub kind: ErrorKind,
    /// Dialog title
    pub title: String,
    /// Message for the end user
    pub message: String,
}

impl BankingError {
    /// Create a new banking error
    pub fn new(kind: ErrorKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Main error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// Normalised banking-provider failure
    #[error(transparent)]
    Banking(#[from] BankingError),

    /// Failure that carried no HTTP response, passed through untouched
    #[error("{0}")]
    Unhandled(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success response from the admin app outside the classifier
    #[error("Upstream request failed: {0}")]
    Upstream(HttpFailure),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage errors
    #[error("Storage error during {operation}: {details}")]
    Storage {
        /// The storage operation that failed
        operation: String,
        /// Detailed error description
        details: String,
    },

    /// Missing record
    #[error("{entity} '{name}' not found")]
    NotFound {
        /// Kind of record that was looked up
        entity: String,
        /// Identifier used for the lookup
        name: String,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a storage error
    pub fn storage<S: Into<String>>(operation: S, details: S) -> Self {
        Self::Storage {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(entity: S, name: S) -> Self {
        Self::NotFound {
            entity: entity.into(),
            name: name.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The banking error, if this is one
    pub fn as_banking(&self) -> Option<&BankingError> {
        match self {
            Error::Banking(err) => Some(err),
            _ => None,
        }
    }

    /// Banking errors are validation failures towards the caller
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Banking(_))
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Upstream(failure) => failure.status().is_server_error(),
            Error::Banking(err) => matches!(
                err.kind,
                ErrorKind::NonJsonGateway | ErrorKind::UpstreamServer
            ),
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Banking(..) => "validation",
            Error::Unhandled(..) => "unhandled",
            Error::Upstream(..) => "upstream",
            Error::Http(..) => "http",
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::Storage { .. } => "storage",
            Error::NotFound { .. } => "not_found",
            Error::Config { .. } => "config",
            Error::Internal { .. } => "internal",
        }
    }
}
