//! Error handling for the banking error handler
//!
//! This module defines error types and formatting helpers used throughout the application.

pub mod formatting;
pub mod types;

pub use formatting::{
    format_error, format_error_chain, format_error_for_api, format_error_for_logging,
};
pub use types::{BankingError, Error, ErrorKind, Result};
