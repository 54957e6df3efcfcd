//! Banking error handling for a bank-feed integration
//!
//! Failed calls to the banking provider are normalised into a small set of
//! user-facing [`BankingError`]s. Each failure is written to an error log,
//! and the user message is stored on the affected bank account. Errors
//! reported by the client-side banking widget are acknowledged by logging
//! them and ending the widget's session on the admin app.
//!
//! # Usage
//!
//! ## HTTP Server Mode
//!
//! ```bash
//! banking-errors server --port 8417
//! ```
//!
//! ## Classify Mode
//!
//! ```bash
//! banking-errors classify --status 401 --account "Main Account"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use banking_error_handler::{
//!     ErrorClassifier, ErrorKind, HttpFailure, LocalStore, MemoryErrorLog, Settings,
//! };
//!
//! let settings = Settings::default();
//! let store = Arc::new(LocalStore::in_memory());
//! store.insert_account("Main Account").unwrap();
//!
//! let classifier = ErrorClassifier::new(
//!     Arc::new(MemoryErrorLog::new(10)),
//!     store,
//!     settings.messages,
//! );
//! let failure = HttpFailure::with_status(reqwest::StatusCode::UNAUTHORIZED);
//! let error = classifier.handle(failure.into(), Some("Main Account")).unwrap_err();
//! assert_eq!(error.as_banking().unwrap().kind, ErrorKind::Authentication);
//! ```

pub mod admin;
pub mod cli;
pub mod config;
pub mod error;
pub mod error_log;
pub mod handler;
pub mod server;
pub mod storage;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, Settings};
pub use error::{BankingError, Error, ErrorKind, Result};
pub use error_log::{ErrorLog, MemoryErrorLog, TracingErrorLog};
pub use handler::{ErrorClassifier, Failure, HttpFailure, UiErrorHandler};
pub use storage::LocalStore;
