//! Banking error handling
//!
//! The classifier normalises failures of calls to the banking provider; the
//! UI handler acknowledges errors reported by the client-side widget.

pub mod classifier;
pub mod failure;
pub mod payload;
pub mod ui;

pub use classifier::{CONSENT_NOT_GRANTED, Classification, ErrorClassifier, augment_message};
pub use failure::{Failure, HttpFailure};
pub use ui::UiErrorHandler;
