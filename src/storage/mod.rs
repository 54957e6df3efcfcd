//! Account and session storage
//!
//! The classifier only ever writes one field, the account's error message;
//! the UI handler only ever reads a session's secret id. Both go through the
//! traits here so the backing store can be swapped.

pub mod local;

pub use local::LocalStore;

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted bank account, as far as this crate is concerned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Last banking error shown for this account
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Banking session opened by the client-side widget
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Public short id handed to the client
    pub session_id_short: String,
    /// Secret session id known to the admin app
    session_id: String,
}

impl SessionRecord {
    /// Create a session record
    pub fn new(session_id_short: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            session_id_short: session_id_short.into(),
            session_id: session_id.into(),
        }
    }

    /// The secret session id
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("session_id_short", &self.session_id_short)
            .field("session_id", &"<redacted>")
            .finish()
    }
}

/// Store holding the error message of bank accounts
///
/// Writes are staged until [`AccountStore::commit`]; readers only ever see
/// committed values.
pub trait AccountStore: Send + Sync {
    /// Stage a new error message for an account
    fn set_error_message(&self, account: &str, message: &str) -> Result<()>;

    /// Publish all staged writes
    fn commit(&self) -> Result<()>;

    /// Committed error message of an account
    fn error_message(&self, account: &str) -> Result<Option<String>>;
}

/// Store holding banking sessions
pub trait SessionStore: Send + Sync {
    /// Look up a session by its short id
    fn get_session(&self, session_id_short: &str) -> Result<SessionRecord>;
}
