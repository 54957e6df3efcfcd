//! Diagnostic error log
//!
//! Classifier and UI handler write operator-facing entries through the
//! [`ErrorLog`] trait. Entries carry a short title and a free-text body
//! (raw response text or serialized JSON).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Sink for diagnostic error entries
pub trait ErrorLog: Send + Sync {
    /// Record an entry
    fn log_error(&self, title: &str, message: &str);
}

/// Error log that only emits tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorLog;

impl ErrorLog for TracingErrorLog {
    fn log_error(&self, title: &str, message: &str) {
        tracing::error!(title = %title, "{}", message);
    }
}

/// A recorded error log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    /// Entry title
    pub title: String,
    /// Entry body
    pub message: String,
    /// When the entry was recorded
    pub logged_at: DateTime<Utc>,
}

/// Bounded in-memory error log
///
/// Keeps the most recent `capacity` entries and forwards every entry to
/// tracing as well.
#[derive(Debug)]
pub struct MemoryErrorLog {
    capacity: usize,
    entries: Mutex<VecDeque<ErrorLogEntry>>,
}

impl MemoryErrorLog {
    /// Create a log holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Snapshot of the retained entries, oldest first
    pub fn entries(&self) -> Vec<ErrorLogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no entry is retained
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all retained entries
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ErrorLogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ErrorLog for MemoryErrorLog {
    fn log_error(&self, title: &str, message: &str) {
        TracingErrorLog.log_error(title, message);

        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(ErrorLogEntry {
            title: title.to_string(),
            message: message.to_string(),
            logged_at: Utc::now(),
        });
    }
}
