//! Local account and session store
//!
//! Keeps records in memory and, when opened on a path, mirrors every
//! committed change into a JSON file.

use crate::{
    Result,
    config::StorageSettings,
    storage::{AccountRecord, AccountStore, SessionRecord, SessionStore},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};
use tracing::{debug, error, warn};

/// Serialized form of the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    accounts: BTreeMap<String, AccountRecord>,
    #[serde(default)]
    sessions: BTreeMap<String, SessionRecord>,
}

/// In-memory store with optional JSON file persistence
#[derive(Debug)]
pub struct LocalStore {
    /// Backing file, if any
    path: Option<PathBuf>,
    /// State visible to readers
    committed: RwLock<StoreState>,
    /// Error messages staged since the last commit, by account
    pending: Mutex<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Create an empty store without persistence
    pub fn in_memory() -> Self {
        Self {
            path: None,
            committed: RwLock::new(StoreState::default()),
            pending: Mutex::new(BTreeMap::new()),
        }
    }

    /// Open a file-backed store
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                error!("Failed to parse store file {:?}: {}", path, e);
                crate::Error::storage("load", &format!("Invalid store file: {}", e))
            })?
        } else {
            debug!("Store file does not exist yet: {:?}", path);
            StoreState::default()
        };

        Ok(Self {
            path: Some(path),
            committed: RwLock::new(state),
            pending: Mutex::new(BTreeMap::new()),
        })
    }

    /// Open the store described by the storage settings
    pub fn from_settings(settings: &StorageSettings) -> Result<Self> {
        match &settings.path {
            Some(path) => Self::open(path.clone()),
            None => Ok(Self::in_memory()),
        }
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register an account; existing accounts are left untouched
    pub fn insert_account(&self, account: &str) -> Result<()> {
        let mut state = self.write_state();
        state.accounts.entry(account.to_string()).or_default();
        self.persist(&state)
    }

    /// Register or replace a session
    pub fn insert_session(&self, record: SessionRecord) -> Result<()> {
        let mut state = self.write_state();
        state
            .sessions
            .insert(record.session_id_short.clone(), record);
        self.persist(&state)
    }

    /// Names of all known accounts
    pub fn account_names(&self) -> Vec<String> {
        self.read_state().accounts.keys().cloned().collect()
    }

    /// Whether an account is known
    pub fn has_account(&self, account: &str) -> bool {
        self.read_state().accounts.contains_key(account)
    }

    /// Discard all staged writes
    pub fn rollback(&self) {
        let discarded = std::mem::take(&mut *self.lock_pending());
        if !discarded.is_empty() {
            debug!("Discarded {} staged account writes", discarded.len());
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.committed.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, StoreState> {
        self.committed.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the state to the backing file, if any
    fn persist(&self, state: &StoreState) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = serde_json::to_string_pretty(state)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            error!("Failed to create store directory {:?}: {}", parent, e);
            return Err(crate::Error::storage(
                "directory_creation",
                &format!("Directory creation failed: {}", e),
            ));
        }

        // Write next to the target and rename so readers never see a partial file
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, content)
            .and_then(|_| std::fs::rename(&tmp_path, path))
            .map_err(|e| {
                error!("Failed to write store file {:?}: {}", path, e);
                crate::Error::storage("file_write", &format!("Write failed: {}", e))
            })?;

        debug!("Store saved to: {:?}", path);
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl AccountStore for LocalStore {
    fn set_error_message(&self, account: &str, message: &str) -> Result<()> {
        if !self.has_account(account) {
            warn!("Ignoring error message for unknown account '{}'", account);
            return Ok(());
        }

        self.lock_pending()
            .insert(account.to_string(), message.to_string());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let staged = std::mem::take(&mut *self.lock_pending());
        if staged.is_empty() {
            return Ok(());
        }

        let mut state = self.write_state();
        for (account, message) in staged {
            if let Some(record) = state.accounts.get_mut(&account) {
                record.error_message = Some(message);
            }
        }
        self.persist(&state)
    }

    fn error_message(&self, account: &str) -> Result<Option<String>> {
        self.read_state()
            .accounts
            .get(account)
            .map(|record| record.error_message.clone())
            .ok_or_else(|| crate::Error::not_found("Bank Account", account))
    }
}

impl SessionStore for LocalStore {
    fn get_session(&self, session_id_short: &str) -> Result<SessionRecord> {
        self.read_state()
            .sessions
            .get(session_id_short)
            .cloned()
            .ok_or_else(|| crate::Error::not_found("Banking Session", session_id_short))
    }
}
