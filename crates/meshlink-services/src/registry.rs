//! In-memory registry of expiring download tokens.
//!
//! Each entry exclusively owns its backing file. Whoever removes an entry from the
//! map (lookup of an expired token, `consume`, a sweep, `drain`) schedules the file
//! deletion, and since removal happens under the lock exactly one caller ever does.
//! Deletion is fire-and-forget: no operation here waits on the filesystem.

use chrono::{DateTime, Utc};
use meshlink_core::{Clock, DownloadEntry, SystemClock};
use meshlink_storage::delete_in_background;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Terminal lookup failures. Neither is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Download link not found")]
    NotFound,
    #[error("Download link has expired")]
    Expired,
}

pub struct DownloadRegistry {
    entries: Mutex<HashMap<String, DownloadEntry>>,
    clock: Arc<dyn Clock>,
}

impl DownloadRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, DownloadEntry>> {
        // Every critical section leaves the map consistent, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `file_path` and return a fresh token valid for `ttl`.
    ///
    /// Ownership of the file passes to the registry. Expired entries are swept as a
    /// side effect.
    pub fn create(&self, file_path: PathBuf, base_name: impl Into<String>, ttl: Duration) -> String {
        let now = self.clock.now();
        // A ttl past chrono's range saturates rather than overflowing.
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut entries = self.lock();
        let swept = Self::sweep_locked(&mut entries, now);

        let token = loop {
            let candidate = Uuid::new_v4().simple().to_string();
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };

        entries.insert(
            token.clone(),
            DownloadEntry {
                token: token.clone(),
                file_path,
                base_name: base_name.into(),
                expires_at,
            },
        );
        let live = entries.len();
        drop(entries);

        tracing::debug!(token = %token, %expires_at, swept, live, "Download token created");
        token
    }

    /// Look up a live entry. An expired entry is removed, its file deleted, and
    /// `Expired` returned; every later lookup of that token is `NotFound`.
    pub fn get(&self, token: &str) -> Result<DownloadEntry, RegistryError> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match entries.get(token).map(|e| e.is_expired_at(now)) {
            None => Err(RegistryError::NotFound),
            Some(false) => Ok(entries[token].clone()),
            Some(true) => {
                let expired = entries.remove(token);
                drop(entries);
                if let Some(entry) = expired {
                    Self::discard(entry, "expired");
                }
                Err(RegistryError::Expired)
            }
        }
    }

    /// Like [`get`](Self::get), but a live entry is removed too and its file deleted.
    pub fn consume(&self, token: &str) -> Result<DownloadEntry, RegistryError> {
        let now = self.clock.now();
        let removed = self.lock().remove(token);
        match removed {
            None => Err(RegistryError::NotFound),
            Some(entry) if entry.is_expired_at(now) => {
                Self::discard(entry, "expired");
                Err(RegistryError::Expired)
            }
            Some(entry) => {
                Self::discard(entry.clone(), "consumed");
                Ok(entry)
            }
        }
    }

    /// Remove every expired entry and delete its file. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        Self::sweep_locked(&mut self.lock(), now)
    }

    fn sweep_locked(entries: &mut HashMap<String, DownloadEntry>, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.is_expired_at(now))
            .map(|(token, _)| token.clone())
            .collect();

        for token in &expired {
            if let Some(entry) = entries.remove(token) {
                Self::discard(entry, "swept");
            }
        }
        expired.len()
    }

    /// Remove every entry regardless of expiry and delete the files. Used at shutdown.
    pub fn drain(&self) -> usize {
        let drained: Vec<DownloadEntry> = self.lock().drain().map(|(_, e)| e).collect();
        let count = drained.len();
        for entry in drained {
            Self::discard(entry, "drained");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn discard(entry: DownloadEntry, reason: &'static str) {
        tracing::debug!(
            token = %entry.token,
            path = %entry.file_path.display(),
            reason,
            "Download entry removed"
        );
        delete_in_background(entry.file_path);
    }
}

impl Default for DownloadRegistry {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for DownloadRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadRegistry")
            .field("entries", &self.len())
            .finish()
    }
}
