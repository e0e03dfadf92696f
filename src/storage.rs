//! Guest save slot over a key/value store.
//!
//! A save is a [`Snapshot`] plus the time it was written. Saves older than the
//! slot's time-to-live are discarded on load.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::snapshot::Snapshot;

/// Key under which the guest save is stored.
pub const GUEST_SAVE_KEY: &str = "blackjack_guest_save";

/// Saves older than this are discarded: seven days, in milliseconds.
pub const SAVE_TTL_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// A string key/value store.
pub trait Storage {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, used where there is no persistent medium.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key in a directory.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(feature = "std")]
impl FileStorage {
    /// Uses `dir` as the save directory. It is created on first write.
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(alloc::format!("{key}.json"))
    }
}

#[cfg(feature = "std")]
impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Milliseconds since the Unix epoch, 0 if the clock is before it.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[must_use]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// A snapshot and the time it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// The saved round.
    pub snapshot: Snapshot,
}

/// The single guest save slot.
#[derive(Debug, Clone)]
pub struct GuestSlot<S> {
    storage: S,
    key: String,
    ttl_ms: u64,
}

impl<S: Storage> GuestSlot<S> {
    /// A slot under [`GUEST_SAVE_KEY`] expiring after [`SAVE_TTL_MS`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: GUEST_SAVE_KEY.to_string(),
            ttl_ms: SAVE_TTL_MS,
        }
    }

    /// Overrides the time-to-live.
    #[must_use]
    pub const fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Writes `snapshot` stamped with `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backing store fails.
    pub fn save(&mut self, snapshot: &Snapshot, now_ms: u64) -> Result<(), StorageError> {
        let saved = SavedGame {
            timestamp: now_ms,
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_string(&saved)?;
        self.storage.write(&self.key, &json)
    }

    /// Reads the save if one exists and is younger than the time-to-live.
    ///
    /// Expired saves are removed. Unreadable saves are reported as absent.
    pub fn load(&mut self, now_ms: u64) -> Option<SavedGame> {
        let json = match self.storage.read(&self.key) {
            Ok(json) => json?,
            Err(err) => {
                log::warn!("could not read guest save: {err}");
                return None;
            }
        };

        let mut saved: SavedGame = match serde_json::from_str(&json) {
            Ok(saved) => saved,
            Err(err) => {
                log::warn!("ignoring corrupt guest save: {err}");
                return None;
            }
        };

        if now_ms.saturating_sub(saved.timestamp) > self.ttl_ms {
            log::info!("guest save expired, removing it");
            if let Err(err) = self.storage.remove(&self.key) {
                log::warn!("could not remove expired guest save: {err}");
            }
            return None;
        }

        saved.snapshot = match saved.snapshot.migrate() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("ignoring guest save: {err}");
                return None;
            }
        };
        Some(saved)
    }

    /// Deletes the save.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }

    /// Whether an unexpired save exists.
    pub fn has_progress(&mut self, now_ms: u64) -> bool {
        self.load(now_ms).is_some()
    }

    /// The backing store.
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}
