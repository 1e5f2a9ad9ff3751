use cinescope_config::PathManager;
use cinescope_models::{FavoriteEntry, WatchlistEntry};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read collection record: {0}")]
    Read(String),
    #[error("failed to write collection record: {0}")]
    Write(String),
}

/// Durable storage port for per-user collection records.
///
/// `load_*` returns `Ok(None)` both when no record exists and when the stored
/// record is malformed; corruption is logged and discarded, never surfaced.
/// `save_*` replaces the full record for that user and collection.
pub trait CollectionStorage: Send + Sync {
    fn load_watchlist(&self, user_id: &str) -> Result<Option<Vec<WatchlistEntry>>, StorageError>;
    fn save_watchlist(&self, user_id: &str, entries: &[WatchlistEntry]) -> Result<(), StorageError>;
    fn load_favorites(&self, user_id: &str) -> Result<Option<Vec<FavoriteEntry>>, StorageError>;
    fn save_favorites(&self, user_id: &str, entries: &[FavoriteEntry]) -> Result<(), StorageError>;
}

/// One JSON document per (user, collection) under a root directory:
/// `<root>/<user_id>/watchlist.json` and `<root>/<user_id>/favorites.json`.
/// Isolation between users comes purely from this key-space partitioning.
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_paths(paths: &PathManager) -> Self {
        Self::new(paths.collections_dir())
    }

    fn record_path(&self, user_id: &str, collection: &str) -> PathBuf {
        self.root.join(user_id).join(format!("{}.json", collection))
    }

    fn load_record<T>(&self, user_id: &str, collection: &str) -> Result<Option<Vec<T>>, StorageError>
    where
        T: DeserializeOwned,
    {
        let path = self.record_path(user_id, collection);

        if !path.exists() {
            debug!("no {} record for user {} (file does not exist)", collection, user_id);
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| StorageError::Read(format!("{}: {}", path.display(), e)))?;

        match serde_json::from_str::<Vec<T>>(&content) {
            Ok(entries) => {
                debug!("loaded {} {} entries for user {}", entries.len(), collection, user_id);
                Ok(Some(entries))
            }
            Err(e) => {
                warn!(
                    "corrupt {} record for user {}: {}. Deleting corrupted file.",
                    collection, user_id, e
                );
                if let Err(rm_err) = std::fs::remove_file(&path) {
                    warn!("failed to delete corrupted record: {}", rm_err);
                }
                Ok(None)
            }
        }
    }

    fn save_record<T>(&self, user_id: &str, collection: &str, entries: &[T]) -> Result<(), StorageError>
    where
        T: Serialize,
    {
        let path = self.record_path(user_id, collection);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Write(format!("{}: {}", path.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Write(format!("serialize {}: {}", collection, e)))?;
        std::fs::write(&path, json)
            .map_err(|e| StorageError::Write(format!("{}: {}", path.display(), e)))?;

        debug!("saved {} {} entries for user {}", entries.len(), collection, user_id);
        Ok(())
    }
}

impl CollectionStorage for JsonFileStorage {
    fn load_watchlist(&self, user_id: &str) -> Result<Option<Vec<WatchlistEntry>>, StorageError> {
        self.load_record(user_id, "watchlist")
    }

    fn save_watchlist(&self, user_id: &str, entries: &[WatchlistEntry]) -> Result<(), StorageError> {
        self.save_record(user_id, "watchlist", entries)
    }

    fn load_favorites(&self, user_id: &str) -> Result<Option<Vec<FavoriteEntry>>, StorageError> {
        self.load_record(user_id, "favorites")
    }

    fn save_favorites(&self, user_id: &str, entries: &[FavoriteEntry]) -> Result<(), StorageError> {
        self.save_record(user_id, "favorites", entries)
    }
}

/// HashMap-backed storage. Records go through the same JSON round-trip as the
/// file backend so serialization behavior stays identical; used by tests and
/// ephemeral runs.
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn load_record<T>(&self, user_id: &str, collection: &str) -> Result<Option<Vec<T>>, StorageError>
    where
        T: DeserializeOwned,
    {
        let records = self
            .records
            .lock()
            .map_err(|_| StorageError::Read("storage lock poisoned".to_string()))?;

        let Some(content) = records.get(&(user_id.to_string(), collection.to_string())) else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<T>>(content) {
            Ok(entries) => Ok(Some(entries)),
            Err(e) => {
                warn!("corrupt in-memory {} record for user {}: {}", collection, user_id, e);
                Ok(None)
            }
        }
    }

    fn save_record<T>(&self, user_id: &str, collection: &str, entries: &[T]) -> Result<(), StorageError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(entries)
            .map_err(|e| StorageError::Write(format!("serialize {}: {}", collection, e)))?;

        let mut records = self
            .records
            .lock()
            .map_err(|_| StorageError::Write("storage lock poisoned".to_string()))?;
        records.insert((user_id.to_string(), collection.to_string()), json);
        Ok(())
    }
}

impl CollectionStorage for MemoryStorage {
    fn load_watchlist(&self, user_id: &str) -> Result<Option<Vec<WatchlistEntry>>, StorageError> {
        self.load_record(user_id, "watchlist")
    }

    fn save_watchlist(&self, user_id: &str, entries: &[WatchlistEntry]) -> Result<(), StorageError> {
        self.save_record(user_id, "watchlist", entries)
    }

    fn load_favorites(&self, user_id: &str) -> Result<Option<Vec<FavoriteEntry>>, StorageError> {
        self.load_record(user_id, "favorites")
    }

    fn save_favorites(&self, user_id: &str, entries: &[FavoriteEntry]) -> Result<(), StorageError> {
        self.save_record(user_id, "favorites", entries)
    }
}
