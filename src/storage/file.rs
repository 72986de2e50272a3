//! Durable snapshot file store.
//!
//! Persists the full key → entry mapping as a pretty-printed JSON object:
//! structured, human-readable, and an exact round-trip. A missing or empty
//! file is an empty store, never an error; the file is created on first
//! use. Writes go through a temp file and an atomic rename so a torn write
//! cannot destroy the previous snapshot.
//!
//! `append` is inherently read-modify-write; callers must serialize access
//! to one store instance (the owning [`TieredStore`](crate::TieredStore)
//! holds its critical-section lock across every call here).

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::entry::{Entry, Snapshot};
use crate::storage::traits::StoreError;

/// Snapshot persistence for one logical store.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Open a snapshot file, creating parent directories and an empty file
    /// if none exists yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Io {
                        path: path.clone(),
                        source: e,
                    })?;
            }
        }

        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "Opened existing snapshot file");
        } else {
            fs::write(&path, b"{}\n").await.map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;
            debug!(path = %path.display(), "Created empty snapshot file");
        }

        Ok(Self { path })
    }

    /// The file path this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the entire file into a snapshot.
    ///
    /// Missing or empty files yield an empty mapping. A file that exists
    /// but does not parse is surfaced as [`StoreError::Corrupt`] — the
    /// store cannot silently continue over lost durability.
    pub async fn load(&self) -> Result<Snapshot, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Snapshot::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if text.trim().is_empty() {
            return Ok(Snapshot::new());
        }

        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Re-read the file fresh and look up one key.
    ///
    /// Ground-truth lookup independent of any cached state.
    pub async fn read_key(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        let mut snapshot = self.load().await?;
        Ok(snapshot.remove(key))
    }

    /// Merge one key into the snapshot (overwrite if present) and write the
    /// full mapping back.
    pub async fn append(&self, key: &str, entry: &Entry) -> Result<(), StoreError> {
        let mut snapshot = self.load().await?;
        snapshot.insert(key.to_string(), entry.clone());
        self.write_snapshot(&snapshot).await
    }

    /// Overwrite the file entirely with the given mapping.
    pub async fn replace(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.write_snapshot(snapshot).await
    }

    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(snapshot).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        // Temp file + rename: the previous snapshot stays intact until the
        // new one is fully on disk.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text.as_bytes())
            .await
            .map_err(|e| StoreError::Io {
                path: tmp.clone(),
                source: e,
            })?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io {
                path: self.path.clone(),
                source: e,
            })?;

        debug!(path = %self.path.display(), entries = snapshot.len(), "Snapshot written");
        Ok(())
    }
}
