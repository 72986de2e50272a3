use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::entry::{Entry, Snapshot};

/// Errors surfaced by store operations.
///
/// `NotFound` is the expected negative result for unregistered keys; every
/// other variant aborts the operation in progress and propagates — tier I/O
/// failures are never swallowed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key absent from every consulted tier.
    #[error("no entry for key '{key}' (consulted {tiers})")]
    NotFound {
        key: String,
        /// The tier chain consulted, e.g. `"cache -> file"`.
        tiers: &'static str,
    },

    /// Snapshot file unreadable or unwritable.
    #[error("snapshot file I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file contents do not parse as a key → entry mapping.
    #[error("snapshot file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Remote collection call failed (transport, timeout, auth).
    #[error("remote collection unavailable: {0}")]
    RemoteUnavailable(String),

    /// Non-positive cache capacity at construction.
    #[error("cache capacity must be positive, got {0}")]
    InvalidCapacity(usize),
}

impl StoreError {
    /// Whether this is the expected negative result rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// An externally hosted keyed collection, authoritative when configured.
///
/// The store treats this purely as an interface: lookup-by-key, insert, and
/// a bulk scan used once at startup to prime the local mirror. No retry or
/// backoff lives behind it — transport resilience belongs to the client
/// implementation, and failures surface as
/// [`StoreError::RemoteUnavailable`].
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Look up a single entry by key.
    async fn find_one(&self, key: &str) -> Result<Option<Entry>, StoreError>;

    /// Insert (or overwrite) an entry under a key.
    async fn insert_one(&self, key: &str, entry: &Entry) -> Result<(), StoreError>;

    /// Fetch the entire collection as a snapshot.
    async fn find_all(&self) -> Result<Snapshot, StoreError>;
}
