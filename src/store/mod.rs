// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Tiered store orchestration.
//!
//! [`TieredStore`] is the single entry point combining the tiers with a
//! fixed precedence:
//!
//! - lookups: cache → snapshot file (Local) or cache → remote (Remote),
//!   backfilling the cache on every non-cache hit
//! - inserts: write-through — cache, then every configured durable tier
//!
//! # Lifecycle
//!
//! ```text
//! Created → Syncing → Ready
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tier_store::{Entry, StoreConfig, TieredStore};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), tier_store::StoreError> {
//! let config = StoreConfig::new("prefixes", "data/prefixes.json");
//! let store = TieredStore::open(config).await?;
//! store.bootstrap().await?;
//!
//! let entry = Entry::from_value(json!({"prefixes": ["!"]})).unwrap();
//! store.insert_one(155780111197536256u64, entry).await?;
//!
//! let found = store.find_one("155780111197536256").await?;
//! assert_eq!(found.get("prefixes"), Some(&json!(["!"])));
//! # Ok(())
//! # }
//! ```

mod api;
mod lifecycle;
mod types;

pub use types::{StoreMode, StoreState, TierStats};
use types::{bump, StatCounters};

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::cache::BoundedCache;
use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::storage::file::SnapshotFile;
use crate::storage::traits::{RemoteCollection, StoreError};

/// A tiered key → entry store: bounded cache over a durable snapshot file,
/// optionally backed by an authoritative remote collection.
///
/// # Concurrency
///
/// One `Mutex` guards the cache and is held across the tier I/O of each
/// operation. The snapshot file's read-modify-write `append` makes this
/// mandatory: two interleaved appends would lose one writer's update.
/// Coarse-grained locking is acceptable here — entries are small and
/// low-frequency relative to the surrounding system's workload. It also
/// buys the ordering guarantee: a lookup issued after a completed insert
/// observes that insert, because the cache was updated inside the same
/// critical section as the durable write.
///
/// Multiple instances over the same file path are not supported.
pub struct TieredStore {
    config: StoreConfig,
    mode: StoreMode,

    /// Lifecycle state (broadcast to watchers).
    state: watch::Sender<StoreState>,
    state_rx: watch::Receiver<StoreState>,

    /// The critical-section lock; see the type-level concurrency notes.
    cache: Mutex<BoundedCache>,

    file: SnapshotFile,
    remote: Option<Arc<dyn RemoteCollection>>,

    stats: StatCounters,
}

impl TieredStore {
    /// Look up an entry by key.
    ///
    /// Consults the cache first (fast path, no I/O), then the configured
    /// backing tier, backfilling the cache on a hit. In `Remote` mode a hit
    /// is also mirrored into the snapshot file so the local mirror stays
    /// warm. A key absent from every consulted tier is the expected
    /// negative result: [`StoreError::NotFound`] names the key and the
    /// tier chain.
    #[tracing::instrument(skip(self), fields(store = %self.config.name, tier = tracing::field::Empty))]
    pub async fn find_one(&self, key: &str) -> Result<Entry, StoreError> {
        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.get(key) {
            tracing::Span::current().record("tier", "cache");
            debug!("Cache hit");
            bump(&self.stats.cache_hits);
            return Ok(entry.clone());
        }

        match self.remote {
            // Remote authoritative: the file mirror is never consulted on a
            // cache miss while a remote is configured.
            Some(ref remote) => {
                bump(&self.stats.remote_reads);
                match remote.find_one(key).await? {
                    Some(entry) => {
                        tracing::Span::current().record("tier", "remote");
                        debug!("Remote hit, backfilling cache and file mirror");
                        bump(&self.stats.remote_hits);
                        cache.put(key, entry.clone());
                        self.file.append(key, &entry).await?;
                        Ok(entry)
                    }
                    None => {
                        tracing::Span::current().record("tier", "miss");
                        bump(&self.stats.not_found);
                        Err(StoreError::NotFound {
                            key: key.to_string(),
                            tiers: "cache -> remote",
                        })
                    }
                }
            }
            None => {
                bump(&self.stats.file_reads);
                match self.file.read_key(key).await? {
                    Some(entry) => {
                        tracing::Span::current().record("tier", "file");
                        debug!("File hit, backfilling cache");
                        bump(&self.stats.file_hits);
                        cache.put(key, entry.clone());
                        Ok(entry)
                    }
                    None => {
                        tracing::Span::current().record("tier", "miss");
                        bump(&self.stats.not_found);
                        Err(StoreError::NotFound {
                            key: key.to_string(),
                            tiers: "cache -> file",
                        })
                    }
                }
            }
        }
    }

    /// Insert (or overwrite) an entry under a key, write-through.
    ///
    /// The cache and every configured durable tier are updated in the same
    /// logical operation. There is no partial-success return: if any tier
    /// rejects the write the error propagates and the just-written cache
    /// entry is removed, so a failed call never leaves a value readable
    /// from the cache that no backing tier holds.
    ///
    /// Keys are stored stringified; any `ToString` key is accepted
    /// (numeric ids included).
    #[tracing::instrument(skip(self, key, entry), fields(store = %self.config.name, key = tracing::field::Empty))]
    pub async fn insert_one(
        &self,
        key: impl ToString,
        entry: Entry,
    ) -> Result<(), StoreError> {
        let key = key.to_string();
        tracing::Span::current().record("key", key.as_str());

        let mut cache = self.cache.lock().await;
        cache.put(key.clone(), entry.clone());

        if let Err(e) = self.persist(&key, &entry).await {
            cache.remove(&key);
            return Err(e);
        }

        bump(&self.stats.inserts);
        debug!("Entry written through");
        Ok(())
    }

    /// Write one entry to every configured durable tier, remote first.
    async fn persist(&self, key: &str, entry: &Entry) -> Result<(), StoreError> {
        if let Some(ref remote) = self.remote {
            remote.insert_one(key, entry).await?;
        }
        self.file.append(key, entry).await
    }
}
