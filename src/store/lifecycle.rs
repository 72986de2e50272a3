// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Store lifecycle: construction and startup synchronization.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::info;

use crate::cache::BoundedCache;
use crate::config::StoreConfig;
use crate::storage::file::SnapshotFile;
use crate::storage::redis::RedisCollection;
use crate::storage::traits::{RemoteCollection, StoreError};

use super::types::StatCounters;
use super::{StoreMode, StoreState, TieredStore};

impl TieredStore {
    /// Construct a store from a config and an optional remote handle.
    ///
    /// Dependencies are injected: the snapshot file comes from
    /// `config.snapshot_path` (created on first use), the cache capacity
    /// from `config.capacity` (validated here — a bad capacity fails at
    /// startup, not at call time), and the store runs in `Remote` mode iff
    /// a remote collection is supplied.
    ///
    /// The store begins in `Created` state; call
    /// [`bootstrap()`](Self::bootstrap) before serving callers.
    pub async fn new(
        config: StoreConfig,
        remote: Option<Arc<dyn RemoteCollection>>,
    ) -> Result<Self, StoreError> {
        config.validate()?;

        let file = SnapshotFile::open(&config.snapshot_path).await?;
        let mode = if remote.is_some() {
            StoreMode::Remote
        } else {
            StoreMode::Local
        };
        let (state, state_rx) = watch::channel(StoreState::Created);

        info!(
            store = %config.name,
            %mode,
            capacity = config.capacity,
            path = %file.path().display(),
            "Tiered store created"
        );

        Ok(Self {
            cache: Mutex::new(BoundedCache::new(config.capacity)),
            config,
            mode,
            state,
            state_rx,
            file,
            remote,
            stats: StatCounters::default(),
        })
    }

    /// Construct a store, connecting a [`RedisCollection`] when
    /// `config.remote_url` is set.
    pub async fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let remote: Option<Arc<dyn RemoteCollection>> = match config.remote_url.as_deref() {
            Some(url) => {
                let prefix = config.remote_prefix();
                info!(store = %config.name, url = %url, prefix = %prefix, "Connecting remote collection");
                Some(Arc::new(
                    RedisCollection::with_prefix(url, Some(&prefix)).await?,
                ))
            }
            None => None,
        };
        Self::new(config, remote).await
    }

    /// Synchronize the tiers before serving callers.
    ///
    /// `Remote` mode: the remote collection is authoritative — its full
    /// contents replace both the cache and the snapshot file, discarding
    /// any prior local state. `Local` mode: the snapshot file is loaded
    /// and primes the cache. Either way the cache is rebuilt from the
    /// authoritative tier unconditionally; there is no equality shortcut
    /// that could mask a divergent mirror.
    #[tracing::instrument(skip(self), fields(store = %self.config.name, mode = %self.mode))]
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        let _ = self.state.send(StoreState::Syncing);
        let mut cache = self.cache.lock().await;

        match self.remote {
            Some(ref remote) => {
                let snapshot = remote.find_all().await?;
                info!(entries = snapshot.len(), "Priming cache and file mirror from remote");
                self.file.replace(&snapshot).await?;
                cache.replace_all(snapshot);
            }
            None => {
                let snapshot = self.file.load().await?;
                info!(entries = snapshot.len(), "Priming cache from snapshot file");
                cache.replace_all(snapshot);
            }
        }

        let _ = self.state.send(StoreState::Ready);
        info!("Tiered store ready");
        Ok(())
    }
}
