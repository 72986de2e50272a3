//! Query and convenience operations.
//!
//! The caller contract is `find_one` / `insert_one` (see
//! [`super::TieredStore`]); this module adds the completeness API:
//! - `contains()` - non-erroring existence probe
//! - `find_or_insert_with()` - cache-aside get-or-insert
//! - `list_keys()` - authoritative-tier key listing
//! - `len()` / `is_empty()` - cache occupancy
//! - `stats()` / `state()` / `mode()` - observability

use std::future::Future;

use tracing::debug;

use crate::entry::Entry;
use crate::storage::traits::StoreError;

use super::{StoreMode, StoreState, TierStats, TieredStore};

impl TieredStore {
    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        *self.state_rx.borrow()
    }

    /// A receiver to watch lifecycle state changes.
    #[must_use]
    pub fn state_receiver(&self) -> tokio::sync::watch::Receiver<StoreState> {
        self.state_rx.clone()
    }

    /// Which tiers back this instance.
    #[must_use]
    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Point-in-time operation counters.
    #[must_use]
    pub fn stats(&self) -> TierStats {
        self.stats.snapshot()
    }

    /// Current cache entry count.
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }

    /// Check if a key exists in any configured tier.
    ///
    /// Unlike [`find_one`](Self::find_one) a miss is `false`, not an
    /// error; tier I/O failures still propagate.
    pub async fn contains(&self, key: &str) -> Result<bool, StoreError> {
        match self.find_one(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get an entry, or build and insert it if missing.
    ///
    /// The factory runs only when the key is absent from every configured
    /// tier; its entry is then persisted write-through and returned. This
    /// is how callers register per-key defaults (a fresh guild gets its
    /// default prefix entry on first lookup).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use tier_store::{Entry, TieredStore};
    /// # use serde_json::json;
    /// # async fn example(store: &TieredStore) -> Result<(), tier_store::StoreError> {
    /// let entry = store
    ///     .find_or_insert_with("42", || async {
    ///         Entry::from_value(json!({"prefixes": ["!"]})).unwrap()
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_or_insert_with<F, Fut>(
        &self,
        key: &str,
        factory: F,
    ) -> Result<Entry, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Entry>,
    {
        match self.find_one(key).await {
            Ok(entry) => Ok(entry),
            Err(e) if e.is_not_found() => {
                debug!(key, "Key absent, inserting factory entry");
                let entry = factory().await;
                self.insert_one(key, entry.clone()).await?;
                Ok(entry)
            }
            Err(e) => Err(e),
        }
    }

    /// All keys known to the authoritative tier, sorted.
    ///
    /// `Remote` mode scans the remote collection; `Local` mode reads the
    /// snapshot file. Intended for completeness and testing, not hot
    /// paths.
    pub async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let snapshot = match self.remote {
            Some(ref remote) => remote.find_all().await?,
            None => self.file.load().await?,
        };
        Ok(snapshot.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{local_store, remote_store, test_entry, MemoryRemote};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_contains() {
        let store = local_store("contains").await;
        store
            .insert_one("1", test_entry(json!({"prefixes": ["!"]})))
            .await
            .unwrap();

        assert!(store.contains("1").await.unwrap());
        assert!(!store.contains("2").await.unwrap());
    }

    #[tokio::test]
    async fn test_len_and_is_empty() {
        let store = local_store("len").await;
        assert!(store.is_empty().await);

        store
            .insert_one("1", test_entry(json!({"prefixes": ["!"]})))
            .await
            .unwrap();

        assert!(!store.is_empty().await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_or_insert_with_skips_factory_on_hit() {
        let store = local_store("factory_hit").await;
        let existing = test_entry(json!({"prefixes": ["!"]}));
        store.insert_one("1", existing.clone()).await.unwrap();

        let factory_called = std::sync::atomic::AtomicBool::new(false);
        let found = store
            .find_or_insert_with("1", || {
                factory_called.store(true, Ordering::SeqCst);
                async { test_entry(json!({"prefixes": ["unused"]})) }
            })
            .await
            .unwrap();

        assert!(!factory_called.load(Ordering::SeqCst));
        assert_eq!(found, existing);
    }

    #[tokio::test]
    async fn test_find_or_insert_with_persists_default() {
        let store = local_store("factory_miss").await;

        let created = store
            .find_or_insert_with("42", || async {
                test_entry(json!({"prefixes": ["!"]}))
            })
            .await
            .unwrap();

        assert_eq!(created, test_entry(json!({"prefixes": ["!"]})));
        // Durably registered, not just cached
        assert_eq!(store.list_keys().await.unwrap(), vec!["42".to_string()]);
    }

    #[tokio::test]
    async fn test_list_keys_local() {
        let store = local_store("list_local").await;
        for key in ["3", "1", "2"] {
            store
                .insert_one(key, test_entry(json!({"prefixes": ["!"]})))
                .await
                .unwrap();
        }

        assert_eq!(
            store.list_keys().await.unwrap(),
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
    }

    #[tokio::test]
    async fn test_list_keys_remote_is_authoritative() {
        let remote = MemoryRemote::seeded(&[
            ("10", json!({"prefixes": ["!"]})),
            ("20", json!({"prefixes": ["?"]})),
        ]);
        let store = remote_store("list_remote", remote).await;

        assert_eq!(
            store.list_keys().await.unwrap(),
            vec!["10".to_string(), "20".to_string()]
        );
    }
}
