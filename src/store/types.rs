//! Public types for the tiered store.

use std::sync::atomic::{AtomicU64, Ordering};

/// Which tiers back a store instance.
///
/// Fixed at construction: `Remote` iff a remote collection handle was
/// supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Cache + snapshot file; the file is the single source of truth.
    Local,
    /// Cache + file mirror + remote collection; remote is authoritative.
    Remote,
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "Local"),
            Self::Remote => write!(f, "Remote"),
        }
    }
}

/// Store lifecycle state.
///
/// Use [`TieredStore::state()`](crate::TieredStore::state) to check the
/// current state or
/// [`TieredStore::state_receiver()`](crate::TieredStore::state_receiver)
/// to watch for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Constructed, tiers not yet synchronized.
    Created,
    /// Bootstrap in progress: priming cache (and mirror) from the
    /// authoritative tier.
    Syncing,
    /// Tiers synchronized; serving lookups and inserts.
    Ready,
}

impl std::fmt::Display for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Syncing => write!(f, "Syncing"),
            Self::Ready => write!(f, "Ready"),
        }
    }
}

/// Point-in-time operation counters for one store instance.
///
/// Returned by [`TieredStore::stats()`](crate::TieredStore::stats). These
/// make tier traffic observable per instance — which lookups were served
/// from the cache, how often the backing tiers were actually consulted —
/// without any process-global registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierStats {
    /// Lookups served straight from the cache (no tier I/O).
    pub cache_hits: u64,
    /// Lookups that consulted the snapshot file.
    pub file_reads: u64,
    /// File consultations that found the key.
    pub file_hits: u64,
    /// Lookups that consulted the remote collection.
    pub remote_reads: u64,
    /// Remote consultations that found the key.
    pub remote_hits: u64,
    /// Lookups that missed every configured tier.
    pub not_found: u64,
    /// Completed write-through inserts.
    pub inserts: u64,
}

/// Interior-mutable counters backing [`TierStats`].
#[derive(Debug, Default)]
pub(super) struct StatCounters {
    pub(super) cache_hits: AtomicU64,
    pub(super) file_reads: AtomicU64,
    pub(super) file_hits: AtomicU64,
    pub(super) remote_reads: AtomicU64,
    pub(super) remote_hits: AtomicU64,
    pub(super) not_found: AtomicU64,
    pub(super) inserts: AtomicU64,
}

impl StatCounters {
    pub(super) fn snapshot(&self) -> TierStats {
        TierStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            file_reads: self.file_reads.load(Ordering::Relaxed),
            file_hits: self.file_hits.load(Ordering::Relaxed),
            remote_reads: self.remote_reads.load(Ordering::Relaxed),
            remote_hits: self.remote_hits.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
        }
    }
}

pub(super) fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}
