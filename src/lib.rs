//! # Tier Store
//!
//! A tiered configuration store for small per-key settings: low-latency
//! lookups, eventual durability.
//!
//! ## Architecture
//!
//! Lookups cascade through the tiers in fixed precedence; writes propagate
//! the opposite way (write-through):
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BoundedCache                           │
//! │  • Fixed capacity, LFU eviction                             │
//! │  • Always checked first; backfilled on every deeper hit     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                        (on cache miss)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SnapshotFile                           │
//! │  • Human-readable JSON snapshot on disk                     │
//! │  • Source of truth in Local mode                            │
//! │  • Warm mirror (never consulted on miss) in Remote mode     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                     (Remote mode only)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RemoteCollection                         │
//! │  • Opaque keyed collection (Redis adapter included)         │
//! │  • Authoritative: resyncs cache + mirror at bootstrap       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tier_store::{Entry, StoreConfig, TieredStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tier_store::StoreError> {
//!     let config = StoreConfig {
//!         name: "prefixes".into(),
//!         snapshot_path: "data/prefixes.json".into(),
//!         capacity: 100,
//!         ..Default::default()
//!     };
//!
//!     let store = TieredStore::open(config).await?;
//!     store.bootstrap().await?;
//!
//!     let entry = Entry::from_value(json!({"prefixes": ["!"]})).unwrap();
//!     store.insert_one(155780111197536256u64, entry).await?;
//!
//!     let found = store.find_one("155780111197536256").await?;
//!     println!("prefixes: {:?}", found.get("prefixes"));
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`store`]: The [`TieredStore`] orchestrating the tiers
//! - [`cache`]: Bounded LFU cache
//! - [`storage`]: Snapshot file store and remote collection adapter
//! - [`entry`]: The opaque entry model
//! - [`config`]: Per-store configuration

pub mod cache;
pub mod config;
pub mod entry;
pub mod storage;
pub mod store;

pub use cache::BoundedCache;
pub use config::StoreConfig;
pub use entry::{Entry, Snapshot};
pub use storage::file::SnapshotFile;
pub use storage::redis::RedisCollection;
pub use storage::traits::{RemoteCollection, StoreError};
pub use store::{StoreMode, StoreState, TierStats, TieredStore};
