//! Configuration for a tiered store instance.
//!
//! # Example
//!
//! ```
//! use tier_store::StoreConfig;
//!
//! // Minimal config (uses defaults)
//! let config = StoreConfig::default();
//! assert_eq!(config.capacity, 100);
//!
//! // Full config
//! let config = StoreConfig {
//!     name: "prefixes".into(),
//!     snapshot_path: "data/prefixes.json".into(),
//!     capacity: 500,
//!     remote_url: Some("redis://localhost:6379".into()),
//!     ..Default::default()
//! };
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::storage::traits::StoreError;

/// Configuration for one [`TieredStore`](crate::TieredStore) instance.
///
/// Each logical store (one per settings kind) gets its own config: its own
/// snapshot file and, in remote deployments, its own key namespace.
/// Unknown fields are rejected at deserialization time rather than silently
/// ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Logical store name; feeds log fields and the default remote prefix.
    #[serde(default = "default_name")]
    pub name: String,

    /// Path of the durable snapshot file (created on first use).
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Maximum number of entries held in the in-memory cache.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Remote collection connection string (e.g. "redis://localhost:6379").
    /// When absent the snapshot file is the single source of truth.
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Key prefix used in the remote collection. Defaults to `"<name>:"`.
    #[serde(default)]
    pub remote_prefix: Option<String>,
}

fn default_name() -> String {
    "settings".to_string()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/settings.json")
}

fn default_capacity() -> usize {
    100
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            snapshot_path: default_snapshot_path(),
            capacity: default_capacity(),
            remote_url: None,
            remote_prefix: None,
        }
    }
}

impl StoreConfig {
    /// Config for a named store over the given snapshot path.
    pub fn new(name: impl Into<String>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            snapshot_path: snapshot_path.into(),
            ..Self::default()
        }
    }

    /// The key prefix to use in the remote collection.
    #[must_use]
    pub fn remote_prefix(&self) -> String {
        self.remote_prefix
            .clone()
            .unwrap_or_else(|| format!("{}:", self.name))
    }

    /// Validate startup constraints. A non-positive cache capacity is fatal
    /// here, not at call time.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.capacity == 0 {
            return Err(StoreError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.name, "settings");
        assert_eq!(config.capacity, 100);
        assert!(config.remote_url.is_none());
        assert_eq!(config.remote_prefix(), "settings:");
    }

    #[test]
    fn test_explicit_prefix_wins() {
        let config = StoreConfig {
            remote_prefix: Some("custom:".into()),
            ..StoreConfig::new("prefixes", "data/prefixes.json")
        };
        assert_eq!(config.remote_prefix(), "custom:");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: StoreConfig =
            serde_json::from_value(json!({"name": "blacklist"})).unwrap();
        assert_eq!(config.name, "blacklist");
        assert_eq!(config.capacity, 100);
        assert_eq!(config.remote_prefix(), "blacklist:");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<StoreConfig, _> =
            serde_json::from_value(json!({"name": "prefixes", "cache_sizes": 5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_capacity_rejected_at_validation() {
        let config = StoreConfig {
            capacity: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StoreError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_positive_capacity_validates() {
        assert!(StoreConfig::default().validate().is_ok());
    }
}
