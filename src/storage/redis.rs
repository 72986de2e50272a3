// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Redis-backed remote collection adapter.
//!
//! Entries are stored as JSON documents under prefixed string keys:
//!
//! ```json
//! {
//!   "_id": "155780111197536256",
//!   "prefixes": ["!", "?"]
//! }
//! ```
//!
//! The `_id` field carries the key on the wire and is folded out of the
//! entry on the way back (see [`Entry::from_document`]). The prefix
//! namespaces one logical store's keys when several stores (or other
//! applications) share a Redis instance.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{cmd, AsyncCommands, Client};
use tracing::debug;

use crate::entry::{Entry, Snapshot};
use crate::storage::traits::{RemoteCollection, StoreError};

/// A [`RemoteCollection`] over a Redis keyspace.
pub struct RedisCollection {
    connection: ConnectionManager,
    /// Key prefix for namespacing (e.g. "prefixes:" → "prefixes:42").
    prefix: String,
}

impl RedisCollection {
    /// Connect without a key prefix.
    pub async fn connect(connection_string: &str) -> Result<Self, StoreError> {
        Self::with_prefix(connection_string, None).await
    }

    /// Connect with an optional key prefix.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use tier_store::RedisCollection;
    /// # async fn example() -> Result<(), tier_store::StoreError> {
    /// // Keys will be stored as "prefixes:42", "prefixes:43", ...
    /// let remote = RedisCollection::with_prefix("redis://localhost", Some("prefixes:")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_prefix(
        connection_string: &str,
        prefix: Option<&str>,
    ) -> Result<Self, StoreError> {
        let client = Client::open(connection_string)
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;

        Ok(Self {
            connection,
            prefix: prefix.unwrap_or("").to_string(),
        })
    }

    /// Apply the prefix to a key.
    #[inline]
    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Strip the prefix from a scanned key (for returning clean ids).
    #[inline]
    fn strip_prefix<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(&self.prefix).unwrap_or(key)
    }

    fn parse_document(key: &str, text: &str) -> Result<Entry, StoreError> {
        let document: serde_json::Value = serde_json::from_str(text).map_err(|e| {
            StoreError::RemoteUnavailable(format!("invalid document for '{key}': {e}"))
        })?;
        Entry::from_document(document)
            .map(|(_, entry)| entry)
            .ok_or_else(|| {
                StoreError::RemoteUnavailable(format!("document for '{key}' has no '_id' field"))
            })
    }
}

#[async_trait]
impl RemoteCollection for RedisCollection {
    async fn find_one(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        let mut conn = self.connection.clone();

        let text: Option<String> = conn
            .get(self.prefixed_key(key))
            .await
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;

        match text {
            Some(text) => Ok(Some(Self::parse_document(key, &text)?)),
            None => Ok(None),
        }
    }

    async fn insert_one(&self, key: &str, entry: &Entry) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();

        let document = entry.to_document(key);
        let text = serde_json::to_string(&document)
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;

        conn.set::<_, _, ()>(self.prefixed_key(key), text)
            .await
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;

        debug!(key, "Entry written to remote collection");
        Ok(())
    }

    async fn find_all(&self) -> Result<Snapshot, StoreError> {
        let mut conn = self.connection.clone();
        let mut snapshot = Snapshot::new();
        let pattern = format!("{}*", self.prefix);
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;

            for stored_key in keys {
                let key = self.strip_prefix(&stored_key).to_string();
                let text: Option<String> = conn
                    .get(&stored_key)
                    .await
                    .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;
                if let Some(text) = text {
                    snapshot.insert(key.clone(), Self::parse_document(&key, &text)?);
                }
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        debug!(entries = snapshot.len(), "Remote collection scanned");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document_strips_id() {
        let entry =
            RedisCollection::parse_document("42", r#"{"_id": "42", "prefixes": ["!"]}"#).unwrap();
        assert_eq!(entry.get("prefixes"), Some(&json!(["!"])));
        assert!(entry.get("_id").is_none());
    }

    #[test]
    fn test_parse_document_rejects_missing_id() {
        let result = RedisCollection::parse_document("42", r#"{"prefixes": ["!"]}"#);
        assert!(matches!(result, Err(StoreError::RemoteUnavailable(_))));
    }

    #[test]
    fn test_parse_document_rejects_malformed_json() {
        let result = RedisCollection::parse_document("42", "{ not json");
        assert!(matches!(result, Err(StoreError::RemoteUnavailable(_))));
    }
}
