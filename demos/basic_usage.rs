// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic tier-store usage walkthrough.
//!
//! Demonstrates:
//! 1. Opening a local-mode store (snapshot file created on first use)
//! 2. Registering a default entry on first lookup
//! 3. Writing and reading entries through the tiers
//! 4. Displaying tier traffic counters
//! 5. Restarting over the same file to show durability
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use serde_json::json;
use tier_store::{Entry, StoreConfig, TieredStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║            tier-store: Basic Usage Walkthrough                ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let snapshot_path = std::env::temp_dir().join("tier_store_demo_prefixes.json");
    let _ = tokio::fs::remove_file(&snapshot_path).await;

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Open a local-mode store and bootstrap it
    // ─────────────────────────────────────────────────────────────────────────
    let config = StoreConfig {
        capacity: 100,
        ..StoreConfig::new("prefixes", &snapshot_path)
    };
    let store = TieredStore::open(config.clone()).await?;
    store.bootstrap().await?;
    println!("1. Store ready ({} mode), snapshot at {}", store.mode(), snapshot_path.display());

    // ─────────────────────────────────────────────────────────────────────────
    // 2. First lookup registers a default entry
    // ─────────────────────────────────────────────────────────────────────────
    let guild = "155780111197536256";
    let defaults = store
        .find_or_insert_with(guild, || async {
            Entry::from_value(json!({"prefixes": ["!"]})).unwrap()
        })
        .await?;
    println!("2. Registered defaults for {guild}: {:?}", defaults.get("prefixes"));

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Overwrite and read back (served from the cache)
    // ─────────────────────────────────────────────────────────────────────────
    let updated = Entry::from_value(json!({"prefixes": ["!", "?"]})).unwrap();
    store.insert_one(guild, updated).await?;

    let found = store.find_one(guild).await?;
    println!("3. Current prefixes: {:?}", found.get("prefixes"));

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Tier traffic so far
    // ─────────────────────────────────────────────────────────────────────────
    let stats = store.stats();
    println!(
        "4. Traffic: {} cache hit(s), {} file read(s), {} insert(s)",
        stats.cache_hits, stats.file_reads, stats.inserts
    );

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Restart over the same snapshot file
    // ─────────────────────────────────────────────────────────────────────────
    drop(store);
    let store = TieredStore::open(config).await?;
    store.bootstrap().await?;

    let found = store.find_one(guild).await?;
    println!(
        "5. After restart, prefixes survived: {:?} ({} key(s) on disk)",
        found.get("prefixes"),
        store.list_keys().await?.len()
    );

    println!("\nDone.");
    Ok(())
}
