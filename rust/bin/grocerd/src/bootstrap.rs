//! Bootstrap — first-start checks and catalog seeding.
//!
//! When grocerd starts:
//! 1. Verify the config names a data directory.
//! 2. Seed the default categories and units if the catalog is empty.

use shopping::service::ShoppingService;
use tracing::info;

use crate::config::ServerConfig;

/// Default categories seeded on first start, with their icon names.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Produce", "apple"),
    ("Dairy", "milk"),
    ("Bakery", "bread"),
    ("Meat", "drumstick"),
    ("Frozen", "snowflake"),
    ("Beverages", "cup"),
    ("Household", "home"),
    ("Other", "tag"),
];

/// Default units seeded on first start.
const DEFAULT_UNITS: &[&str] = &["piece", "kg", "g", "l", "ml", "pack", "bottle", "can"];

/// Verify server configuration is usable.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Seed the catalog tables if they are empty.
pub fn seed_catalog(service: &ShoppingService) -> anyhow::Result<()> {
    let seeded = service
        .seed_catalog(DEFAULT_CATEGORIES, DEFAULT_UNITS)
        .map_err(|e| anyhow::anyhow!("catalog seeding failed: {}", e))?;

    if seeded {
        info!(
            "Seeded catalog: {} categories, {} units",
            DEFAULT_CATEGORIES.len(),
            DEFAULT_UNITS.len()
        );
    } else {
        info!("Catalog already present, skipping seed");
    }
    Ok(())
}
