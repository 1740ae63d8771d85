//! # Context Setup
//!
//! Everything shelf reads or writes lives in one **data directory**:
//! datasets, `settings.json`, `shelf.toml`, the outbox, exports and the
//! recent-search list.
//!
//! ## Data Directory Resolution
//!
//! [`initialize`] picks the directory in this order:
//! 1. An explicit override (the CLI's `--data-dir`)
//! 2. The `SHELF_DATA` environment variable (primarily for testing)
//! 3. The OS data directory for shelf, via the `directories` crate
//!
//! The directory does not have to exist yet: reads of missing files fall
//! back to empty datasets and default settings, and writes create it.

use crate::api::ShelfApi;
use crate::config::ShelfConfig;
use crate::error::{Result, ShelfError};
use crate::store::json::JsonDataset;
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DATA_ENV: &str = "SHELF_DATA";

pub struct ShelfContext {
    pub api: ShelfApi<JsonDataset>,
    pub config: ShelfConfig,
    pub data_dir: PathBuf,
}

/// Resolve the data directory without touching the filesystem.
pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("org", "shelf", "shelf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ShelfError::ConfigValue(format!(
                "could not determine a data directory; pass --data-dir or set {}",
                DATA_ENV
            ))
        })
}

/// Resolve the data directory, load configuration and build the API.
pub fn initialize(data_override: Option<PathBuf>) -> Result<ShelfContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = ShelfConfig::load(&data_dir)?;
    log::debug!("data directory: {}", data_dir.display());

    let api = ShelfApi::new(JsonDataset::new(&data_dir), &data_dir, config.clone());
    Ok(ShelfContext {
        api,
        config,
        data_dir,
    })
}
