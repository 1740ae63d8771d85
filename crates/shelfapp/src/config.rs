//! # Configuration
//!
//! Shelf configuration is loaded with [`confique`] from layered sources, in
//! priority order:
//!
//! 1. **Environment variables**: `SHELF_SEARCH_URL`, `SHELF_SELECTION_POLICY`, ...
//! 2. **Data directory config**: `<data_dir>/shelf.toml`
//! 3. **Compiled defaults**: `#[config(default = ...)]`
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `search_url` | unset | Base URL of the search service; unset means local search |
//! | `search_token` | unset | Bearer token sent to the search service |
//! | `search_timeout_secs` | `10` | Request timeout for the search service |
//! | `selection_policy` | `sticky` | `sticky` or `prune`: hidden selected ids on filter change |
//! | `stale_responses` | `discard` | `discard` or `last-wins`: superseded search responses |
//! | `default_layout` | `grid` | `grid` or `list` |
//! | `recent_search_limit` | `5` | Length of the recent-search list |
//! | `outbox_file` | `<data_dir>/outbox.jsonl` | Where dispatched actions are queued |
//! | `export_dir` | `<data_dir>/exports` | Where exports and reports are written |
//!
//! Enumerated values are kept as strings so the same text works in TOML and
//! in environment variables; [`ShelfConfig::validate`] parses them all.

use crate::error::{Result, ShelfError};
use crate::search::StalePolicy;
use crate::view::{Layout, SelectionPolicy};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "shelf.toml";

/// Configuration for shelf, stored in `shelf.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShelfConfig {
    /// Base URL of the search service (e.g. "http://localhost:8000").
    /// When absent, searches run over the local datasets.
    #[config(env = "SHELF_SEARCH_URL")]
    pub search_url: Option<String>,

    /// Bearer token for the search service.
    #[config(env = "SHELF_SEARCH_TOKEN")]
    pub search_token: Option<String>,

    /// Search request timeout in seconds.
    #[config(env = "SHELF_SEARCH_TIMEOUT_SECS", default = 10)]
    pub search_timeout_secs: u64,

    /// "sticky" keeps hidden ids selected after a filter change, "prune" drops them.
    #[config(env = "SHELF_SELECTION_POLICY", default = "sticky")]
    pub selection_policy: String,

    /// "discard" ignores responses to superseded searches, "last-wins" shows them.
    #[config(env = "SHELF_STALE_RESPONSES", default = "discard")]
    pub stale_responses: String,

    /// "grid" or "list".
    #[config(env = "SHELF_LAYOUT", default = "grid")]
    pub default_layout: String,

    /// How many recent searches to remember.
    #[config(env = "SHELF_RECENT_SEARCH_LIMIT", default = 5)]
    pub recent_search_limit: usize,

    /// Outbox file for dispatched actions. Relative paths are resolved
    /// against the data directory.
    #[config(env = "SHELF_OUTBOX_FILE")]
    pub outbox_file: Option<String>,

    /// Directory for exports and reports. Relative paths are resolved
    /// against the data directory.
    #[config(env = "SHELF_EXPORT_DIR")]
    pub export_dir: Option<String>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            search_url: None,
            search_token: None,
            search_timeout_secs: 10,
            selection_policy: "sticky".to_string(),
            stale_responses: "discard".to_string(),
            default_layout: "grid".to_string(),
            recent_search_limit: 5,
            outbox_file: None,
            export_dir: None,
        }
    }
}

impl ShelfConfig {
    /// Load from the environment and `<data_dir>/shelf.toml`.
    ///
    /// A missing file is fine; an unparsable one or an invalid value is not.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config = ShelfConfig::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()?;
        config.validate()?;
        Ok(config)
    }

    /// A commented `shelf.toml` listing every key with its default.
    pub fn template() -> String {
        confique::toml::template::<ShelfConfig>(confique::toml::FormatOptions::default())
    }

    /// Check every enumerated value.
    pub fn validate(&self) -> Result<()> {
        self.selection_policy()?;
        self.stale_policy()?;
        self.layout()?;
        Ok(())
    }

    pub fn selection_policy(&self) -> Result<SelectionPolicy> {
        self.selection_policy.parse().map_err(ShelfError::ConfigValue)
    }

    pub fn stale_policy(&self) -> Result<StalePolicy> {
        self.stale_responses.parse().map_err(ShelfError::ConfigValue)
    }

    pub fn layout(&self) -> Result<Layout> {
        self.default_layout.parse().map_err(ShelfError::ConfigValue)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn outbox_path(&self, data_dir: &Path) -> PathBuf {
        resolve(data_dir, self.outbox_file.as_deref(), "outbox.jsonl")
    }

    pub fn export_path(&self, data_dir: &Path) -> PathBuf {
        resolve(data_dir, self.export_dir.as_deref(), "exports")
    }

    /// All keys with their current values, for display.
    pub fn entries(&self) -> Vec<(String, String)> {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "(unset)".to_string());
        vec![
            ("search_url".into(), show(&self.search_url)),
            (
                "search_token".into(),
                self.search_token
                    .as_ref()
                    .map(|_| "********".to_string())
                    .unwrap_or_else(|| "(unset)".to_string()),
            ),
            ("search_timeout_secs".into(), self.search_timeout_secs.to_string()),
            ("selection_policy".into(), self.selection_policy.clone()),
            ("stale_responses".into(), self.stale_responses.clone()),
            ("default_layout".into(), self.default_layout.clone()),
            ("recent_search_limit".into(), self.recent_search_limit.to_string()),
            ("outbox_file".into(), show(&self.outbox_file)),
            ("export_dir".into(), show(&self.export_dir)),
        ]
    }
}

fn resolve(data_dir: &Path, configured: Option<&str>, default: &str) -> PathBuf {
    match configured {
        Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
        Some(p) => data_dir.join(p),
        None => data_dir.join(default),
    }
}
