//! Backup, restore and persistence of the settings document.

use super::LibrarySettings;
use crate::error::{Result, ShelfError};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// `library-settings-YYYY-MM-DD.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("library-settings-{}.json", date.format("%Y-%m-%d"))
}

/// Write a pretty-printed backup into `dir`. An existing backup of the same
/// day is overwritten.
pub fn write_backup(settings: &LibrarySettings, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(date));
    fs::write(&path, serde_json::to_string_pretty(settings)?)?;
    log::info!("settings backed up to {}", path.display());
    Ok(path)
}

/// Parse a settings document. Invalid JSON, JSON of the wrong shape and a
/// document breaking the plan or reminder rules are all settings errors.
pub fn parse_settings(text: &str) -> Result<LibrarySettings> {
    serde_json::from_str::<LibrarySettings>(text)
        .map_err(|e| ShelfError::Settings(format!("invalid settings file format: {}", e)))?
        .validated()
}

/// Replace `current` with the backup at `path`.
///
/// Fails closed: on any read or parse error `current` is not touched.
pub fn restore_from(current: &mut LibrarySettings, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)?;
    let restored = parse_settings(&text)?;
    *current = restored;
    log::info!("settings restored from {}", path.display());
    Ok(())
}

/// The live `settings.json` of a data directory.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings, or the defaults if none were saved yet.
    pub fn load(&self) -> Result<LibrarySettings> {
        if !self.path.exists() {
            return Ok(LibrarySettings::default());
        }
        parse_settings(&fs::read_to_string(&self.path)?)
    }

    pub fn save(&self, settings: &LibrarySettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}
