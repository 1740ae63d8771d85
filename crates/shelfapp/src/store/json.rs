use super::DatasetProvider;
use crate::error::Result;
use crate::model::{EBook, Fine, Record, RecordKind, Reservation};
use std::fs;
use std::path::{Path, PathBuf};

/// Datasets stored as JSON arrays, one file per record kind.
#[derive(Debug, Clone)]
pub struct JsonDataset {
    root: PathBuf,
}

impl JsonDataset {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the dataset file for a record kind.
    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.dataset_name()))
    }

    fn read<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.path_for(R::KIND);
        if !path.exists() {
            log::debug!("no {} dataset at {}", R::KIND, path.display());
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let records: Vec<R> = serde_json::from_str(&content)?;
        log::debug!("loaded {} from {}", R::KIND.count_label(records.len()), path.display());
        Ok(records)
    }
}

impl DatasetProvider for JsonDataset {
    fn ebooks(&self) -> Result<Vec<EBook>> {
        self.read()
    }

    fn fines(&self) -> Result<Vec<Fine>> {
        self.read()
    }

    fn reservations(&self) -> Result<Vec<Reservation>> {
        self.read()
    }
}
