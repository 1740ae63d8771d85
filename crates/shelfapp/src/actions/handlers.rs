//! Built-in action handlers.
//!
//! - [`ExportHandler`]: writes the targeted records to a new timestamped
//!   JSON file. Every dispatch creates a new file.
//! - [`OutboxHandler`]: appends one JSON line per dispatch to an outbox
//!   file. Notification, payment and status-change services read it; this
//!   crate never does.

use super::{ActionHandler, ActionRequest};
use crate::error::Result;
use crate::model::{Record, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes records to `<dir>/<kind>-export-<timestamp>.json`.
#[derive(Debug, Clone)]
pub struct ExportHandler {
    dir: PathBuf,
}

impl ExportHandler {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl<R: Record> ActionHandler<R> for ExportHandler {
    fn handle(&self, request: &ActionRequest<'_, R>) -> Result<Option<PathBuf>> {
        fs::create_dir_all(&self.dir)?;
        let stem = format!(
            "{}-export-{}",
            R::KIND.dataset_name(),
            Utc::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let path = unique_path(&self.dir, &stem, "json");
        let content = serde_json::to_string_pretty(&request.records)?;
        fs::write(&path, content)?;
        log::info!("exported {} to {}", R::KIND.count_label(request.records.len()), path.display());
        Ok(Some(path))
    }
}

/// `<dir>/<stem>.<ext>`, or `<stem>-2.<ext>`, `<stem>-3.<ext>`... if taken.
pub(crate) fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{}.{}", stem, ext));
    if !first.exists() {
        return first;
    }
    (2..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// One line of the outbox file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub at: DateTime<Utc>,
    pub kind: String,
    pub action: String,
    pub ids: Vec<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Appends dispatched actions to a JSON-lines file.
#[derive(Debug, Clone)]
pub struct OutboxHandler {
    path: PathBuf,
}

impl OutboxHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every entry written so far.
    pub fn entries(&self) -> Result<Vec<OutboxEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| Ok(serde_json::from_str::<OutboxEntry>(l)?))
            .collect()
    }
}

impl<R: Record> ActionHandler<R> for OutboxHandler {
    fn handle(&self, request: &ActionRequest<'_, R>) -> Result<Option<PathBuf>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entry = OutboxEntry {
            at: Utc::now(),
            kind: R::KIND.dataset_name().to_string(),
            action: request.action.name.to_string(),
            ids: request.ids(),
            amount: request.amount,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(&entry)?)?;
        log::debug!("queued {} for {:?}", entry.action, entry.ids);
        Ok(Some(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{builtin_actions, find_action, ActionScope};
    use crate::model::{Fine, RecordKind};
    use crate::store::fixtures::sample_fines;

    fn request<'a>(name: &str, scope: ActionScope, records: Vec<&'a Fine>) -> ActionRequest<'a, Fine> {
        let action = find_action(builtin_actions(RecordKind::Fine), name, scope).unwrap();
        ActionRequest {
            action,
            records,
            amount: None,
        }
    }

    #[test]
    fn export_twice_writes_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let fines = sample_fines();
        let handler = ExportHandler::new(dir.path());
        let req = request("export", ActionScope::Bulk, vec![&fines[0], &fines[2]]);

        let first = ActionHandler::<Fine>::handle(&handler, &req).unwrap().unwrap();
        let second = ActionHandler::<Fine>::handle(&handler, &req).unwrap().unwrap();
        assert_ne!(first, second);

        let written: Vec<Fine> =
            serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[1].id, 3);
    }

    #[test]
    fn unique_path_adds_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "").unwrap();
        fs::write(dir.path().join("a-2.json"), "").unwrap();
        assert_eq!(unique_path(dir.path(), "a", "json"), dir.path().join("a-3.json"));
        assert_eq!(unique_path(dir.path(), "b", "json"), dir.path().join("b.json"));
    }

    #[test]
    fn outbox_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let fines = sample_fines();
        let outbox = OutboxHandler::new(dir.path().join("out/outbox.jsonl"));

        let req = request("reminder", ActionScope::Bulk, vec![&fines[2], &fines[4]]);
        ActionHandler::<Fine>::handle(&outbox, &req).unwrap();
        let mut pay = request("pay", ActionScope::Row, vec![&fines[0]]);
        pay.amount = Some(25.0);
        ActionHandler::<Fine>::handle(&outbox, &pay).unwrap();

        let entries = outbox.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "reminder");
        assert_eq!(entries[0].ids, vec![3, 5]);
        assert_eq!(entries[0].kind, "fines");
        assert_eq!(entries[1].amount, Some(25.0));
    }

    #[test]
    fn missing_outbox_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = OutboxHandler::new(dir.path().join("none.jsonl"));
        assert!(outbox.entries().unwrap().is_empty());
    }
}
