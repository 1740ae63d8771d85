//! # Settings Commands
//!
//! Every editing action loads `settings.json`, applies one change and saves
//! the document back. An action that fails leaves the file untouched.
//!
//! Settings are addressed as `section.field` with the camelCase names of the
//! document, e.g. `general.loanPeriod`. Positions of membership plans and
//! reminder days are 1-based, as listed by `show`.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::settings::{restore_from, write_backup, LibrarySettings, PlanField, SettingsStore};
use chrono::NaiveDate;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum SettingsAction {
    Show { section: Option<String> },
    Get { key: String },
    Set { key: String, value: String },
    PlanAdd,
    PlanUpdate {
        position: usize,
        field: PlanField,
        value: String,
    },
    PlanRemove { position: usize },
    ReminderAdd { day: i64 },
    ReminderRemove { position: usize },
    Reset,
    Backup { dir: Option<PathBuf> },
    Restore { file: PathBuf },
}

/// Run a settings action.
///
/// `data_dir` is where backups go when no directory is given. `Reset` and
/// `Restore` replace the whole document without reading the saved one, so
/// they also recover from an unreadable `settings.json`.
pub fn run(
    store: &SettingsStore,
    action: SettingsAction,
    data_dir: &Path,
    today: NaiveDate,
) -> Result<CmdResult> {
    let mut settings = match action {
        SettingsAction::Reset | SettingsAction::Restore { .. } => LibrarySettings::default(),
        _ => store.load()?,
    };
    let mut result = CmdResult::default();

    match action {
        SettingsAction::Show { section } => {
            result.entries = entries(&settings, section.as_deref())?;
        }
        SettingsAction::Get { key } => {
            let (section, field) = split_key(&key)?;
            let value = settings.get_field(section, field)?;
            result.entries = vec![(key.clone(), display_value(&value))];
        }
        SettingsAction::Set { key, value } => {
            let (section, field) = split_key(&key)?;
            let current = settings.get_field(section, field)?;
            settings.set_field(section, field, parse_input(&current, &value))?;
            store.save(&settings)?;
            let shown = display_value(&settings.get_field(section, field)?);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
        }
        SettingsAction::PlanAdd => {
            let name = settings.add_membership_plan().name.clone();
            store.save(&settings)?;
            result.add_message(CmdMessage::success(format!("Added membership plan {}", name)));
        }
        SettingsAction::PlanUpdate {
            position,
            field,
            value,
        } => {
            settings.update_membership_plan(index(position)?, field, &value)?;
            store.save(&settings)?;
            let plan = &settings.membership.membership_plans[position - 1];
            result.add_message(CmdMessage::success(format!(
                "Plan {}: {}, {} books, {}",
                position, plan.name, plan.max_books, plan.price
            )));
        }
        SettingsAction::PlanRemove { position } => {
            let removed = settings.remove_membership_plan(index(position)?)?;
            store.save(&settings)?;
            result.add_message(CmdMessage::success(format!(
                "Removed membership plan {}",
                removed.name
            )));
        }
        SettingsAction::ReminderAdd { day } => {
            settings.add_reminder_day(day)?;
            store.save(&settings)?;
            result.add_message(CmdMessage::success(format!(
                "Fine reminders on days {}",
                join_days(&settings.fines.fine_reminder_days)
            )));
        }
        SettingsAction::ReminderRemove { position } => {
            let day = settings.remove_reminder_day(index(position)?)?;
            store.save(&settings)?;
            result.add_message(CmdMessage::success(format!("Removed reminder on day {}", day)));
        }
        SettingsAction::Reset => {
            settings.reset();
            store.save(&settings)?;
            result.add_message(CmdMessage::success("Settings reset to defaults"));
        }
        SettingsAction::Backup { dir } => {
            let dir = dir.unwrap_or_else(|| data_dir.to_path_buf());
            let path = write_backup(&settings, &dir, today)?;
            result.add_message(CmdMessage::success(format!(
                "Settings backed up to {}",
                path.display()
            )));
            result.paths.push(path);
        }
        SettingsAction::Restore { file } => {
            restore_from(&mut settings, &file)?;
            store.save(&settings)?;
            result.add_message(CmdMessage::success(format!(
                "Settings restored from {}",
                file.display()
            )));
        }
    }
    Ok(result)
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    key.split_once('.')
        .filter(|(s, f)| !s.is_empty() && !f.is_empty())
        .ok_or_else(|| {
            ShelfError::Settings(format!("expected section.field, got '{}'", key))
        })
}

fn index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| ShelfError::Settings("positions start at 1".into()))
}

/// Text fields take the input verbatim; everything else is read as JSON.
fn parse_input(current: &Value, input: &str) -> Value {
    if current.is_string() {
        return Value::String(input.to_string());
    }
    serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_string()))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_days(days: &[u32]) -> String {
    days.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
}

fn entries(settings: &LibrarySettings, only: Option<&str>) -> Result<Vec<(String, String)>> {
    if let Some(section) = only {
        if !LibrarySettings::SECTIONS.contains(&section) {
            return Err(ShelfError::Settings(format!("unknown section '{}'", section)));
        }
    }
    let doc = serde_json::to_value(settings)?;
    let mut out = Vec::new();
    for section in LibrarySettings::SECTIONS {
        if only.is_some_and(|s| s != section) {
            continue;
        }
        if let Some(Value::Object(fields)) = doc.get(section) {
            for (field, value) in fields {
                out.push((format!("{}.{}", section, field), display_value(value)));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn exec(dir: &Path, action: SettingsAction) -> Result<CmdResult> {
        run(&SettingsStore::new(dir), action, dir, today())
    }

    fn value(dir: &Path, key: &str) -> String {
        let result = exec(dir, SettingsAction::Get { key: key.into() }).unwrap();
        result.entries[0].1.clone()
    }

    #[test]
    fn show_lists_one_section() {
        let dir = tempdir().unwrap();
        let result = exec(dir.path(), SettingsAction::Show { section: Some("fines".into()) }).unwrap();
        assert!(result.entries.iter().all(|(k, _)| k.starts_with("fines.")));
        assert!(result
            .entries
            .contains(&("fines.fineReminderDays".to_string(), "[3,7,14]".to_string())));
    }

    #[test]
    fn show_rejects_unknown_section() {
        let dir = tempdir().unwrap();
        assert!(exec(dir.path(), SettingsAction::Show { section: Some("colours".into()) }).is_err());
    }

    #[test]
    fn set_persists_typed_values() {
        let dir = tempdir().unwrap();
        exec(
            dir.path(),
            SettingsAction::Set {
                key: "general.loanPeriod".into(),
                value: "21".into(),
            },
        )
        .unwrap();
        assert_eq!(value(dir.path(), "general.loanPeriod"), "21");
        assert!(dir.path().join(SettingsStore::FILE_NAME).exists());
    }

    #[test]
    fn numeric_text_stays_text() {
        let dir = tempdir().unwrap();
        exec(
            dir.path(),
            SettingsAction::Set {
                key: "general.libraryName".into(),
                value: "1984".into(),
            },
        )
        .unwrap();
        assert_eq!(value(dir.path(), "general.libraryName"), "1984");
    }

    #[test]
    fn wrong_type_is_rejected_and_nothing_saved() {
        let dir = tempdir().unwrap();
        let err = exec(
            dir.path(),
            SettingsAction::Set {
                key: "general.loanPeriod".into(),
                value: "two weeks".into(),
            },
        );
        assert!(err.is_err());
        assert!(!dir.path().join(SettingsStore::FILE_NAME).exists());
    }

    #[test]
    fn malformed_key() {
        let dir = tempdir().unwrap();
        assert!(exec(dir.path(), SettingsAction::Get { key: "loanPeriod".into() }).is_err());
    }

    #[test]
    fn plans_are_edited_by_position() {
        let dir = tempdir().unwrap();
        let added = exec(dir.path(), SettingsAction::PlanAdd).unwrap();
        assert_eq!(added.messages[0].content, "Added membership plan Plan 4");

        exec(
            dir.path(),
            SettingsAction::PlanUpdate {
                position: 4,
                field: PlanField::Price,
                value: "abc".into(),
            },
        )
        .unwrap();
        let plans = SettingsStore::new(dir.path()).load().unwrap().membership.membership_plans;
        assert_eq!(plans[3].price, 0.0);

        let removed = exec(dir.path(), SettingsAction::PlanRemove { position: 1 }).unwrap();
        assert_eq!(removed.messages[0].content, "Removed membership plan Basic");
        assert!(exec(dir.path(), SettingsAction::PlanRemove { position: 0 }).is_err());
    }

    #[test]
    fn reminder_days_stay_sorted() {
        let dir = tempdir().unwrap();
        let result = exec(dir.path(), SettingsAction::ReminderAdd { day: 5 }).unwrap();
        assert_eq!(result.messages[0].content, "Fine reminders on days 3, 5, 7, 14");
        assert!(exec(dir.path(), SettingsAction::ReminderAdd { day: 0 }).is_err());

        let removed = exec(dir.path(), SettingsAction::ReminderRemove { position: 1 }).unwrap();
        assert_eq!(removed.messages[0].content, "Removed reminder on day 3");
    }

    #[test]
    fn backup_then_restore_round_trips() {
        let dir = tempdir().unwrap();
        let backups = dir.path().join("backups");
        let backup = exec(dir.path(), SettingsAction::Backup { dir: Some(backups.clone()) }).unwrap();
        assert_eq!(backup.paths[0], backups.join("library-settings-2024-03-01.json"));

        exec(
            dir.path(),
            SettingsAction::Set {
                key: "security.twoFactorAuth".into(),
                value: "true".into(),
            },
        )
        .unwrap();
        assert_eq!(value(dir.path(), "security.twoFactorAuth"), "true");

        exec(dir.path(), SettingsAction::Restore { file: backup.paths[0].clone() }).unwrap();
        assert_eq!(value(dir.path(), "security.twoFactorAuth"), "false");
    }

    #[test]
    fn bad_restore_changes_nothing() {
        let dir = tempdir().unwrap();
        exec(
            dir.path(),
            SettingsAction::Set {
                key: "general.loanPeriod".into(),
                value: "30".into(),
            },
        )
        .unwrap();

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"general": {"libraryName": "X"}}"#).unwrap();
        let err = exec(dir.path(), SettingsAction::Restore { file: bad }).unwrap_err();
        assert!(err.to_string().contains("invalid settings file format"));
        assert_eq!(value(dir.path(), "general.loanPeriod"), "30");
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempdir().unwrap();
        exec(dir.path(), SettingsAction::PlanAdd).unwrap();
        exec(dir.path(), SettingsAction::Reset).unwrap();
        let settings = SettingsStore::new(dir.path()).load().unwrap();
        assert_eq!(settings, LibrarySettings::default());
    }

    #[test]
    fn corrupt_settings_file_can_be_reset_or_restored() {
        let dir = tempdir().unwrap();
        let live = dir.path().join(SettingsStore::FILE_NAME);
        fs::write(&live, "{ broken").unwrap();
        assert!(exec(dir.path(), SettingsAction::Show { section: None }).is_err());

        exec(dir.path(), SettingsAction::Reset).unwrap();
        assert_eq!(value(dir.path(), "general.loanPeriod"), "14");

        let backups = tempdir().unwrap();
        let mut saved = LibrarySettings::default();
        saved.general.loan_period = 28;
        let backup = crate::settings::write_backup(&saved, backups.path(), today()).unwrap();

        fs::write(&live, "{ broken").unwrap();
        exec(dir.path(), SettingsAction::Restore { file: backup }).unwrap();
        assert_eq!(value(dir.path(), "general.loanPeriod"), "28");
    }
}
