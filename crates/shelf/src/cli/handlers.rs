//! Command handlers for the shelf CLI.
//!
//! Each handler turns parsed arguments into one [`ShelfApi`] call and hands
//! back the [`CmdResult`]. Handlers never print; `commands.rs` renders.
//!
//! Handlers are generic over the dataset provider so tests can drive them
//! with in-memory fixtures.

use super::setup::{
    Commands, ConfigCommands, FilterArgs, PlanCommands, ReminderCommands, SettingsCommands,
};
use anyhow::Result;
use shelfapp::actions::{format_amount, Confirm, OutboxEntry};
use shelfapp::api::ShelfApi;
use shelfapp::commands::act::ActRequest;
use shelfapp::commands::config::ConfigAction;
use shelfapp::commands::report::ReportRequest;
use shelfapp::commands::settings::SettingsAction;
use shelfapp::commands::{CmdMessage, CmdResult, ViewQuery};
use shelfapp::model::RecordKind;
use shelfapp::reports::DateRange;
use shelfapp::settings::PlanField;
use shelfapp::store::DatasetProvider;

/// Route a command to its handler. `None` is the naked invocation.
pub fn dispatch<D: DatasetProvider>(
    api: &ShelfApi<D>,
    command: Option<Commands>,
    confirm: &mut dyn Confirm,
) -> Result<CmdResult> {
    let Some(command) = command else {
        return Ok(api.list(RecordKind::Fine, &ViewQuery::new(), &[])?);
    };

    let result = match command {
        Commands::List {
            kind,
            filters,
            select,
            layout,
        } => {
            let mut query = view_query(filters);
            if let Some(layout) = layout {
                query = query.layout(layout);
            }
            api.list(kind, &query, &select)?
        }
        Commands::Stats { kind } => api.stats(kind)?,
        Commands::Facets { kind, field } => api.facets(kind, field.as_deref())?,
        Commands::Act {
            kind,
            action,
            ids,
            all,
            filters,
        } => {
            let request = ActRequest {
                action,
                ids,
                all,
                query: view_query(filters),
                amount: None,
            };
            api.act(kind, &request, confirm)?
        }
        Commands::Pay { id, amount } => api.pay(id, amount, confirm)?,
        Commands::Search {
            query,
            search_type,
            local,
            recent,
        } => {
            if recent {
                api.recent_searches()?
            } else {
                api.search(&query.join(" "), search_type, local)?
            }
        }
        Commands::Outbox => outbox_result(api.outbox()?),
        Commands::Report {
            kind,
            range,
            format,
        } => {
            let request = ReportRequest {
                kind,
                range: DateRange::parse(&range)?,
                format,
            };
            api.report(&request)?
        }
        Commands::Settings { action } => api.settings(settings_action(action)?)?,
        Commands::Config { action } => {
            let action = match action.unwrap_or(ConfigCommands::Show) {
                ConfigCommands::Show => ConfigAction::Show,
                ConfigCommands::Template => ConfigAction::Template,
            };
            api.show_config(action)?
        }
    };
    Ok(result)
}

fn view_query(filters: FilterArgs) -> ViewQuery {
    let mut query = ViewQuery::new();
    if let Some(text) = filters.search {
        query = query.search(text);
    }
    for (field, value) in filters.facets {
        query = query.facet(field, value);
    }
    query
}

fn settings_action(command: Option<SettingsCommands>) -> Result<SettingsAction> {
    let action = match command.unwrap_or(SettingsCommands::Show { section: None }) {
        SettingsCommands::Show { section } => SettingsAction::Show { section },
        SettingsCommands::Get { key } => SettingsAction::Get { key },
        SettingsCommands::Set { key, value } => SettingsAction::Set { key, value },
        SettingsCommands::Plan { action } => match action {
            PlanCommands::Add => SettingsAction::PlanAdd,
            PlanCommands::Update {
                position,
                field,
                value,
            } => SettingsAction::PlanUpdate {
                position,
                field: field.parse::<PlanField>()?,
                value,
            },
            PlanCommands::Remove { position } => SettingsAction::PlanRemove { position },
        },
        SettingsCommands::Reminder { action } => match action {
            ReminderCommands::Add { day } => SettingsAction::ReminderAdd { day },
            ReminderCommands::Remove { position } => SettingsAction::ReminderRemove { position },
        },
        SettingsCommands::Reset => SettingsAction::Reset,
        SettingsCommands::Backup { dir } => SettingsAction::Backup { dir },
        SettingsCommands::Restore { file } => SettingsAction::Restore { file },
    };
    Ok(action)
}

fn outbox_result(entries: Vec<OutboxEntry>) -> CmdResult {
    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("Outbox is empty"));
        return result;
    }
    let count = entries.len();
    let rows = entries
        .into_iter()
        .map(|entry| {
            let ids: Vec<String> = entry.ids.iter().map(|id| format!("#{}", id)).collect();
            let mut what = format!("{} {} {}", entry.action, entry.kind, ids.join(", "));
            if let Some(amount) = entry.amount {
                what.push_str(&format!(" ({})", format_amount(amount)));
            }
            let when = entry
                .at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();
            (when, what)
        })
        .collect();
    result = result.with_entries(rows);
    result.add_message(CmdMessage::info(format!(
        "{} queued action{}",
        count,
        if count == 1 { "" } else { "s" }
    )));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::setup::Cli;
    use clap::Parser;
    use shelfapp::actions::AlwaysConfirm;
    use shelfapp::config::ShelfConfig;
    use shelfapp::store::fixtures::sample_dataset;
    use shelfapp::store::memory::InMemoryDataset;
    use tempfile::tempdir;

    fn run(api: &ShelfApi<InMemoryDataset>, args: &[&str]) -> Result<CmdResult> {
        let mut argv = vec!["shelf"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        dispatch(api, cli.command, &mut AlwaysConfirm)
    }

    #[test]
    fn naked_invocation_lists_fines() {
        let dir = tempdir().unwrap();
        let api = ShelfApi::new(sample_dataset(), dir.path(), ShelfConfig::default());
        let result = run(&api, &[]).unwrap();
        let listing = result.listing.unwrap();
        assert_eq!(listing.kind, RecordKind::Fine);
        assert_eq!(listing.rows.len(), 8);
    }

    #[test]
    fn list_applies_filters_and_layout() {
        let dir = tempdir().unwrap();
        let api = ShelfApi::new(sample_dataset(), dir.path(), ShelfConfig::default());
        let result = run(&api, &["list", "fines", "-f", "status=Pending", "-l", "list"]).unwrap();
        let listing = result.listing.unwrap();
        assert_eq!(listing.rows.len(), 2);
        assert_eq!(listing.layout, shelfapp::view::Layout::List);
    }

    #[test]
    fn bad_range_is_an_error() {
        let dir = tempdir().unwrap();
        let api = ShelfApi::new(sample_dataset(), dir.path(), ShelfConfig::default());
        assert!(run(&api, &["report", "financial", "-r", "2024-05-01..2024-01-01"]).is_err());
    }

    #[test]
    fn unknown_plan_field_is_an_error() {
        let dir = tempdir().unwrap();
        let api = ShelfApi::new(sample_dataset(), dir.path(), ShelfConfig::default());
        assert!(run(&api, &["settings", "plan", "update", "1", "colour", "red"]).is_err());
    }

    #[test]
    fn act_then_outbox_lists_the_entry() {
        let dir = tempdir().unwrap();
        let api = ShelfApi::new(sample_dataset(), dir.path(), ShelfConfig::default());
        let empty = run(&api, &["outbox"]).unwrap();
        assert_eq!(empty.messages[0].content, "Outbox is empty");

        run(&api, &["act", "fines", "waive", "2", "5"]).unwrap();
        let result = run(&api, &["outbox"]).unwrap();
        assert_eq!(result.entries.len(), 1);
        assert!(result.entries[0].1.starts_with("waive fines #2, #5"));
        assert_eq!(result.messages[0].content, "1 queued action");
    }

    #[test]
    fn settings_defaults_to_show() {
        let dir = tempdir().unwrap();
        let api = ShelfApi::new(sample_dataset(), dir.path(), ShelfConfig::default());
        let result = run(&api, &["settings"]).unwrap();
        assert!(!result.entries.is_empty());
    }
}
