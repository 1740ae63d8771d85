use clap::{Args, Parser, Subcommand};
use shelfapp::model::{RecordId, RecordKind};
use shelfapp::reports::{ExportFormat, ReportKind};
use shelfapp::search::SearchType;
use shelfapp::view::Layout;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shelf",
    bin_name = "shelf",
    version,
    disable_help_subcommand = true,
    about = "Filter, summarize and act on a library's e-books, fines and reservations",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $SHELF_DATA, then the OS data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true, help_heading = "Options")]
    pub yes: bool,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

/// Free-text and facet filters shared by `list` and `act`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text to look for in the searchable fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Facet filter as FIELD=VALUE (e.g. status=Overdue); repeatable
    #[arg(short, long = "facet", value_name = "FIELD=VALUE", value_parser = parse_facet)]
    pub facets: Vec<(String, String)>,
}

fn parse_facet(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{}'", s)),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List records of one kind
    #[command(alias = "ls", display_order = 1)]
    List {
        /// ebooks, fines or reservations
        kind: RecordKind,

        #[command(flatten)]
        filters: FilterArgs,

        /// Ids to mark as selected (e.g. 1,3)
        #[arg(long, value_delimiter = ',')]
        select: Vec<RecordId>,

        /// grid or list (overrides the configured layout)
        #[arg(short, long)]
        layout: Option<Layout>,
    },

    /// Summary metrics of a whole dataset
    #[command(display_order = 2)]
    Stats {
        /// ebooks, fines or reservations
        kind: RecordKind,
    },

    /// Values offered by the facet filters
    #[command(display_order = 3)]
    Facets {
        /// ebooks, fines or reservations
        kind: RecordKind,

        /// Only this facet (e.g. status)
        field: Option<String>,
    },

    /// Run a row or bulk action
    #[command(display_order = 4)]
    Act {
        /// ebooks, fines or reservations
        kind: RecordKind,

        /// Action name (e.g. waive, reminder, cancel, mark-ready)
        action: String,

        /// Record ids; a single id runs the row action when there is one
        ids: Vec<RecordId>,

        /// Also select every record the filters show
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Record a payment against a fine
    #[command(display_order = 5)]
    Pay {
        /// Fine id
        id: RecordId,

        /// Amount to pay, at most the remaining balance
        amount: f64,
    },

    /// Search across books, members, e-books and reservations
    #[command(display_order = 6)]
    Search {
        /// Search words (joined with spaces)
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,

        /// all, books, members, ebooks or reservations
        #[arg(short = 't', long = "type", default_value = "all")]
        search_type: SearchType,

        /// Search the local datasets even when a search service is configured
        #[arg(long)]
        local: bool,

        /// Show recent searches instead of searching
        #[arg(long, conflicts_with = "query")]
        recent: bool,
    },

    /// Show queued actions
    #[command(display_order = 7)]
    Outbox,

    /// Build and export a report
    #[command(display_order = 8)]
    Report {
        /// overview, financial, inventory or reservations
        #[arg(default_value = "overview")]
        kind: ReportKind,

        /// all, week, month, quarter, year or START..END (YYYY-MM-DD)
        #[arg(short, long, default_value = "all")]
        range: String,

        /// json, csv or print
        #[arg(short, long, default_value = "print")]
        format: ExportFormat,
    },

    /// View and edit library settings
    #[command(display_order = 20)]
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommands>,
    },

    /// Show configuration
    #[command(display_order = 21)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show all settings, or one section
    Show { section: Option<String> },

    /// Show one setting (section.field, e.g. general.loanPeriod)
    Get { key: String },

    /// Change one setting
    Set { key: String, value: String },

    /// Manage membership plans
    Plan {
        #[command(subcommand)]
        action: PlanCommands,
    },

    /// Manage fine reminder days
    Reminder {
        #[command(subcommand)]
        action: ReminderCommands,
    },

    /// Restore the default settings
    Reset,

    /// Write a dated backup file
    Backup {
        /// Directory for the backup (defaults to the data directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Replace the settings with a backup file
    Restore { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Add a plan named "Plan N"
    Add,

    /// Change a plan field (name, maxBooks or price)
    Update {
        position: usize,
        field: String,
        value: String,
    },

    /// Remove a plan
    Remove { position: usize },
}

#[derive(Subcommand, Debug)]
pub enum ReminderCommands {
    /// Add a reminder day (days after the due date)
    Add {
        #[arg(allow_negative_numbers = true)]
        day: i64,
    },

    /// Remove the reminder day at a position
    Remove { position: usize },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print a commented shelf.toml template
    Template,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_parses_filters() {
        let cli = Cli::parse_from([
            "shelf", "list", "fines", "-s", "doe", "-f", "status=Partially Paid", "--select", "1,3",
        ]);
        match cli.command {
            Some(Commands::List {
                kind,
                filters,
                select,
                layout,
            }) => {
                assert_eq!(kind, RecordKind::Fine);
                assert_eq!(filters.search.as_deref(), Some("doe"));
                assert_eq!(
                    filters.facets,
                    vec![("status".to_string(), "Partially Paid".to_string())]
                );
                assert_eq!(select, vec![1, 3]);
                assert!(layout.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn facet_needs_equals_sign() {
        assert!(Cli::try_parse_from(["shelf", "list", "fines", "-f", "status"]).is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["shelf", "stats", "members"]).is_err());
    }

    #[test]
    fn act_collects_ids_and_globals() {
        let cli = Cli::parse_from(["shelf", "act", "fines", "waive", "2", "5", "--yes"]);
        assert!(cli.yes);
        match cli.command {
            Some(Commands::Act { action, ids, all, .. }) => {
                assert_eq!(action, "waive");
                assert_eq!(ids, vec![2, 5]);
                assert!(!all);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn negative_reminder_day_reaches_validation() {
        let cli = Cli::parse_from(["shelf", "settings", "reminder", "add", "-3"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Settings {
                action: Some(SettingsCommands::Reminder {
                    action: ReminderCommands::Add { day: -3 }
                })
            })
        ));
    }
}
