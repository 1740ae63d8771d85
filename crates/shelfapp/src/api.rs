//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every shelf operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Loads** the dataset a command needs from the [`DatasetProvider`]
//! - **Dispatches** on [`RecordKind`] to the generic command function
//! - **Applies configuration**: selection policy, layout, stale-response
//!   policy, outbox and export locations
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Terminal I/O**: no stdout, stderr or prompts; confirmation is a
//!   [`Confirm`] passed in by the caller
//!
//! ## Generic Over DatasetProvider
//!
//! `ShelfApi<D: DatasetProvider>` is generic over where records come from:
//! - Production: `ShelfApi<JsonDataset>`
//! - Testing: `ShelfApi<InMemoryDataset>`
//!
//! Everything else the API touches (settings, outbox, exports, recent
//! searches) lives under the data directory.

use crate::actions::{ActionDispatcher, Confirm, ExportHandler, OutboxEntry, OutboxHandler};
use crate::aggregate::Summarize;
use crate::commands::{self, CmdResult, ViewQuery};
use crate::config::ShelfConfig;
use crate::error::Result;
use crate::model::{EBook, Fine, Record, RecordId, RecordKind, Reservation};
use crate::search::{HttpSearchBackend, LocalSearchBackend, SearchType};
use crate::settings::SettingsStore;
use crate::store::{load, Dataset, DatasetProvider};
use crate::view::Tabulate;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// The main API facade for shelf operations.
pub struct ShelfApi<D: DatasetProvider> {
    data: D,
    data_dir: PathBuf,
    config: ShelfConfig,
}

impl<D: DatasetProvider> ShelfApi<D> {
    pub fn new(data: D, data_dir: impl Into<PathBuf>, config: ShelfConfig) -> Self {
        Self {
            data,
            data_dir: data_dir.into(),
            config,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    pub fn list(
        &self,
        kind: RecordKind,
        query: &ViewQuery,
        selected: &[RecordId],
    ) -> Result<CmdResult> {
        match kind {
            RecordKind::Ebook => self.list_of::<EBook>(query, selected),
            RecordKind::Fine => self.list_of::<Fine>(query, selected),
            RecordKind::Reservation => self.list_of::<Reservation>(query, selected),
        }
    }

    pub fn stats(&self, kind: RecordKind) -> Result<CmdResult> {
        match kind {
            RecordKind::Ebook => commands::stats::run(&load::<EBook, _>(&self.data)?),
            RecordKind::Fine => commands::stats::run(&load::<Fine, _>(&self.data)?),
            RecordKind::Reservation => commands::stats::run(&load::<Reservation, _>(&self.data)?),
        }
    }

    pub fn facets(&self, kind: RecordKind, field: Option<&str>) -> Result<CmdResult> {
        match kind {
            RecordKind::Ebook => commands::facets::run(&load::<EBook, _>(&self.data)?, field),
            RecordKind::Fine => commands::facets::run(&load::<Fine, _>(&self.data)?, field),
            RecordKind::Reservation => {
                commands::facets::run(&load::<Reservation, _>(&self.data)?, field)
            }
        }
    }

    pub fn act(
        &self,
        kind: RecordKind,
        request: &commands::act::ActRequest,
        confirm: &mut dyn Confirm,
    ) -> Result<CmdResult> {
        match kind {
            RecordKind::Ebook => self.act_on::<EBook>(request, confirm),
            RecordKind::Fine => self.act_on::<Fine>(request, confirm),
            RecordKind::Reservation => self.act_on::<Reservation>(request, confirm),
        }
    }

    pub fn pay(&self, id: RecordId, amount: f64, confirm: &mut dyn Confirm) -> Result<CmdResult> {
        commands::pay::run(&self.data.fines()?, id, amount, &self.dispatcher(), confirm)
    }

    /// Actions queued so far, oldest first.
    pub fn outbox(&self) -> Result<Vec<OutboxEntry>> {
        self.outbox_handler().entries()
    }

    /// Run a global search.
    ///
    /// The configured search service is used unless `local` is set or no
    /// `search_url` is configured.
    pub fn search(&self, query: &str, search_type: SearchType, local: bool) -> Result<CmdResult> {
        let request = commands::search::SearchRequest {
            query: query.to_string(),
            search_type,
            policy: self.config.stale_policy()?,
            recent_limit: self.config.recent_search_limit,
        };
        let store = commands::search::RecentStore::new(&self.data_dir);
        match self.config.search_url.as_deref() {
            Some(url) if !local => {
                let backend = HttpSearchBackend::new(url)
                    .with_token(self.config.search_token.clone())
                    .with_timeout(self.config.search_timeout());
                commands::search::run(backend, &request, &store)
            }
            _ => {
                let backend = LocalSearchBackend::load(&self.data)?;
                commands::search::run(backend, &request, &store)
            }
        }
    }

    pub fn recent_searches(&self) -> Result<CmdResult> {
        commands::search::recent(&commands::search::RecentStore::new(&self.data_dir))
    }

    pub fn settings(&self, action: commands::settings::SettingsAction) -> Result<CmdResult> {
        commands::settings::run(
            &SettingsStore::new(&self.data_dir),
            action,
            &self.data_dir,
            today(),
        )
    }

    pub fn report(&self, request: &commands::report::ReportRequest) -> Result<CmdResult> {
        commands::report::run(
            &self.data,
            request,
            today(),
            &self.config.export_path(&self.data_dir),
        )
    }

    pub fn show_config(&self, action: commands::config::ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config, &self.data_dir, action)
    }

    fn list_of<R: Dataset + Tabulate + Summarize>(
        &self,
        query: &ViewQuery,
        selected: &[RecordId],
    ) -> Result<CmdResult> {
        commands::list::run(
            load::<R, _>(&self.data)?,
            query,
            selected,
            self.config.selection_policy()?,
            self.config.layout()?,
        )
    }

    fn act_on<R: Dataset>(
        &self,
        request: &commands::act::ActRequest,
        confirm: &mut dyn Confirm,
    ) -> Result<CmdResult> {
        commands::act::run(
            load::<R, _>(&self.data)?,
            request,
            &self.dispatcher(),
            confirm,
            self.config.selection_policy()?,
        )
    }

    fn outbox_handler(&self) -> OutboxHandler {
        OutboxHandler::new(self.config.outbox_path(&self.data_dir))
    }

    fn dispatcher<R: Record>(&self) -> ActionDispatcher<R> {
        ActionDispatcher::builtin(
            ExportHandler::new(self.config.export_path(&self.data_dir)),
            self.outbox_handler(),
        )
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
