//! # Command Layer
//!
//! This module holds the **business logic** of every shelf operation. Each
//! command lives in its own submodule as a plain function over records,
//! settings or a search backend.
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Build a [`CollectionView`](crate::view::CollectionView) from the
//!   request, apply filters and selections, and run the operation
//! - Return a structured [`CmdResult`]: listings, metrics, search hits,
//!   action outcomes and leveled messages
//! - Are UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal output**: no stdout or styling
//! - **Argument parsing**: that's the CLI layer's job
//! - **Exit codes**: return `Result`, let the caller decide
//! - **Prompting**: confirmation goes through the [`Confirm`](crate::actions::Confirm)
//!   the caller passes in
//!
//! ## Testing Strategy
//!
//! Command tests run on the sample datasets from
//! [`crate::store::fixtures`] and write into temp dirs. Most behavior is
//! tested here rather than through the CLI.
//!
//! ## Command Modules
//!
//! - [`list`]: filtered listing with selection marks and a summary
//! - [`stats`]: summary metrics of a dataset
//! - [`facets`]: facet options
//! - [`act`]: row and bulk actions
//! - [`pay`]: record a fine payment
//! - [`search`]: global search with the recent-search list
//! - [`settings`]: edit, back up and restore library settings
//! - [`report`]: build and export reports
//! - [`config`]: show the effective configuration

use crate::actions::ActionOutcome;
use crate::aggregate::Metric;
use crate::error::Result;
use crate::fields::Selector;
use crate::model::{Record, RecordId, RecordKind};
use crate::reports::Report;
use crate::search::{RecentSearch, SearchHit};
use crate::view::{Card, CollectionView, FilterState, Layout, SelectionPolicy, Tabulate};
use serde::Serialize;
use std::path::PathBuf;

pub mod act;
pub mod config;
pub mod facets;
pub mod list;
pub mod pay;
pub mod report;
pub mod search;
pub mod settings;
pub mod stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One displayed record: table cells plus the card used by the grid layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedRow {
    pub id: RecordId,
    pub selected: bool,
    pub cells: Vec<String>,
    pub card: Card,
}

/// The visible part of a filtered dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub kind: RecordKind,
    pub layout: Layout,
    /// Size of the unfiltered dataset
    pub total: usize,
    pub columns: Vec<&'static str>,
    pub rows: Vec<ListedRow>,
}

impl Listing {
    pub fn from_view<R: Tabulate>(view: &CollectionView<R>) -> Self {
        let projection = view.project();
        Self {
            kind: R::KIND,
            layout: projection.layout,
            total: projection.total,
            columns: R::columns().to_vec(),
            rows: projection
                .rows
                .iter()
                .map(|row| ListedRow {
                    id: row.record.id(),
                    selected: row.selected,
                    cells: row.record.cells(),
                    card: row.record.card(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub listing: Option<Listing>,
    pub metrics: Vec<Metric>,
    /// Facet name → options, "All" first
    pub facets: Vec<(String, Vec<String>)>,
    pub hits: Vec<SearchHit>,
    pub recent: Vec<RecentSearch>,
    pub report: Option<Report>,
    /// Key/value pairs (settings, config)
    pub entries: Vec<(String, String)>,
    pub paths: Vec<PathBuf>,
    pub outcome: Option<ActionOutcome>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listing(mut self, listing: Listing) -> Self {
        self.listing = Some(listing);
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_entries(mut self, entries: Vec<(String, String)>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}

/// Filters and layout of a request against one dataset.
#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
    pub search: Option<String>,
    /// `(facet, value)` pairs; the value "All" clears the facet
    pub facets: Vec<(String, String)>,
    pub layout: Option<Layout>,
}

impl ViewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn facet(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.facets.push((field.into(), value.into()));
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        if let Some(text) = &self.search {
            state.search_text = text.clone();
        }
        for (field, value) in &self.facets {
            state.set_facet(field, Selector::parse(value));
        }
        state
    }
}

/// Open a view over `records` with `query` applied.
///
/// Unknown facets and facet values are rejected.
pub fn open_view<R: Record>(
    records: Vec<R>,
    query: &ViewQuery,
    policy: SelectionPolicy,
    default_layout: Layout,
) -> Result<CollectionView<R>> {
    let mut view = CollectionView::new(records)
        .with_policy(policy)
        .with_layout(query.layout.unwrap_or(default_layout));
    view.apply_filter(query.filter_state())?;
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::sample_fines;

    #[test]
    fn open_view_applies_search_and_facets() {
        let query = ViewQuery::new().search("gatsby").facet("status", "Partially Paid");
        let view = open_view(sample_fines(), &query, SelectionPolicy::Sticky, Layout::Grid).unwrap();
        assert_eq!(view.visible_ids(), vec![1]);
    }

    #[test]
    fn open_view_rejects_unknown_facet() {
        let query = ViewQuery::new().facet("colour", "red");
        assert!(open_view(sample_fines(), &query, SelectionPolicy::Sticky, Layout::Grid).is_err());
    }

    #[test]
    fn all_value_leaves_facet_unset() {
        let query = ViewQuery::new().facet("status", "All");
        let view = open_view(sample_fines(), &query, SelectionPolicy::Sticky, Layout::List).unwrap();
        assert_eq!(view.visible().len(), 8);
        assert_eq!(view.layout(), Layout::List);
    }

    #[test]
    fn listing_carries_cells_and_selection() {
        let mut view = CollectionView::new(sample_fines());
        view.toggle(3).unwrap();
        let listing = Listing::from_view(&view);
        assert_eq!(listing.total, 8);
        assert_eq!(listing.rows.len(), 8);
        assert!(listing.rows[2].selected);
        assert!(!listing.rows[0].selected);
        assert_eq!(listing.rows[0].cells.len(), listing.columns.len());
    }
}
