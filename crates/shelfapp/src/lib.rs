//! # shelfapp
//!
//! The library behind `shelf`, a command-line client for the list pages of
//! a library admin console: e-books, fines and reservations, plus global
//! search, reports and library settings.
//!
//! Every list page follows the same pattern, the **filtered collection
//! view**: a full dataset of one record kind, a free-text query and facet
//! selectors that narrow it, a selection for bulk actions, and summary
//! metrics computed over the whole dataset.
//!
//! ## Architecture
//!
//! ```text
//! CLI (shelf) ──► api::ShelfApi ──► commands::* ──► view / aggregate / actions
//!                                                   search / settings / reports
//!                                        │
//!                                        ▼
//!                              store::DatasetProvider
//! ```
//!
//! - [`api`]: thin facade, the only entry point UIs use
//! - [`commands`]: business logic returning structured [`commands::CmdResult`]s
//! - [`view`]: [`view::CollectionView`], filtering, selection and projection
//! - [`fields`]: field registry and the text and facet predicates
//! - [`aggregate`]: summaries over full datasets
//! - [`actions`]: row and bulk action dispatch with confirmation
//! - [`search`]: external search with stale-response handling
//! - [`settings`]: the settings document, backup and restore
//! - [`reports`]: report building and export
//! - [`store`]: dataset providers (JSON files, in-memory)
//! - [`config`]: layered configuration
//! - [`init`]: data directory resolution and context setup
//!
//! The library never prints. Diagnostics go through the `log` facade; the
//! binary decides where they end up.

pub mod actions;
pub mod aggregate;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod init;
pub mod model;
pub mod reports;
pub mod search;
pub mod settings;
pub mod store;
pub mod view;

pub use error::{Result, ShelfError};
