//! # CLI Behavior
//!
//! This is **one possible UI client** for shelf, not the application itself.
//! The CLI is the only place that knows about terminal I/O, prompts, exit
//! codes and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Naked Execution (`shelf`)
//!
//! Running `shelf` with no arguments lists fines, the page an admin opens
//! most.
//!
//! ## Confirmation
//!
//! Destructive actions (`waive`, `cancel`) ask before dispatching. The
//! prompt goes through dialoguer; `--yes` answers it up front. Without a
//! terminal the prompt cannot be shown and the action is declined.
//!
//! ## Output
//!
//! Results are rendered for the terminal by `render.rs`. `--json` prints the
//! raw `CmdResult` instead, for scripting.

mod commands;
mod handlers;
mod prompt;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
