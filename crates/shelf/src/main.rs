//! # Shelf CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/shelfapp/`: the library, with every rule about filtering,
//!   selection, aggregates, actions, search, settings and reports
//! - `crates/shelf/`: this CLI, a client of `shelfapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/shelf/src/cli/)                          │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - dispatch to the API (handlers.rs)                        │
//! │  - terminal rendering with console (render.rs, styles.rs)   │
//! │  - confirmation prompts with dialoguer (prompt.rs)          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/shelfapp/src/api.rs)                     │
//! │  - loads datasets, applies configuration                    │
//! │  - returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/shelfapp/src/commands/*)             │
//! │  - collection views, actions, settings, reports             │
//! │  - no knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Commands layer**: unit tests next to the code, over fixture records.
//! - **CLI layer**: argument parsing and rendering are unit tested in
//!   `src/cli/`; `tests/` runs the built binary against a temporary data
//!   directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
