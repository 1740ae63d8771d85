//! # CLI Entry
//!
//! `run()` is the whole life of one invocation:
//!
//! 1. Parse arguments (clap)
//! 2. Set up logging (env_logger, `RUST_LOG` overrides `--verbose`)
//! 3. Resolve the data directory and build the API
//! 4. Dispatch to a handler
//! 5. Print the result, as JSON with `--json` or rendered for the terminal
//!
//! Errors bubble up to `main`, which prints them and exits with status 1.

use super::handlers;
use super::prompt::TerminalConfirm;
use super::render::{render_result, terminal_width};
use super::setup::parse_cli;
use anyhow::{Context, Result};
use log::LevelFilter;
use shelfapp::actions::{AlwaysConfirm, Confirm};
use shelfapp::init::initialize;

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let ctx = initialize(cli.data_dir.clone()).context("could not set up shelf")?;

    let mut always = AlwaysConfirm;
    let mut terminal = TerminalConfirm;
    let confirm: &mut dyn Confirm = if cli.yes { &mut always } else { &mut terminal };

    let result = handlers::dispatch(&ctx.api, cli.command, confirm)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_result(&result, terminal_width()));
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // try_init: a second call (tests) must not panic
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}
