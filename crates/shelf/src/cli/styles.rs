//! Terminal styles.
//!
//! Renderers use the semantic styles below, never raw colors, so the look
//! can change in one place. `console` drops the escape codes when stdout is
//! not a terminal.

use console::Style;
use once_cell::sync::Lazy;

pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static FAINT: Lazy<Style> = Lazy::new(|| Style::new().color256(240));
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static SELECTED: Lazy<Style> = Lazy::new(|| Style::new().cyan().bold());
pub static VALUE: Lazy<Style> = Lazy::new(|| Style::new().yellow());

pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static INFO: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());
pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red().bold());

/// Badge color by status word.
pub fn badge(status: &str) -> &'static Style {
    match status {
        "Settled" | "Completed" | "Available" | "Featured" => &*SUCCESS,
        "Overdue" | "Cancelled" | "Unavailable" | "Borrowed" => &*ERROR,
        "Pending" | "Partially Paid" | "Ready for Pickup" => &*WARNING,
        _ => &*MUTED,
    }
}
