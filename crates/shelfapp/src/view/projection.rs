//! Rendering input for a filtered collection.
//!
//! The projector decides nothing about presentation beyond the layout
//! choice; renderers consume [`Projection`] and draw cards or rows.

use crate::model::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a collection is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Cards, several per line
    #[default]
    Grid,
    /// One row per record
    List,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Grid => f.write_str("grid"),
            Layout::List => f.write_str("list"),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(Layout::Grid),
            "list" | "table" => Ok(Layout::List),
            other => Err(format!("Unknown layout: {}", other)),
        }
    }
}

/// One visible record with its selection mark.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectedRow<'a, R: Record> {
    pub record: &'a R,
    pub selected: bool,
}

/// The filtered collection ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Projection<'a, R: Record> {
    pub layout: Layout,
    pub rows: Vec<ProjectedRow<'a, R>>,
    /// Size of the unfiltered collection ("Showing 3 of 8")
    pub total: usize,
    /// Selected ids, including any hidden by the filter
    pub selected: usize,
}

impl<'a, R: Record> Projection<'a, R> {
    pub fn visible(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the "select all" checkbox renders as checked.
    pub fn all_selected(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_parses_aliases() {
        assert_eq!("Table".parse::<Layout>().unwrap(), Layout::List);
        assert_eq!("grid".parse::<Layout>().unwrap(), Layout::Grid);
        assert!("cards".parse::<Layout>().is_err());
    }
}
