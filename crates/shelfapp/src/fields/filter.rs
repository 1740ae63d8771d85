//! Record predicates.
//!
//! Two predicate kinds cover every list page of the console:
//! - [`TextQuery`]: case-insensitive substring match over the record's
//!   searchable fields. No tokenization, no fuzzy matching, no ranking.
//! - [`FacetFilter`]: exact equality on a categorical field, or "All".

use crate::model::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The sentinel facet value that matches every record.
pub const ALL: &str = "All";

/// Selector for one facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Match every record (the default).
    #[default]
    All,
    /// Match records whose facet equals this value exactly.
    Only(String),
}

impl Selector {
    pub fn only(value: impl Into<String>) -> Self {
        Selector::Only(value.into())
    }

    /// Parse a user-facing value: the literal "All" becomes [`Selector::All`].
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Selector::All
        } else {
            Selector::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str(ALL),
            Selector::Only(v) => f.write_str(v),
        }
    }
}

/// A free-text query, case-folded once at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// The lower-cased query.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Check whether any searchable field contains the query.
    ///
    /// An empty query matches everything.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        R::FIELDS
            .iter()
            .filter(|spec| spec.searchable)
            .filter_map(|spec| record.field(spec.name))
            .filter_map(|value| value.as_text())
            .any(|text| text.to_lowercase().contains(&self.needle))
    }
}

/// An equality condition on one facet field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetFilter {
    /// The facet field name (e.g., "status", "category")
    pub field: String,
    /// The selector to compare against
    pub selector: Selector,
}

impl FacetFilter {
    pub fn new(field: impl Into<String>, selector: Selector) -> Self {
        Self {
            field: field.into(),
            selector,
        }
    }

    /// Check whether the record's facet value satisfies the selector.
    ///
    /// `All` matches every record. Otherwise the field must exist and its
    /// displayed value must equal the selector value exactly.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let Selector::Only(expected) = &self.selector else {
            return true;
        };
        match record.field(&self.field) {
            Some(value) => value.display() == *expected,
            None => false,
        }
    }
}
