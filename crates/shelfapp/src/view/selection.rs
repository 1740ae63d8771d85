//! Selection tracking for bulk actions.

use crate::model::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// What happens to selected ids that a filter change hides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Hidden ids stay selected and still receive bulk actions.
    #[default]
    Sticky,
    /// Hidden ids are dropped whenever the filter changes.
    Prune,
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::Sticky => f.write_str("sticky"),
            SelectionPolicy::Prune => f.write_str("prune"),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sticky" => Ok(SelectionPolicy::Sticky),
            "prune" => Ok(SelectionPolicy::Prune),
            other => Err(format!("Unknown selection policy: {}", other)),
        }
    }
}

/// A set of selected record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: BTreeSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns true if it is now selected.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// "Select all" checkbox semantics.
    ///
    /// If the selection already has as many ids as the view shows, clear it.
    /// Otherwise replace it with exactly `ids_in_view`.
    pub fn select_all(&mut self, ids_in_view: &[RecordId]) {
        if self.ids.len() == ids_in_view.len() {
            self.ids.clear();
        } else {
            self.ids = ids_in_view.iter().copied().collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop every id not in `visible`.
    pub fn retain(&mut self, visible: &[RecordId]) {
        self.ids.retain(|id| visible.contains(id));
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.ids.iter().copied().collect()
    }
}

impl FromIterator<RecordId> for Selection {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
