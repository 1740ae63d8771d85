//! # Data Model
//!
//! A [`Record`] is one entity of a dataset: an e-book, a fine, a reservation.
//! All record kinds share the same skeleton: a stable numeric id, a handful of
//! text/number/flag/category/date fields described by a static
//! [`FieldSpec`](crate::fields::FieldSpec) registry, and optional nested
//! sub-records (a fine's payment history, a reservation's notes).
//!
//! Records are loaded once per view and never mutated by it. Actions that
//! look like mutations (waive, cancel, pay) are dispatched to external
//! collaborators; see [`crate::actions`].
//!
//! ## Serialization
//!
//! Records serialize with camelCase keys so dataset files share the shape of
//! the admin console's records (`memberName`, `remainingAmount`, ...).
//! Field names used by filters are snake_case (`member_name`).

use crate::fields::{FieldSpec, FieldValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod ebook;
mod fine;
mod reservation;

pub use ebook::EBook;
pub use fine::{Fine, Payment};
pub use reservation::Reservation;

/// Stable identifier of a record within its dataset.
pub type RecordId = u32;

/// The record kinds known to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Ebook,
    Fine,
    Reservation,
}

impl RecordKind {
    pub fn all() -> &'static [RecordKind] {
        &[RecordKind::Ebook, RecordKind::Fine, RecordKind::Reservation]
    }

    /// Singular noun used in messages.
    pub fn noun(self) -> &'static str {
        match self {
            RecordKind::Ebook => "e-book",
            RecordKind::Fine => "fine",
            RecordKind::Reservation => "reservation",
        }
    }

    /// Plural noun used in messages ("Please select fines first").
    pub fn plural(self) -> &'static str {
        match self {
            RecordKind::Ebook => "e-books",
            RecordKind::Fine => "fines",
            RecordKind::Reservation => "reservations",
        }
    }

    /// Base name of the dataset file (`<data_dir>/<name>.json`).
    pub fn dataset_name(self) -> &'static str {
        match self {
            RecordKind::Ebook => "ebooks",
            RecordKind::Fine => "fines",
            RecordKind::Reservation => "reservations",
        }
    }

    /// "1 fine" / "3 fines"
    pub fn count_label(self, n: usize) -> String {
        if n == 1 {
            format!("1 {}", self.noun())
        } else {
            format!("{} {}", n, self.plural())
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dataset_name())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ebook" | "ebooks" | "e-book" | "e-books" => Ok(RecordKind::Ebook),
            "fine" | "fines" => Ok(RecordKind::Fine),
            "reservation" | "reservations" => Ok(RecordKind::Reservation),
            other => Err(format!("Unknown record kind: {}", other)),
        }
    }
}

/// One entity of a dataset.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Which dataset this record belongs to.
    const KIND: RecordKind;

    /// Field registry: which fields are searchable and which are facets.
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> RecordId;

    /// Read a field by its registry name. Returns `None` for unknown names.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Short human label used in action messages (e.g., a book title).
    fn label(&self) -> String;

    /// Outstanding balance that amount-taking actions are checked against.
    fn balance(&self) -> Option<u32> {
        None
    }
}

/// Find a record by id.
pub fn find_record<R: Record>(records: &[R], id: RecordId) -> Option<&R> {
    records.iter().find(|r| r.id() == id)
}
