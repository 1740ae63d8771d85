//! # Field System
//!
//! Every record kind exposes its filterable and searchable data through one
//! uniform surface instead of per-page ad-hoc matching code:
//!
//! - **Specifications**: a static registry per record kind describing each
//!   field (kind, searchable, facet, omitted option)
//! - **Values**: `Record::field()` returns a borrowed [`FieldValue`]
//! - **Predicates**: [`TextQuery`] (case-insensitive substring over the
//!   searchable fields) and [`FacetFilter`] (exact equality on a facet)
//!
//! ## Field Kinds
//!
//! | Kind | Examples | Description |
//! |------|----------|-------------|
//! | `Text` | `title`, `member_email` | Free text, usually searchable |
//! | `Category` | `status`, `fine_type` | Closed set derived from the data |
//! | `Number` | `downloads`, `remaining_amount` | Counts and amounts |
//! | `Flag` | `is_featured` | true/false |
//! | `Date` | `due_date` | Optional calendar date |
//!
//! ## Usage
//!
//! ```ignore
//! let query = TextQuery::new("gatsby");
//! let overdue = FacetFilter::new("status", Selector::only("Overdue"));
//! if query.matches(&fine) && overdue.matches(&fine) { ... }
//! ```

mod filter;
mod spec;
mod value;

pub use filter::{FacetFilter, Selector, TextQuery, ALL};
pub use spec::{facet_fields, find_spec, searchable_fields, FieldKind, FieldSpec};
pub use value::FieldValue;
