//! # Dataset Layer
//!
//! A view never owns its data source. It asks a [`DatasetProvider`] for the
//! full, ordered collection of one record kind when it is built, and never
//! writes back: actions that look like mutations are dispatched to external
//! collaborators instead.
//!
//! ## Implementations
//!
//! - [`json::JsonDataset`]: reads `<data_dir>/<kind>.json`. A missing file is
//!   an empty collection, not an error.
//! - [`memory::InMemoryDataset`]: holds the records directly. Used by tests
//!   and by callers that already have the data.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── ebooks.json         # [EBook]
//! ├── fines.json          # [Fine]
//! ├── reservations.json   # [Reservation]
//! ├── settings.json       # LibrarySettings (see crate::settings)
//! └── shelf.toml          # ShelfConfig (see crate::config)
//! ```

use crate::error::Result;
use crate::model::{EBook, Fine, Record, Reservation};

pub mod json;
pub mod memory;

#[cfg(any(test, feature = "test_utils"))]
pub use memory::fixtures;

/// Supplies the full collection of each record kind, in dataset order.
pub trait DatasetProvider {
    fn ebooks(&self) -> Result<Vec<EBook>>;

    fn fines(&self) -> Result<Vec<Fine>>;

    fn reservations(&self) -> Result<Vec<Reservation>>;
}

/// A record kind that can be pulled out of any provider.
///
/// Lets generic code (views, the local search backend) load "the records of
/// type R" without matching on the kind.
pub trait Dataset: Record {
    fn load_from<D: DatasetProvider + ?Sized>(provider: &D) -> Result<Vec<Self>>;
}

impl Dataset for EBook {
    fn load_from<D: DatasetProvider + ?Sized>(provider: &D) -> Result<Vec<Self>> {
        provider.ebooks()
    }
}

impl Dataset for Fine {
    fn load_from<D: DatasetProvider + ?Sized>(provider: &D) -> Result<Vec<Self>> {
        provider.fines()
    }
}

impl Dataset for Reservation {
    fn load_from<D: DatasetProvider + ?Sized>(provider: &D) -> Result<Vec<Self>> {
        provider.reservations()
    }
}

/// Load every record of kind `R` from the provider.
pub fn load<R: Dataset, D: DatasetProvider + ?Sized>(provider: &D) -> Result<Vec<R>> {
    R::load_from(provider)
}
