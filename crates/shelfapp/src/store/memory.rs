use super::DatasetProvider;
use crate::error::Result;
use crate::model::{EBook, Fine, Reservation};

/// Datasets held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    pub ebooks: Vec<EBook>,
    pub fines: Vec<Fine>,
    pub reservations: Vec<Reservation>,
}

impl InMemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ebooks(mut self, ebooks: Vec<EBook>) -> Self {
        self.ebooks = ebooks;
        self
    }

    pub fn with_fines(mut self, fines: Vec<Fine>) -> Self {
        self.fines = fines;
        self
    }

    pub fn with_reservations(mut self, reservations: Vec<Reservation>) -> Self {
        self.reservations = reservations;
        self
    }
}

impl DatasetProvider for InMemoryDataset {
    fn ebooks(&self) -> Result<Vec<EBook>> {
        Ok(self.ebooks.clone())
    }

    fn fines(&self) -> Result<Vec<Fine>> {
        Ok(self.fines.clone())
    }

    fn reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.reservations.clone())
    }
}

// --- Test Fixtures ---

/// The console's sample records: 8 e-books, 8 fines, 7 reservations.
///
/// The JSON sources live in `fixtures/` at the crate root so end-to-end
/// tests can copy them into a data directory.
#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub const EBOOKS_JSON: &str = include_str!("../../fixtures/ebooks.json");
    pub const FINES_JSON: &str = include_str!("../../fixtures/fines.json");
    pub const RESERVATIONS_JSON: &str = include_str!("../../fixtures/reservations.json");

    pub fn sample_ebooks() -> Vec<EBook> {
        serde_json::from_str(EBOOKS_JSON).expect("ebooks fixture is valid")
    }

    pub fn sample_fines() -> Vec<Fine> {
        serde_json::from_str(FINES_JSON).expect("fines fixture is valid")
    }

    pub fn sample_reservations() -> Vec<Reservation> {
        serde_json::from_str(RESERVATIONS_JSON).expect("reservations fixture is valid")
    }

    /// All three sample datasets.
    pub fn sample_dataset() -> InMemoryDataset {
        InMemoryDataset::new()
            .with_ebooks(sample_ebooks())
            .with_fines(sample_fines())
            .with_reservations(sample_reservations())
    }

    /// Write the sample datasets as JSON files into `dir`.
    pub fn write_sample_files(dir: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(dir.join("ebooks.json"), EBOOKS_JSON)?;
        std::fs::write(dir.join("fines.json"), FINES_JSON)?;
        std::fs::write(dir.join("reservations.json"), RESERVATIONS_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::store::load;

    #[test]
    fn fixtures_have_expected_sizes() {
        let data = sample_dataset();
        assert_eq!(data.ebooks().unwrap().len(), 8);
        assert_eq!(data.fines().unwrap().len(), 8);
        assert_eq!(data.reservations().unwrap().len(), 7);
    }

    #[test]
    fn generic_load_picks_the_right_collection() {
        let data = sample_dataset();
        let fines: Vec<Fine> = load(&data).unwrap();
        assert_eq!(fines[0].member_name, "John Doe");
        let books: Vec<EBook> = load(&data).unwrap();
        assert_eq!(books[0].title, "The Great Gatsby");
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let data = InMemoryDataset::new();
        assert!(data.fines().unwrap().is_empty());
    }
}
