//! Search over the loaded datasets, for use without a search service.

use super::{SearchBackend, SearchResponse, SearchType};
use crate::error::Result;
use crate::fields::TextQuery;
use crate::model::{EBook, Fine, Record, Reservation};
use crate::store::DatasetProvider;
use serde_json::{json, Value};

/// Runs the text query over e-books, reservations and the members that
/// appear in fines and reservations.
#[derive(Debug, Clone, Default)]
pub struct LocalSearchBackend {
    ebooks: Vec<EBook>,
    fines: Vec<Fine>,
    reservations: Vec<Reservation>,
}

impl LocalSearchBackend {
    pub fn load<D: DatasetProvider + ?Sized>(provider: &D) -> Result<Self> {
        Ok(Self {
            ebooks: provider.ebooks()?,
            fines: provider.fines()?,
            reservations: provider.reservations()?,
        })
    }

    fn members(&self, query: &TextQuery) -> Vec<Value> {
        let mut seen: Vec<&str> = Vec::new();
        let mut members = Vec::new();
        let people = self
            .fines
            .iter()
            .map(|f| (f.member_id.as_str(), f.member_name.as_str(), f.member_email.as_str()))
            .chain(
                self.reservations
                    .iter()
                    .map(|r| (r.member_id.as_str(), r.member_name.as_str(), "")),
            );
        for (id, name, email) in people {
            if seen.contains(&id) {
                continue;
            }
            let needle_hit = [id, name, email]
                .iter()
                .any(|t| query.is_empty() || t.to_lowercase().contains(query.needle()));
            if needle_hit {
                seen.push(id);
                members.push(json!({ "id": id, "name": name, "memberId": id, "email": email }));
            }
        }
        members
    }
}

fn matching<R: Record>(records: &[R], query: &TextQuery) -> Vec<Value> {
    records
        .iter()
        .filter(|r| query.matches(*r))
        .filter_map(|r| serde_json::to_value(r).ok())
        .collect()
}

impl SearchBackend for LocalSearchBackend {
    fn search(&self, query: &str) -> Result<SearchResponse> {
        let query = TextQuery::new(query.trim());
        Ok(SearchResponse::new()
            .with_category(SearchType::Ebooks.as_str(), matching(&self.ebooks, &query))
            .with_category(SearchType::Members.as_str(), self.members(&query))
            .with_category(
                SearchType::Reservations.as_str(),
                matching(&self.reservations, &query),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchResults, SearchSession};
    use crate::store::fixtures::sample_dataset;

    #[test]
    fn finds_ebooks_and_reservations() {
        let backend = LocalSearchBackend::load(&sample_dataset()).unwrap();
        let results = SearchResults::from_response(&backend.search("hobbit").unwrap());
        assert_eq!(results.category(SearchType::Ebooks).len(), 1);
        assert_eq!(results.category(SearchType::Ebooks)[0].status.as_deref(), Some("Available"));
        let reservations = results.category(SearchType::Reservations);
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0].detail, "Charlie Wilson");
    }

    #[test]
    fn members_are_deduplicated() {
        let backend = LocalSearchBackend::load(&sample_dataset()).unwrap();
        let results = SearchResults::from_response(&backend.search("john doe").unwrap());
        let members = results.category(SearchType::Members);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].detail, "MEM2024001");
    }

    #[test]
    fn works_inside_a_session() {
        let backend = LocalSearchBackend::load(&sample_dataset()).unwrap();
        let session = SearchSession::new(backend);
        session.set_search_type(SearchType::Members);
        session.search("wilson");
        assert_eq!(session.visible_hits().len(), 2);
        assert_eq!(session.recent()[0].term, "wilson");
    }
}
