//! The predicate filter: free-text query AND facet selectors.

use crate::error::{Result, ShelfError};
use crate::fields::{find_spec, FacetFilter, Selector, TextQuery, ALL};
use crate::model::Record;
use std::collections::BTreeMap;

/// Ephemeral per-view filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    /// Facet field name → selector. Absent facets are "All".
    pub facets: BTreeMap<String, Selector>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_facet(mut self, field: impl Into<String>, selector: Selector) -> Self {
        self.set_facet(field, selector);
        self
    }

    /// Set a facet selector. Setting "All" removes the entry.
    pub fn set_facet(&mut self, field: impl Into<String>, selector: Selector) {
        let field = field.into();
        if selector.is_all() {
            self.facets.remove(&field);
        } else {
            self.facets.insert(field, selector);
        }
    }

    pub fn facet(&self, field: &str) -> Selector {
        self.facets.get(field).cloned().unwrap_or_default()
    }

    /// True when nothing narrows the collection.
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.facets.is_empty()
    }

    fn predicates(&self) -> (TextQuery, Vec<FacetFilter>) {
        let query = TextQuery::new(&self.search_text);
        let facets = self
            .facets
            .iter()
            .map(|(field, selector)| FacetFilter::new(field.clone(), selector.clone()))
            .collect();
        (query, facets)
    }
}

/// Records matching every facet selector and the text query, in input order.
pub fn filter<'a, R: Record>(records: &'a [R], state: &FilterState) -> Vec<&'a R> {
    let (query, facets) = state.predicates();
    records
        .iter()
        .filter(|r| facets.iter().all(|f| f.matches(*r)))
        .filter(|r| query.matches(*r))
        .collect()
}

/// Single-facet form: `query` over the searchable fields AND `facet == selector`.
pub fn filter_records<'a, R: Record>(
    records: &'a [R],
    query: &str,
    facet: &str,
    selector: &Selector,
) -> Vec<&'a R> {
    let state = FilterState::new()
        .with_search(query)
        .with_facet(facet, selector.clone());
    filter(records, &state)
}

/// Options a facet selector may take: "All" followed by the distinct values
/// present in the data, in first-seen order.
///
/// Fails with [`ShelfError::UnknownFacet`] if `field` is not a facet of `R`.
pub fn facet_options<R: Record>(records: &[R], field: &str) -> Result<Vec<String>> {
    let spec = find_spec(R::FIELDS, field)
        .filter(|s| s.facet)
        .ok_or_else(|| ShelfError::UnknownFacet(field.to_string()))?;

    let mut options = vec![ALL.to_string()];
    for record in records {
        let Some(value) = record.field(field) else {
            continue;
        };
        let value = value.display();
        if spec.omit_option == Some(value.as_str()) || options.contains(&value) {
            continue;
        }
        options.push(value);
    }
    Ok(options)
}

/// Check that `selector` is a legal value for `field` over `records`.
pub fn validate_facet<R: Record>(records: &[R], field: &str, selector: &Selector) -> Result<()> {
    let options = facet_options(records, field)?;
    match selector {
        Selector::All => Ok(()),
        Selector::Only(value) if options.iter().skip(1).any(|o| o == value) => Ok(()),
        Selector::Only(value) => Err(ShelfError::UnknownFacetValue {
            facet: field.to_string(),
            value: value.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fine, RecordId};
    use crate::store::fixtures::{sample_ebooks, sample_fines, sample_reservations};

    fn ids<R: Record>(records: &[&R]) -> Vec<RecordId> {
        records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn empty_state_returns_whole_collection() {
        let fines = sample_fines();
        let all = filter(&fines, &FilterState::new());
        assert_eq!(all.len(), fines.len());
        assert_eq!(ids(&all), fines.iter().map(|f| f.id).collect::<Vec<_>>());
    }

    #[test]
    fn overdue_facet_yields_single_fine() {
        let fines = sample_fines();
        let hits = filter_records(&fines, "", "status", &Selector::only("Overdue"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].remaining_amount, 250);
    }

    #[test]
    fn query_and_facet_combine() {
        let fines = sample_fines();
        let state = FilterState::new()
            .with_search("wilson")
            .with_facet("status", Selector::only("Pending"));
        let hits = filter(&fines, &state);
        // Charlie Wilson has "No Fine"; only Emma matches both
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].member_name, "Emma Wilson");
    }

    #[test]
    fn result_preserves_input_order() {
        let fines = sample_fines();
        let hits = filter_records(&fines, "", "fine_type", &Selector::only("Late Return"));
        let got = ids(&hits);
        let mut sorted = got.clone();
        sorted.sort();
        assert_eq!(got, sorted);
        assert!(got.len() > 1);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let fines = sample_fines();
        assert!(filter_records(&fines, "zzz", "status", &Selector::All).is_empty());
    }

    #[test]
    fn filtered_records_contain_the_query() {
        let books = sample_ebooks();
        let hits = filter_records(&books, "the", "category", &Selector::All);
        assert!(!hits.is_empty());
        for book in hits {
            let haystack = format!("{} {} {}", book.title, book.author, book.category)
                .to_lowercase();
            assert!(haystack.contains("the"));
        }
    }

    #[test]
    fn facet_options_first_seen_order() {
        let fines = sample_fines();
        let options = facet_options(&fines, "status").unwrap();
        assert_eq!(
            options,
            vec!["All", "Partially Paid", "Settled", "Overdue", "No Fine", "Pending"]
        );
    }

    #[test]
    fn facet_options_skip_omitted_value() {
        let fines = sample_fines();
        let options = facet_options(&fines, "fine_type").unwrap();
        assert_eq!(options, vec!["All", "Late Return", "Lost Book", "Damage"]);
    }

    #[test]
    fn facet_options_on_empty_collection() {
        let empty: Vec<Fine> = Vec::new();
        assert_eq!(facet_options(&empty, "status").unwrap(), vec!["All"]);
    }

    #[test]
    fn facet_options_reject_non_facet_fields() {
        let fines = sample_fines();
        assert!(matches!(
            facet_options(&fines, "member_name"),
            Err(ShelfError::UnknownFacet(_))
        ));
    }

    #[test]
    fn validate_facet_rejects_values_not_in_data() {
        let reservations = sample_reservations();
        assert!(validate_facet(&reservations, "status", &Selector::only("Pending")).is_ok());
        assert!(validate_facet(&reservations, "status", &Selector::All).is_ok());
        assert!(matches!(
            validate_facet(&reservations, "status", &Selector::only("Lost")),
            Err(ShelfError::UnknownFacetValue { .. })
        ));
    }

    #[test]
    fn setting_all_clears_the_facet() {
        let mut state = FilterState::new().with_facet("status", Selector::only("Pending"));
        assert!(!state.is_empty());
        state.set_facet("status", Selector::All);
        assert!(state.is_empty());
        assert_eq!(state.facet("status"), Selector::All);
    }
}
