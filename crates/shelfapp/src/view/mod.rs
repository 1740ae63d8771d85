//! # Collection Views
//!
//! A [`CollectionView`] is the state of one list page of the console: the
//! full dataset of one record kind, the active [`FilterState`], the
//! [`Selection`] for bulk actions and the layout choice.
//!
//! ```text
//! records ──► filter(state) ──► projection (grid | list)
//!    │                              ▲
//!    └──► summarize (full set)      └── selection marks
//! ```
//!
//! Every view is independent. Nothing is shared between views and nothing
//! survives [`CollectionView::reset`], which models leaving the page.
//!
//! ## Selection and filter changes
//!
//! Under [`SelectionPolicy::Sticky`] (the default) a selected record that a
//! later filter hides stays selected and still receives bulk actions. Under
//! [`SelectionPolicy::Prune`] every filter change drops hidden ids.

mod columns;
mod filter;
mod projection;
mod selection;

pub use columns::{Card, Tabulate};
pub use filter::{facet_options, filter, filter_records, validate_facet, FilterState};
pub use projection::{Layout, ProjectedRow, Projection};
pub use selection::{Selection, SelectionPolicy};

use crate::aggregate::Summarize;
use crate::error::{Result, ShelfError};
use crate::fields::Selector;
use crate::model::{find_record, Record, RecordId};

/// Filter, selection and layout state over one dataset.
#[derive(Debug, Clone)]
pub struct CollectionView<R: Record> {
    records: Vec<R>,
    filter: FilterState,
    selection: Selection,
    policy: SelectionPolicy,
    layout: Layout,
}

impl<R: Record> CollectionView<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            filter: FilterState::default(),
            selection: Selection::default(),
            policy: SelectionPolicy::default(),
            layout: Layout::default(),
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search_text = text.into();
        self.after_filter_change();
    }

    /// Set one facet selector.
    ///
    /// The value must be "All" or one of [`CollectionView::facet_options`];
    /// anything else is rejected and the filter stays as it was.
    pub fn set_facet(&mut self, field: &str, selector: Selector) -> Result<()> {
        validate_facet(&self.records, field, &selector)?;
        self.filter.set_facet(field, selector);
        self.after_filter_change();
        Ok(())
    }

    /// Replace the whole filter state, validating every facet first.
    pub fn apply_filter(&mut self, state: FilterState) -> Result<()> {
        for (field, selector) in &state.facets {
            validate_facet(&self.records, field, selector)?;
        }
        self.filter = state;
        self.after_filter_change();
        Ok(())
    }

    pub fn facet_options(&self, field: &str) -> Result<Vec<String>> {
        facet_options(&self.records, field)
    }

    /// Records passing the current filter, in dataset order.
    pub fn visible(&self) -> Vec<&R> {
        filter(&self.records, &self.filter)
    }

    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible().iter().map(|r| r.id()).collect()
    }

    /// Toggle selection of a record. Returns true if it is now selected.
    pub fn toggle(&mut self, id: RecordId) -> Result<bool> {
        if find_record(&self.records, id).is_none() {
            return Err(ShelfError::RecordNotFound(id));
        }
        Ok(self.selection.toggle(id))
    }

    /// The "select all" checkbox over what the filter currently shows.
    pub fn select_all_visible(&mut self) {
        let ids = self.visible_ids();
        self.selection.select_all(&ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected records in dataset order, including hidden ones.
    pub fn selected_records(&self) -> Vec<&R> {
        self.records
            .iter()
            .filter(|r| self.selection.contains(r.id()))
            .collect()
    }

    pub fn find(&self, id: RecordId) -> Result<&R> {
        find_record(&self.records, id).ok_or(ShelfError::RecordNotFound(id))
    }

    /// Forget filter and selection, as when navigating away.
    pub fn reset(&mut self) {
        self.filter = FilterState::default();
        self.selection.clear();
    }

    /// Aggregates over the full dataset. The filter has no effect.
    pub fn summary(&self) -> R::Summary
    where
        R: Summarize,
    {
        R::summarize(&self.records)
    }

    pub fn project(&self) -> Projection<'_, R> {
        let rows = self
            .visible()
            .into_iter()
            .map(|record| ProjectedRow {
                record,
                selected: self.selection.contains(record.id()),
            })
            .collect();
        Projection {
            layout: self.layout,
            rows,
            total: self.records.len(),
            selected: self.selection.len(),
        }
    }

    fn after_filter_change(&mut self) {
        if self.policy == SelectionPolicy::Prune {
            let visible = self.visible_ids();
            self.selection.retain(&visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Fine;
    use crate::store::fixtures::{sample_ebooks, sample_fines};

    fn fines_view() -> CollectionView<Fine> {
        CollectionView::new(sample_fines())
    }

    #[test]
    fn summary_ignores_filter() {
        let mut view = fines_view();
        let before = view.summary();
        view.set_facet("status", Selector::only("Overdue")).unwrap();
        assert_eq!(view.visible().len(), 1);
        let after = view.summary();
        assert_eq!(before, after);
        assert_eq!(after.total_pending, 850);
    }

    #[test]
    fn unknown_facet_value_leaves_filter_unchanged() {
        let mut view = fines_view();
        view.set_facet("status", Selector::only("Pending")).unwrap();
        let err = view.set_facet("status", Selector::only("Lost")).unwrap_err();
        assert!(matches!(err, ShelfError::UnknownFacetValue { .. }));
        assert_eq!(view.filter_state().facet("status"), Selector::only("Pending"));
    }

    #[test]
    fn select_all_visible_uses_filtered_ids() {
        let mut view = fines_view();
        view.set_facet("status", Selector::only("Pending")).unwrap();
        view.select_all_visible();
        assert_eq!(view.selection().ids(), vec![5, 6]);
        view.select_all_visible();
        assert!(view.selection().is_empty());
    }

    #[test]
    fn sticky_selection_survives_filter_change() {
        let mut view = fines_view();
        view.toggle(1).unwrap();
        view.set_facet("status", Selector::only("Overdue")).unwrap();
        assert!(view.selection().contains(1));
        assert_eq!(view.selected_records()[0].id, 1);
    }

    #[test]
    fn prune_policy_drops_hidden_ids() {
        let mut view = fines_view().with_policy(SelectionPolicy::Prune);
        view.toggle(1).unwrap();
        view.toggle(3).unwrap();
        view.set_facet("status", Selector::only("Overdue")).unwrap();
        assert_eq!(view.selection().ids(), vec![3]);
        view.set_search("nobody");
        assert!(view.selection().is_empty());
    }

    #[test]
    fn toggle_unknown_record_fails() {
        let mut view = fines_view();
        assert!(matches!(view.toggle(99), Err(ShelfError::RecordNotFound(99))));
    }

    #[test]
    fn reset_clears_filter_and_selection() {
        let mut view = fines_view();
        view.set_search("doe");
        view.toggle(1).unwrap();
        view.reset();
        assert!(view.filter_state().is_empty());
        assert!(view.selection().is_empty());
        assert_eq!(view.visible().len(), 8);
    }

    #[test]
    fn projection_marks_selected_rows() {
        let mut view = CollectionView::new(sample_ebooks()).with_layout(Layout::List);
        view.set_facet("category", Selector::only("Dystopian")).unwrap();
        view.toggle(3).unwrap();
        let projection = view.project();
        assert_eq!(projection.layout, Layout::List);
        assert_eq!(projection.visible(), 2);
        assert_eq!(projection.total, 8);
        assert!(projection.rows[0].selected);
        assert!(!projection.rows[1].selected);
        assert!(!projection.all_selected());
    }

    #[test]
    fn apply_filter_validates_all_facets() {
        let mut view = fines_view();
        let bad = FilterState::new()
            .with_search("doe")
            .with_facet("fine_type", Selector::only("Parking"));
        assert!(view.apply_filter(bad).is_err());
        assert!(view.filter_state().is_empty());
    }
}
