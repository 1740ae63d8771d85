use crate::aggregate::{Summarize, Summary};
use crate::commands::{open_view, CmdMessage, CmdResult, Listing, ViewQuery};
use crate::error::Result;
use crate::model::RecordId;
use crate::view::{Layout, SelectionPolicy, Tabulate};

/// List the records passing `query`.
///
/// `selected` marks rows as selected. The summary covers the whole dataset.
pub fn run<R: Tabulate + Summarize>(
    records: Vec<R>,
    query: &ViewQuery,
    selected: &[RecordId],
    policy: SelectionPolicy,
    default_layout: Layout,
) -> Result<CmdResult> {
    let mut view = open_view(records, query, policy, default_layout)?;
    for id in selected {
        if !view.selection().contains(*id) {
            view.toggle(*id)?;
        }
    }

    let listing = Listing::from_view(&view);
    let metrics = view.summary().metrics();
    let mut result = CmdResult::default();

    if listing.rows.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No {} match the current filters",
            R::KIND.plural()
        )));
    } else if listing.rows.len() < listing.total {
        result.add_message(CmdMessage::info(format!(
            "Showing {} of {}",
            listing.rows.len(),
            R::KIND.count_label(listing.total)
        )));
    }

    Ok(result.with_listing(listing).with_metrics(metrics))
}
