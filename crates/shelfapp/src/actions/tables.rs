//! Built-in action tables, one per record kind.

use super::{ActionScope, ActionSpec};
use crate::model::RecordKind;

const FINE_ACTIONS: &[ActionSpec] = &[
    ActionSpec::bulk("export", "Exporting {}"),
    ActionSpec::bulk("reminder", "Sending reminder for {}"),
    ActionSpec::bulk("waive", "Waiving {}").confirm("Waive selected {}?"),
    ActionSpec::bulk("process", "Processing payments for {}"),
    ActionSpec::row("pay", "Processing payment of {amount} for {}").with_amount(),
];

const RESERVATION_ACTIONS: &[ActionSpec] = &[
    ActionSpec::row("mark-ready", "Marking {} as ready for pickup"),
    ActionSpec::row("mark-complete", "Marking {} as completed"),
    ActionSpec::row("cancel", "Cancelled reservation {}").confirm("Cancel reservation {}?"),
    ActionSpec::row("notify", "Notifying member about {}"),
    ActionSpec::bulk("notify", "Notifying members of {}"),
    ActionSpec::bulk("cancel", "Cancelled {}").confirm("Cancel {}?"),
];

const EBOOK_ACTIONS: &[ActionSpec] = &[
    ActionSpec::row("download", "Starting download of {}"),
    ActionSpec::row("preview", "Opening preview of {}"),
    ActionSpec::row("edit", "Editing {}"),
];

/// The actions a list page offers for a record kind.
pub fn builtin_actions(kind: RecordKind) -> &'static [ActionSpec] {
    match kind {
        RecordKind::Ebook => EBOOK_ACTIONS,
        RecordKind::Fine => FINE_ACTIONS,
        RecordKind::Reservation => RESERVATION_ACTIONS,
    }
}

/// Look up an action by name and scope.
pub fn find_action(
    specs: &'static [ActionSpec],
    name: &str,
    scope: ActionScope,
) -> Option<&'static ActionSpec> {
    specs.iter().find(|s| s.name == name && s.scope == scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waive_and_cancel_need_confirmation() {
        let fines = builtin_actions(RecordKind::Fine);
        assert!(find_action(fines, "waive", ActionScope::Bulk).unwrap().requires_confirm());
        assert!(!find_action(fines, "export", ActionScope::Bulk).unwrap().requires_confirm());

        let reservations = builtin_actions(RecordKind::Reservation);
        assert!(find_action(reservations, "cancel", ActionScope::Row).unwrap().requires_confirm());
        assert!(find_action(reservations, "cancel", ActionScope::Bulk).unwrap().requires_confirm());
    }

    #[test]
    fn names_are_unique_per_scope() {
        for kind in RecordKind::all() {
            let specs = builtin_actions(*kind);
            for (i, a) in specs.iter().enumerate() {
                for b in &specs[i + 1..] {
                    assert!(!(a.name == b.name && a.scope == b.scope), "{} duplicated", a.name);
                }
            }
        }
    }

    #[test]
    fn ebooks_have_no_bulk_actions() {
        assert!(builtin_actions(RecordKind::Ebook)
            .iter()
            .all(|a| a.scope == ActionScope::Row));
    }
}
