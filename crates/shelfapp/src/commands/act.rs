//! # Row and Bulk Actions
//!
//! `shelf act fines waive 2 5` and `shelf act reservations cancel 4` share
//! one entry point. The scope is decided from the request:
//!
//! - exactly one id, no `--all`, and a row action with that name exists:
//!   row dispatch on that record
//! - otherwise: bulk dispatch on the selection built from the ids and, with
//!   `--all`, every record the filters show
//!
//! Selected ids hidden by the filters stay in the selection; the filters
//! only decide what `--all` adds.

use crate::actions::{ActionDispatcher, ActionScope, Confirm, OutcomeStatus};
use crate::commands::{open_view, CmdMessage, CmdResult, ViewQuery};
use crate::error::Result;
use crate::model::{Record, RecordId};
use crate::view::{Layout, SelectionPolicy};

#[derive(Debug, Clone, Default)]
pub struct ActRequest {
    pub action: String,
    pub ids: Vec<RecordId>,
    /// Select every visible record
    pub all: bool,
    /// Filters that decide what `all` covers
    pub query: ViewQuery,
    pub amount: Option<f64>,
}

pub fn run<R: Record>(
    records: Vec<R>,
    request: &ActRequest,
    dispatcher: &ActionDispatcher<R>,
    confirm: &mut dyn Confirm,
    policy: SelectionPolicy,
) -> Result<CmdResult> {
    let has_row_action = dispatcher
        .specs()
        .any(|s| s.name == request.action && s.scope == ActionScope::Row);

    let outcome = if has_row_action && request.ids.len() == 1 && !request.all {
        dispatcher.dispatch_row(&records, &request.action, request.ids[0], request.amount, confirm)?
    } else {
        let mut view = open_view(records, &request.query, policy, Layout::default())?;
        if request.all {
            view.select_all_visible();
        }
        for id in &request.ids {
            if !view.selection().contains(*id) {
                view.toggle(*id)?;
            }
        }
        dispatcher.dispatch_bulk(view.records(), &request.action, view.selection(), confirm)?
    };

    let mut result = CmdResult::default();
    match outcome.status {
        OutcomeStatus::Done => result.add_message(CmdMessage::success(outcome.message.clone())),
        OutcomeStatus::Declined => result.add_message(CmdMessage::info(outcome.message.clone())),
    }
    if let Some(path) = &outcome.artifact {
        result.paths.push(path.clone());
    }
    result.outcome = Some(outcome);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{AlwaysConfirm, ExportHandler, OutboxHandler};
    use crate::error::ShelfError;
    use crate::model::{Fine, Reservation};
    use crate::store::fixtures::{sample_fines, sample_reservations};
    use tempfile::tempdir;

    fn dispatcher<R: Record>(dir: &std::path::Path) -> ActionDispatcher<R> {
        ActionDispatcher::builtin(
            ExportHandler::new(dir.join("exports")),
            OutboxHandler::new(dir.join("outbox.jsonl")),
        )
    }

    fn request(action: &str, ids: &[RecordId]) -> ActRequest {
        ActRequest {
            action: action.to_string(),
            ids: ids.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn single_id_with_row_action_runs_row_scope() {
        let dir = tempdir().unwrap();
        let result = run(
            sample_reservations(),
            &request("mark-ready", &[2]),
            &dispatcher::<Reservation>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap();
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.scope, ActionScope::Row);
        assert_eq!(outcome.affected, vec![2]);
        assert_eq!(result.messages[0].level, crate::commands::MessageLevel::Success);
    }

    #[test]
    fn cancel_with_two_ids_is_bulk() {
        let dir = tempdir().unwrap();
        let result = run(
            sample_reservations(),
            &request("cancel", &[2, 4]),
            &dispatcher::<Reservation>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap();
        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.scope, ActionScope::Bulk);
        assert_eq!(outcome.message, "Cancelled 2 reservations");
    }

    #[test]
    fn all_selects_visible_records() {
        let dir = tempdir().unwrap();
        let req = ActRequest {
            action: "reminder".into(),
            all: true,
            query: ViewQuery::new().facet("status", "Pending"),
            ..Default::default()
        };
        let result = run(
            sample_fines(),
            &req,
            &dispatcher::<Fine>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap();
        assert_eq!(result.outcome.unwrap().affected, vec![5, 6]);
    }

    #[test]
    fn hidden_ids_still_receive_bulk_action() {
        let dir = tempdir().unwrap();
        let req = ActRequest {
            action: "reminder".into(),
            ids: vec![1],
            all: true,
            query: ViewQuery::new().facet("status", "Pending"),
            ..Default::default()
        };
        let result = run(
            sample_fines(),
            &req,
            &dispatcher::<Fine>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap();
        assert_eq!(result.outcome.unwrap().affected, vec![1, 5, 6]);
    }

    #[test]
    fn bulk_without_selection_fails() {
        let dir = tempdir().unwrap();
        let err = run(
            sample_fines(),
            &request("waive", &[]),
            &dispatcher::<Fine>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Please select fines first");
    }

    #[test]
    fn declined_confirmation_is_reported() {
        let dir = tempdir().unwrap();
        let mut decline = |_: &str| false;
        let result = run(
            sample_fines(),
            &request("waive", &[3]),
            &dispatcher::<Fine>(dir.path()),
            &mut decline,
            SelectionPolicy::Sticky,
        )
        .unwrap();
        assert!(!result.outcome.unwrap().is_done());
        assert_eq!(result.messages[0].content, "waive cancelled");
        assert!(!dir.path().join("outbox.jsonl").exists());
    }

    #[test]
    fn export_returns_artifact_path() {
        let dir = tempdir().unwrap();
        let result = run(
            sample_fines(),
            &request("export", &[1, 2]),
            &dispatcher::<Fine>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap();
        assert_eq!(result.paths.len(), 1);
        assert!(result.paths[0].exists());
    }

    #[test]
    fn unknown_id_fails() {
        let dir = tempdir().unwrap();
        let err = run(
            sample_fines(),
            &request("export", &[1, 42]),
            &dispatcher::<Fine>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap_err();
        assert!(matches!(err, ShelfError::RecordNotFound(42)));
    }

    #[test]
    fn pay_through_act_is_checked_against_the_balance() {
        let dir = tempdir().unwrap();
        let req = ActRequest {
            action: "pay".into(),
            ids: vec![1],
            amount: Some(9999.0),
            ..Default::default()
        };
        let err = run(
            sample_fines(),
            &req,
            &dispatcher::<Fine>(dir.path()),
            &mut AlwaysConfirm,
            SelectionPolicy::Sticky,
        )
        .unwrap_err();
        assert!(matches!(err, ShelfError::PaymentExceedsBalance { remaining: 50 }));
        assert!(!dir.path().join("outbox.jsonl").exists());
    }
}
