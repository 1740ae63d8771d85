use crate::actions::{format_amount, validate_payment, ActionDispatcher, Confirm};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::{find_record, Fine, RecordId};

/// Record a payment of `amount` against fine `id`.
///
/// The amount is checked against the outstanding balance before anything
/// is dispatched. The fine itself is not changed here; the payment is queued
/// like every other action.
pub fn run(
    fines: &[Fine],
    id: RecordId,
    amount: f64,
    dispatcher: &ActionDispatcher<Fine>,
    confirm: &mut dyn Confirm,
) -> Result<CmdResult> {
    let fine = find_record(fines, id).ok_or(ShelfError::RecordNotFound(id))?;
    let amount = validate_payment(fine, amount)?;
    let outcome = dispatcher.dispatch_row(fines, "pay", id, Some(amount), confirm)?;

    let mut result = CmdResult::default();
    if outcome.is_done() {
        result.add_message(CmdMessage::success(outcome.message.clone()));
        let left = f64::from(fine.remaining_amount) - amount;
        if left > 0.0 {
            result.add_message(CmdMessage::info(format!(
                "{} will remain outstanding",
                format_amount(left)
            )));
        } else {
            result.add_message(CmdMessage::info(format!("Fine #{} will be settled", fine.id)));
        }
    } else {
        result.add_message(CmdMessage::info(outcome.message.clone()));
    }
    result.outcome = Some(outcome);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{AlwaysConfirm, ExportHandler, OutboxHandler};
    use crate::store::fixtures::sample_fines;
    use tempfile::tempdir;

    fn pay(id: RecordId, amount: f64) -> (tempfile::TempDir, Result<CmdResult>) {
        let dir = tempdir().unwrap();
        let outbox = OutboxHandler::new(dir.path().join("outbox.jsonl"));
        let dispatcher = ActionDispatcher::builtin(ExportHandler::new(dir.path()), outbox);
        let result = run(&sample_fines(), id, amount, &dispatcher, &mut AlwaysConfirm);
        (dir, result)
    }

    #[test]
    fn partial_payment_is_queued() {
        let (dir, result) = pay(3, 100.0);
        let result = result.unwrap();
        assert_eq!(
            result.messages[0].content,
            "Processing payment of 100 for fine #3 (Alice Brown)"
        );
        assert_eq!(result.messages[1].content, "150 will remain outstanding");

        let entries = OutboxHandler::new(dir.path().join("outbox.jsonl")).entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "pay");
        assert_eq!(entries[0].amount, Some(100.0));
    }

    #[test]
    fn full_payment_settles() {
        let (_dir, result) = pay(1, 50.0);
        assert_eq!(result.unwrap().messages[1].content, "Fine #1 will be settled");
    }

    #[test]
    fn overpayment_is_rejected() {
        let (dir, result) = pay(1, 60.0);
        assert!(matches!(
            result.unwrap_err(),
            ShelfError::PaymentExceedsBalance { remaining: 50 }
        ));
        assert!(!dir.path().join("outbox.jsonl").exists());
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(matches!(pay(3, 0.0).1.unwrap_err(), ShelfError::InvalidPaymentAmount));
        assert!(matches!(pay(3, -5.0).1.unwrap_err(), ShelfError::InvalidPaymentAmount));
    }

    #[test]
    fn unknown_fine() {
        assert!(matches!(pay(77, 10.0).1.unwrap_err(), ShelfError::RecordNotFound(77)));
    }
}
