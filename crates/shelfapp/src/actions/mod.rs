//! # Row and Bulk Actions
//!
//! A list page offers two kinds of actions:
//!
//! - **Row actions** act on one record (`pay` a fine, `cancel` a
//!   reservation, `download` an e-book).
//! - **Bulk actions** act on the current [`Selection`] (`waive` the selected
//!   fines, `notify` the selected reservations).
//!
//! An [`ActionDispatcher`] maps `(name, scope)` to an [`ActionSpec`] and an
//! [`ActionHandler`]. The dispatcher validates the request, asks the
//! injected [`Confirm`] capability when the action is destructive, runs the
//! handler and reports an [`ActionOutcome`]. Handlers are collaborators
//! supplied by the caller; the dispatcher never mutates a dataset.
//!
//! Dispatch has no dedup: the same action dispatched twice runs twice.
//!
//! ## Validation
//!
//! | Condition | Result |
//! |-----------|--------|
//! | name not registered | `UnknownAction` |
//! | name registered only in the other scope | `ActionScope` |
//! | bulk action with empty selection | `EmptySelection` ("Please select fines first") |
//! | row action on an unknown id | `RecordNotFound` |
//! | action needs an amount, none given | `InvalidPaymentAmount` |
//!
//! A declined confirmation is an outcome, not an error.

use crate::error::{Result, ShelfError};
use crate::model::{find_record, Fine, Record, RecordId};
use crate::view::Selection;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

mod handlers;
mod tables;

pub use handlers::{ExportHandler, OutboxEntry, OutboxHandler};
pub use tables::{builtin_actions, find_action};

pub(crate) use handlers::unique_path;

/// Whether an action targets one record or the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionScope {
    Row,
    Bulk,
}

impl fmt::Display for ActionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionScope::Row => f.write_str("row"),
            ActionScope::Bulk => f.write_str("bulk"),
        }
    }
}

/// Static description of an action.
///
/// `message` and `prompt` are templates: `{}` is replaced with the target
/// (a record label or "3 fines") and `{amount}` with the request amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSpec {
    pub name: &'static str,
    pub scope: ActionScope,
    pub message: &'static str,
    pub prompt: Option<&'static str>,
    pub needs_amount: bool,
}

impl ActionSpec {
    pub const fn row(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            scope: ActionScope::Row,
            message,
            prompt: None,
            needs_amount: false,
        }
    }

    pub const fn bulk(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            scope: ActionScope::Bulk,
            message,
            prompt: None,
            needs_amount: false,
        }
    }

    /// Require confirmation with this prompt template.
    pub const fn confirm(mut self, prompt: &'static str) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub const fn with_amount(mut self) -> Self {
        self.needs_amount = true;
        self
    }

    pub fn requires_confirm(&self) -> bool {
        self.prompt.is_some()
    }
}

fn render(template: &str, target: &str, amount: Option<f64>) -> String {
    let text = template.replacen("{}", target, 1);
    match amount {
        Some(a) => text.replace("{amount}", &format_amount(a)),
        None => text,
    }
}

/// Whole amounts print without decimals.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{:.2}", amount)
    }
}

/// What a handler receives.
#[derive(Debug)]
pub struct ActionRequest<'a, R: Record> {
    pub action: &'a ActionSpec,
    /// Target records in dataset order
    pub records: Vec<&'a R>,
    pub amount: Option<f64>,
}

impl<'a, R: Record> ActionRequest<'a, R> {
    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id()).collect()
    }
}

/// Performs the effect of an action.
///
/// Returns the file the handler wrote to, if any.
pub trait ActionHandler<R: Record> {
    fn handle(&self, request: &ActionRequest<'_, R>) -> Result<Option<PathBuf>>;
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Confirms everything. Used for `--yes` and non-interactive callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Done,
    Declined,
}

/// The result of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub action: String,
    pub scope: ActionScope,
    pub status: OutcomeStatus,
    pub affected: Vec<RecordId>,
    pub message: String,
    pub artifact: Option<PathBuf>,
}

impl ActionOutcome {
    pub fn is_done(&self) -> bool {
        self.status == OutcomeStatus::Done
    }
}

struct Entry<R: Record> {
    spec: ActionSpec,
    handler: Arc<dyn ActionHandler<R>>,
}

/// Dispatch table: `(name, scope)` → spec + handler.
pub struct ActionDispatcher<R: Record> {
    entries: Vec<Entry<R>>,
}

impl<R: Record> Default for ActionDispatcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ActionDispatcher<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in table for `R`: `export` writes files, everything else
    /// goes to the outbox.
    pub fn builtin(export: ExportHandler, outbox: OutboxHandler) -> Self {
        let export: Arc<dyn ActionHandler<R>> = Arc::new(export);
        let outbox: Arc<dyn ActionHandler<R>> = Arc::new(outbox);
        let mut dispatcher = Self::new();
        for spec in builtin_actions(R::KIND) {
            let handler = if spec.name == "export" {
                Arc::clone(&export)
            } else {
                Arc::clone(&outbox)
            };
            dispatcher.entries.push(Entry {
                spec: spec.clone(),
                handler,
            });
        }
        dispatcher
    }

    /// Register (or replace) an action.
    pub fn register(mut self, spec: ActionSpec, handler: impl ActionHandler<R> + 'static) -> Self {
        self.entries
            .retain(|e| !(e.spec.name == spec.name && e.spec.scope == spec.scope));
        self.entries.push(Entry {
            spec,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn specs(&self) -> impl Iterator<Item = &ActionSpec> {
        self.entries.iter().map(|e| &e.spec)
    }

    fn lookup(&self, name: &str, scope: ActionScope) -> Result<&Entry<R>> {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.spec.name == name && e.spec.scope == scope)
        {
            return Ok(entry);
        }
        if self.entries.iter().any(|e| e.spec.name == name) {
            let target = match scope {
                ActionScope::Row => format!("a single {}", R::KIND.noun()),
                ActionScope::Bulk => format!("selected {}", R::KIND.plural()),
            };
            return Err(ShelfError::ActionScope {
                action: name.to_string(),
                target,
            });
        }
        Err(ShelfError::UnknownAction(name.to_string()))
    }

    /// Run a row action on record `id`.
    pub fn dispatch_row(
        &self,
        records: &[R],
        name: &str,
        id: RecordId,
        amount: Option<f64>,
        confirm: &mut dyn Confirm,
    ) -> Result<ActionOutcome> {
        let entry = self.lookup(name, ActionScope::Row)?;
        let record = find_record(records, id).ok_or(ShelfError::RecordNotFound(id))?;
        let target = record.label();
        self.run(entry, vec![record], &target, amount, confirm)
    }

    /// Run a bulk action on every selected record.
    ///
    /// Selected ids that are hidden by the current filter are included.
    pub fn dispatch_bulk(
        &self,
        records: &[R],
        name: &str,
        selection: &Selection,
        confirm: &mut dyn Confirm,
    ) -> Result<ActionOutcome> {
        let entry = self.lookup(name, ActionScope::Bulk)?;
        if selection.is_empty() {
            return Err(ShelfError::EmptySelection(R::KIND.plural().to_string()));
        }
        let targets = selection
            .ids()
            .into_iter()
            .map(|id| find_record(records, id).ok_or(ShelfError::RecordNotFound(id)))
            .collect::<Result<Vec<_>>>()?;
        let target = R::KIND.count_label(targets.len());
        self.run(entry, targets, &target, None, confirm)
    }

    fn run(
        &self,
        entry: &Entry<R>,
        records: Vec<&R>,
        target: &str,
        amount: Option<f64>,
        confirm: &mut dyn Confirm,
    ) -> Result<ActionOutcome> {
        let spec = &entry.spec;
        if spec.needs_amount {
            let amount = amount.ok_or(ShelfError::InvalidPaymentAmount)?;
            for record in &records {
                check_amount(amount, record.balance())?;
            }
        }
        let affected: Vec<RecordId> = records.iter().map(|r| r.id()).collect();

        if let Some(prompt) = spec.prompt {
            let question = match spec.scope {
                ActionScope::Row => render(prompt, &format!("for {}", target), amount),
                ActionScope::Bulk => render(prompt, target, amount),
            };
            if !confirm.confirm(&question) {
                log::info!("{} declined for {:?}", spec.name, affected);
                return Ok(ActionOutcome {
                    action: spec.name.to_string(),
                    scope: spec.scope,
                    status: OutcomeStatus::Declined,
                    affected: Vec::new(),
                    message: format!("{} cancelled", spec.name),
                    artifact: None,
                });
            }
        }

        let request = ActionRequest {
            action: spec,
            records,
            amount,
        };
        let artifact = entry.handler.handle(&request)?;
        log::info!("dispatched {} {} on {:?}", spec.scope, spec.name, affected);
        Ok(ActionOutcome {
            action: spec.name.to_string(),
            scope: spec.scope,
            status: OutcomeStatus::Done,
            affected,
            message: render(spec.message, target, amount),
            artifact,
        })
    }
}

/// Check a payment against a fine's outstanding balance.
///
/// The amount must be a positive whole number no larger than
/// `remaining_amount`. Balances are kept in whole currency units.
pub fn validate_payment(fine: &Fine, amount: f64) -> Result<f64> {
    check_amount(amount, fine.balance())
}

fn check_amount(amount: f64, balance: Option<u32>) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 || amount.fract() != 0.0 {
        return Err(ShelfError::InvalidPaymentAmount);
    }
    if let Some(remaining) = balance {
        if amount > f64::from(remaining) {
            return Err(ShelfError::PaymentExceedsBalance { remaining });
        }
    }
    Ok(amount)
}
