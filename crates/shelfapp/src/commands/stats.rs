use crate::aggregate::{Summarize, Summary};
use crate::commands::CmdResult;
use crate::error::Result;

/// Summary metrics over the full dataset.
pub fn run<R: Summarize>(records: &[R]) -> Result<CmdResult> {
    let summary = R::summarize(records);
    Ok(CmdResult::default().with_metrics(summary.metrics()))
}
