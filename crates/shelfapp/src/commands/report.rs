use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reports::{build_report, export_report, DateRange, ExportFormat, ReportKind};
use crate::store::DatasetProvider;
use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub range: DateRange,
    pub format: ExportFormat,
}

/// Build a report over the full datasets and export it into `dir`.
///
/// With [`ExportFormat::Print`] nothing is written; the report is returned
/// for the caller to render.
pub fn run<D: DatasetProvider + ?Sized>(
    provider: &D,
    request: &ReportRequest,
    today: NaiveDate,
    dir: &Path,
) -> Result<CmdResult> {
    let report = build_report(
        request.kind,
        request.range,
        today,
        &provider.ebooks()?,
        &provider.fines()?,
        &provider.reservations()?,
    );

    let mut result = CmdResult::default();
    if let Some(path) = export_report(&report, dir, request.format)? {
        result.add_message(CmdMessage::success(format!(
            "{} exported to {}",
            report.title,
            path.display()
        )));
        result.paths.push(path);
    }
    result.report = Some(report);
    Ok(result)
}
