//! # Reports
//!
//! Reports combine the three datasets into metrics and chart series. Each
//! chart point carries its share of the chart total, so renderers can draw
//! proportional bars without doing arithmetic.
//!
//! A [`DateRange`] narrows the date-bearing records before aggregation:
//! fines by borrow date, reservations by reservation date. E-books have no
//! date and are always included.

use crate::actions::unique_path;
use crate::aggregate::{percentage, Metric, Summarize, Summary};
use crate::error::{Result, ShelfError};
use crate::model::{EBook, Fine, Reservation};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Overview,
    Financial,
    Inventory,
    Reservations,
}

impl ReportKind {
    pub fn all() -> &'static [ReportKind] {
        &[
            ReportKind::Overview,
            ReportKind::Financial,
            ReportKind::Inventory,
            ReportKind::Reservations,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Overview => "overview",
            ReportKind::Financial => "financial",
            ReportKind::Inventory => "inventory",
            ReportKind::Reservations => "reservations",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Overview => "Library Overview",
            ReportKind::Financial => "Financial Report",
            ReportKind::Inventory => "Inventory Report",
            ReportKind::Reservations => "Reservations Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ReportKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown report: {}", s))
    }
}

/// Reporting period, resolved against a reference day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    /// No date restriction
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// A custom range. `start` must not be after `end`.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ShelfError::DateRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(DateRange::Custom { start, end })
    }

    /// Parse "week", "month", ... or "YYYY-MM-DD..YYYY-MM-DD".
    pub fn parse(input: &str) -> Result<Self> {
        match input.to_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "quarter" => Ok(DateRange::Quarter),
            "year" => Ok(DateRange::Year),
            other => {
                let (start, end) = other.split_once("..").ok_or_else(|| {
                    ShelfError::DateRange(format!(
                        "'{}' is not all, week, month, quarter, year or START..END",
                        input
                    ))
                })?;
                DateRange::custom(parse_date(start)?, parse_date(end)?)
            }
        }
    }

    /// Inclusive bounds for this range ending `today`.
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let back = |months: u32| today.checked_sub_months(Months::new(months));
        match *self {
            DateRange::All => (None, None),
            DateRange::Week => (Some(today - Duration::days(6)), Some(today)),
            DateRange::Month => (back(1), Some(today)),
            DateRange::Quarter => (back(3), Some(today)),
            DateRange::Year => (NaiveDate::from_ymd_opt(today.year(), 1, 1), Some(today)),
            DateRange::Custom { start, end } => (Some(start), Some(end)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DateRange::All => "All time".into(),
            DateRange::Week => "This week".into(),
            DateRange::Month => "This month".into(),
            DateRange::Quarter => "This quarter".into(),
            DateRange::Year => "This year".into(),
            DateRange::Custom { start, end } => format!("{} to {}", start, end),
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ShelfError::DateRange(format!("'{}': {}", s, e)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub label: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    /// Percent of the chart total
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl Chart {
    pub fn new(title: impl Into<String>, values: Vec<(String, f64)>) -> Self {
        let total: f64 = values.iter().map(|(_, v)| v).sum();
        let points = values
            .into_iter()
            .map(|(label, value)| ChartPoint {
                share: percentage(value, total),
                label,
                value,
            })
            .collect();
        Self {
            title: title.into(),
            points,
        }
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

fn one<T>(_: &T) -> f64 {
    1.0
}

/// Sum `value` per `key`, in first-seen key order.
fn group<T>(items: &[T], key: impl Fn(&T) -> &str, value: impl Fn(&T) -> f64) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(label, _)| label == k) {
            Some((_, sum)) => *sum += value(item),
            None => groups.push((k.to_string(), value(item))),
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    pub metrics: Vec<Metric>,
    pub charts: Vec<Chart>,
}

/// Build a report from full datasets.
pub fn build_report(
    kind: ReportKind,
    range: DateRange,
    today: NaiveDate,
    ebooks: &[EBook],
    fines: &[Fine],
    reservations: &[Reservation],
) -> Report {
    let (start, end) = range.bounds(today);
    let period = Period {
        label: range.label(),
        start,
        end,
    };
    let fines: Vec<Fine> = fines
        .iter()
        .filter(|f| period.contains(f.borrow_date))
        .cloned()
        .collect();
    let reservations: Vec<Reservation> = reservations
        .iter()
        .filter(|r| period.contains(r.reservation_date))
        .cloned()
        .collect();

    let (metrics, charts) = match kind {
        ReportKind::Overview => {
            let mut metrics = EBook::summarize(ebooks).metrics();
            metrics.extend(Fine::summarize(&fines).metrics());
            metrics.extend(Reservation::summarize(&reservations).metrics());
            let charts = vec![
                Chart::new("E-books by category", group(ebooks, |b| b.category.as_str(), one)),
                Chart::new("Fines by status", group(&fines, |f| f.status.as_str(), one)),
                Chart::new(
                    "Reservations by status",
                    group(&reservations, |r| r.status.as_str(), one),
                ),
            ];
            (metrics, charts)
        }
        ReportKind::Financial => {
            let charged: Vec<Fine> = fines.iter().filter(|f| f.fine_amount > 0).cloned().collect();
            let charts = vec![
                Chart::new(
                    "Fine amount by type",
                    group(&charged, |f| f.fine_type.as_str(), |f| f64::from(f.fine_amount)),
                ),
                Chart::new(
                    "Fine amount by status",
                    group(&charged, |f| f.status.as_str(), |f| f64::from(f.fine_amount)),
                ),
                Chart::new(
                    "Outstanding by member",
                    group(&charged, |f| f.member_name.as_str(), |f| f64::from(f.remaining_amount))
                        .into_iter()
                        .filter(|(_, v)| *v > 0.0)
                        .collect(),
                ),
            ];
            (Fine::summarize(&fines).metrics(), charts)
        }
        ReportKind::Inventory => {
            let charts = vec![
                Chart::new("Titles by category", group(ebooks, |b| b.category.as_str(), one)),
                Chart::new(
                    "Downloads by category",
                    group(ebooks, |b| b.category.as_str(), |b| b.downloads as f64),
                ),
                Chart::new("Titles by format", group(ebooks, |b| b.format.as_str(), one)),
            ];
            (EBook::summarize(ebooks).metrics(), charts)
        }
        ReportKind::Reservations => {
            let charts = vec![
                Chart::new("Reservations by status", group(&reservations, |r| r.status.as_str(), one)),
                Chart::new(
                    "Reservations by title",
                    group(&reservations, |r| r.book_title.as_str(), one),
                ),
            ];
            (Reservation::summarize(&reservations).metrics(), charts)
        }
    };

    Report {
        kind,
        title: kind.title().to_string(),
        period,
        generated_at: Utc::now(),
        metrics,
        charts,
    }
}

/// Output format of an exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    /// Render to the terminal; nothing is written
    Print,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "print" => Ok(ExportFormat::Print),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Flatten a report to `section,label,value,share` rows.
pub fn render_csv(report: &Report) -> String {
    let mut out = String::from("section,label,value,share\n");
    for metric in &report.metrics {
        out.push_str(&format!(
            "metrics,{},{},\n",
            csv_field(metric.label),
            csv_field(&metric.value)
        ));
    }
    for chart in &report.charts {
        for point in &chart.points {
            out.push_str(&format!(
                "{},{},{},{:.1}\n",
                csv_field(&chart.title),
                csv_field(&point.label),
                point.value,
                point.share
            ));
        }
    }
    out
}

/// Write `report` into `dir` as `<kind>-report-<timestamp>.<ext>`.
///
/// Returns `None` for [`ExportFormat::Print`].
pub fn export_report(report: &Report, dir: &Path, format: ExportFormat) -> Result<Option<PathBuf>> {
    let (ext, content) = match format {
        ExportFormat::Json => ("json", serde_json::to_string_pretty(report)?),
        ExportFormat::Csv => ("csv", render_csv(report)),
        ExportFormat::Print => return Ok(None),
    };
    fs::create_dir_all(dir)?;
    let stem = format!(
        "{}-report-{}",
        report.kind,
        report.generated_at.format("%Y-%m-%d_%H-%M-%S")
    );
    let path = unique_path(dir, &stem, ext);
    fs::write(&path, content)?;
    log::info!("{} report written to {}", report.kind, path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{sample_ebooks, sample_fines, sample_reservations};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn report(kind: ReportKind, range: DateRange) -> Report {
        build_report(
            kind,
            range,
            today(),
            &sample_ebooks(),
            &sample_fines(),
            &sample_reservations(),
        )
    }

    #[test]
    fn chart_shares_sum_to_hundred() {
        let report = report(ReportKind::Financial, DateRange::All);
        let by_type = &report.charts[0];
        assert_eq!(by_type.total(), 1300.0);
        let sum: f64 = by_type.points.iter().map(|p| p.share).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        // "None" fines carry no amount and are left out
        assert!(by_type.points.iter().all(|p| p.label != "None"));
    }

    #[test]
    fn empty_chart_has_zero_shares() {
        let chart = Chart::new("empty", vec![("a".into(), 0.0), ("b".into(), 0.0)]);
        assert!(chart.points.iter().all(|p| p.share == 0.0));
    }

    #[test]
    fn inventory_groups_by_category() {
        let report = report(ReportKind::Inventory, DateRange::All);
        let titles = &report.charts[0];
        let dystopian = titles.points.iter().find(|p| p.label == "Dystopian").unwrap();
        assert_eq!(dystopian.value, 2.0);
        assert_eq!(dystopian.share, 25.0);
    }

    #[test]
    fn range_filters_dated_records() {
        let range = DateRange::parse("2024-01-15..2024-01-20").unwrap();
        let report = report(ReportKind::Reservations, range);
        // reservations on 01-18, 01-19, 01-20
        let total = report.metrics.iter().find(|m| m.label == "Total reservations").unwrap();
        assert_eq!(total.value, "3");
        assert_eq!(report.period.label, "2024-01-15 to 2024-01-20");
    }

    #[test]
    fn week_range_bounds() {
        let (start, end) = DateRange::Week.bounds(today());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 25));
        assert_eq!(end, Some(today()));
        let (start, _) = DateRange::Year.bounds(today());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn custom_range_must_be_ordered() {
        assert!(matches!(
            DateRange::parse("2024-02-01..2024-01-01"),
            Err(ShelfError::DateRange(_))
        ));
        assert!(DateRange::parse("2024-02-30..2024-03-01").is_err());
        assert!(DateRange::parse("fortnight").is_err());
        assert_eq!(DateRange::parse("Month").unwrap(), DateRange::Month);
    }

    #[test]
    fn csv_quotes_special_fields() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn exports_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let report = report(ReportKind::Overview, DateRange::All);

        let json = export_report(&report, dir.path(), ExportFormat::Json).unwrap().unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed["kind"], "overview");

        let csv = export_report(&report, dir.path(), ExportFormat::Csv).unwrap().unwrap();
        let text = fs::read_to_string(&csv).unwrap();
        assert!(text.starts_with("section,label,value,share\n"));
        assert!(text.contains("metrics,Total e-books,8,"));

        assert!(export_report(&report, dir.path(), ExportFormat::Print).unwrap().is_none());
    }
}
