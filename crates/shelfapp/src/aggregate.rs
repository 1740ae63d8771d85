//! # Aggregates
//!
//! Summary statistics over a full dataset. Aggregates never see the filter:
//! the cards above a list page show totals for the whole collection while
//! the list below it is narrowed.

use crate::model::{EBook, Fine, Record, Reservation};
use serde::Serialize;

/// `part / whole × 100`, or 0 when `whole` is 0.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// One named scalar of a summary, preformatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

impl Metric {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// A computed summary that can be listed as metrics.
pub trait Summary: Serialize {
    fn metrics(&self) -> Vec<Metric>;
}

/// Record kinds that have a summary.
pub trait Summarize: Record {
    type Summary: Summary + Clone + PartialEq + std::fmt::Debug;

    fn summarize(records: &[Self]) -> Self::Summary;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FineSummary {
    /// Fines with a non-zero amount
    pub total_fines: usize,
    pub total_amount: u64,
    pub total_paid: u64,
    pub total_pending: u64,
    pub overdue: usize,
    pub pending: usize,
    /// Paid share of all fines, in percent
    pub collection_rate: f64,
}

impl Summary for FineSummary {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::new("Total fines", self.total_fines),
            Metric::new("Total amount", self.total_amount),
            Metric::new("Collected", self.total_paid),
            Metric::new("Pending", self.total_pending),
            Metric::new("Overdue", self.overdue),
            Metric::new("Awaiting payment", self.pending),
            Metric::new("Collection rate", format!("{:.1}%", self.collection_rate)),
        ]
    }
}

impl Summarize for Fine {
    type Summary = FineSummary;

    fn summarize(fines: &[Fine]) -> FineSummary {
        let total_amount: u64 = fines.iter().map(|f| u64::from(f.fine_amount)).sum();
        let total_paid: u64 = fines.iter().map(|f| u64::from(f.paid_amount)).sum();
        FineSummary {
            total_fines: fines.iter().filter(|f| f.fine_amount > 0).count(),
            total_amount,
            total_paid,
            total_pending: fines.iter().map(|f| u64::from(f.remaining_amount)).sum(),
            overdue: fines.iter().filter(|f| f.status == "Overdue").count(),
            pending: fines.iter().filter(|f| f.status == "Pending").count(),
            collection_rate: percentage(total_paid as f64, total_amount as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EBookSummary {
    pub total: usize,
    pub total_downloads: u64,
    /// Titles with at least one copy available
    pub available: usize,
    pub featured: usize,
}

impl Summary for EBookSummary {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::new("Total e-books", self.total),
            Metric::new("Downloads", self.total_downloads),
            Metric::new("Available", self.available),
            Metric::new("Featured", self.featured),
        ]
    }
}

impl Summarize for EBook {
    type Summary = EBookSummary;

    fn summarize(books: &[EBook]) -> EBookSummary {
        EBookSummary {
            total: books.len(),
            total_downloads: books.iter().map(|b| b.downloads).sum(),
            available: books.iter().filter(|b| b.is_available()).count(),
            featured: books.iter().filter(|b| b.is_featured).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationSummary {
    pub total: usize,
    pub pending: usize,
    pub ready_for_pickup: usize,
    pub completed: usize,
}

impl Summary for ReservationSummary {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::new("Total reservations", self.total),
            Metric::new("Pending", self.pending),
            Metric::new("Ready for pickup", self.ready_for_pickup),
            Metric::new("Completed", self.completed),
        ]
    }
}

impl Summarize for Reservation {
    type Summary = ReservationSummary;

    fn summarize(reservations: &[Reservation]) -> ReservationSummary {
        let count = |status: &str| reservations.iter().filter(|r| r.status == status).count();
        ReservationSummary {
            total: reservations.len(),
            pending: count("Pending"),
            ready_for_pickup: count("Ready for Pickup"),
            completed: count("Completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{sample_ebooks, sample_fines, sample_reservations};

    #[test]
    fn percentage_of_zero_is_zero() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }

    #[test]
    fn fine_summary_over_sample() {
        let summary = Fine::summarize(&sample_fines());
        assert_eq!(summary.total_fines, 7);
        assert_eq!(summary.total_amount, 1300);
        assert_eq!(summary.total_paid, 450);
        assert_eq!(summary.total_pending, 850);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.pending, 2);
        assert!((summary.collection_rate - 34.615).abs() < 0.01);
    }

    #[test]
    fn total_pending_is_sum_of_remaining() {
        let fines = sample_fines();
        let expected: u64 = fines.iter().map(|f| u64::from(f.remaining_amount)).sum();
        assert_eq!(Fine::summarize(&fines).total_pending, expected);
    }

    #[test]
    fn empty_fines_have_zero_rate() {
        let summary = Fine::summarize(&[]);
        assert_eq!(summary.total_amount, 0);
        assert_eq!(summary.collection_rate, 0.0);
        assert!(!summary.collection_rate.is_nan());
    }

    #[test]
    fn ebook_summary_over_sample() {
        let summary = EBook::summarize(&sample_ebooks());
        assert_eq!(summary.total, 8);
        assert_eq!(summary.total_downloads, 16060);
        assert_eq!(summary.available, 8);
        assert_eq!(summary.featured, 3);
    }

    #[test]
    fn reservation_summary_over_sample() {
        let summary = Reservation::summarize(&sample_reservations());
        assert_eq!(
            summary,
            ReservationSummary {
                total: 7,
                pending: 3,
                ready_for_pickup: 2,
                completed: 1,
            }
        );
    }

    #[test]
    fn metrics_format_rate() {
        let metrics = Fine::summarize(&sample_fines()).metrics();
        let rate = metrics.iter().find(|m| m.label == "Collection rate").unwrap();
        assert_eq!(rate.value, "34.6%");
    }
}
