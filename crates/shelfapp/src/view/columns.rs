//! Text cells for list rows and grid cards.

use crate::actions::format_amount;
use crate::fields::FieldValue;
use crate::model::{EBook, Fine, Record, Reservation};
use serde::Serialize;

/// A grid card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub subtitle: String,
    /// Short status shown in the card corner
    pub badge: String,
    pub details: Vec<String>,
}

/// Records that can be shown as table rows and as cards.
pub trait Tabulate: Record {
    fn columns() -> &'static [&'static str];

    /// One cell per column.
    fn cells(&self) -> Vec<String>;

    fn card(&self) -> Card;
}

fn date(value: Option<FieldValue<'_>>) -> String {
    value.map(|v| v.display()).unwrap_or_else(|| "-".to_string())
}

impl Tabulate for Fine {
    fn columns() -> &'static [&'static str] {
        &[
            "ID", "Member", "Book", "Type", "Amount", "Paid", "Remaining", "Progress", "Status",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.member_name.clone(),
            self.book_title.clone(),
            self.fine_type.clone(),
            self.fine_amount.to_string(),
            self.paid_amount.to_string(),
            self.remaining_amount.to_string(),
            format!("{}%", self.payment_percentage()),
            self.status.clone(),
        ]
    }

    fn card(&self) -> Card {
        Card {
            title: format!("#{} {}", self.id, self.member_name),
            subtitle: self.book_title.clone(),
            badge: self.status.clone(),
            details: vec![
                format!(
                    "{} of {} paid ({}%)",
                    format_amount(f64::from(self.paid_amount)),
                    self.fine_amount,
                    self.payment_percentage()
                ),
                format!("Due {}  {} days overdue", date(self.field("due_date")), self.days_overdue),
            ],
        }
    }
}

impl Tabulate for EBook {
    fn columns() -> &'static [&'static str] {
        &["ID", "Title", "Author", "Category", "Format", "Downloads", "Rating", "Copies"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.author.clone(),
            self.category.clone(),
            self.format.clone(),
            self.downloads.to_string(),
            format!("{:.1}", self.rating),
            format!("{}/{}", self.available_copies, self.total_copies),
        ]
    }

    fn card(&self) -> Card {
        let badge = if self.is_featured {
            "Featured"
        } else if self.is_available() {
            "Available"
        } else {
            "Unavailable"
        };
        Card {
            title: format!("#{} {}", self.id, self.title),
            subtitle: format!("{} ({})", self.author, self.year),
            badge: badge.to_string(),
            details: vec![
                format!("{}  {}  {}", self.category, self.format, self.size),
                format!("{} downloads  rating {:.1}", self.downloads, self.rating),
            ],
        }
    }
}

impl Tabulate for Reservation {
    fn columns() -> &'static [&'static str] {
        &["ID", "Member", "Book", "Status", "Queue", "Reserved", "Pickup", "Expires"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.member_name.clone(),
            self.book_title.clone(),
            self.status.clone(),
            self.queue_position.to_string(),
            date(self.field("reservation_date")),
            date(self.field("pickup_date")),
            date(self.field("expiry_date")),
        ]
    }

    fn card(&self) -> Card {
        let mut details = vec![format!(
            "Queue #{}  wait: {}",
            self.queue_position, self.estimated_wait
        )];
        if !self.notes.is_empty() {
            details.push(self.notes.clone());
        }
        Card {
            title: format!("#{} {}", self.id, self.book_title),
            subtitle: format!("{} ({})", self.member_name, self.member_id),
            badge: self.status.clone(),
            details,
        }
    }
}
