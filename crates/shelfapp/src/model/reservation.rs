use super::{Record, RecordId, RecordKind};
use crate::fields::{FieldKind, FieldSpec, FieldValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A member's hold on a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: RecordId,
    pub member_name: String,
    pub member_id: String,
    pub book_title: String,
    pub book_id: String,
    pub isbn: String,
    pub reservation_date: NaiveDate,
    #[serde(default)]
    pub pickup_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    /// "Pending", "Ready for Pickup", "Completed", "Cancelled"
    pub status: String,
    #[serde(default)]
    pub queue_position: u32,
    #[serde(default)]
    pub estimated_wait: String,
    #[serde(default)]
    pub notes: String,
}

const RESERVATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("member_name", FieldKind::Text).searchable(),
    FieldSpec::new("member_id", FieldKind::Text).searchable(),
    FieldSpec::new("book_title", FieldKind::Text).searchable(),
    FieldSpec::new("isbn", FieldKind::Text).searchable(),
    FieldSpec::new("book_id", FieldKind::Text),
    FieldSpec::new("status", FieldKind::Category).facet(),
    FieldSpec::new("queue_position", FieldKind::Number),
    FieldSpec::new("reservation_date", FieldKind::Date),
    FieldSpec::new("pickup_date", FieldKind::Date),
    FieldSpec::new("expiry_date", FieldKind::Date),
];

impl Record for Reservation {
    const KIND: RecordKind = RecordKind::Reservation;
    const FIELDS: &'static [FieldSpec] = RESERVATION_FIELDS;

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match name {
            "member_name" => FieldValue::Text(&self.member_name),
            "member_id" => FieldValue::Text(&self.member_id),
            "book_title" => FieldValue::Text(&self.book_title),
            "isbn" => FieldValue::Text(&self.isbn),
            "book_id" => FieldValue::Text(&self.book_id),
            "status" => FieldValue::Text(&self.status),
            "queue_position" => FieldValue::Number(f64::from(self.queue_position)),
            "reservation_date" => FieldValue::Date(Some(self.reservation_date)),
            "pickup_date" => FieldValue::Date(self.pickup_date),
            "expiry_date" => FieldValue::Date(Some(self.expiry_date)),
            _ => return None,
        };
        Some(value)
    }

    fn label(&self) -> String {
        format!("{} for {}", self.book_title, self.member_name)
    }
}
