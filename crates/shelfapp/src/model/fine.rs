use super::{Record, RecordId, RecordKind};
use crate::fields::{FieldKind, FieldSpec, FieldValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A payment made against a fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub date: NaiveDate,
    pub amount: u32,
    pub method: String,
}

/// A fine issued to a member for a late, damaged or lost book.
///
/// Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fine {
    pub id: RecordId,
    pub member_id: String,
    pub member_name: String,
    pub member_email: String,
    pub book_title: String,
    pub book_id: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    pub fine_amount: u32,
    pub paid_amount: u32,
    pub remaining_amount: u32,
    /// "Settled", "Partially Paid", "Overdue", "Pending", "No Fine"
    pub status: String,
    /// "Late Return", "Damage", "Lost Book", or "None"
    pub fine_type: String,
    #[serde(default)]
    pub days_overdue: u32,
    #[serde(default)]
    pub fine_per_day: u32,
    #[serde(default)]
    pub issued_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_history: Vec<Payment>,
}

const FINE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("member_name", FieldKind::Text).searchable(),
    FieldSpec::new("member_email", FieldKind::Text).searchable(),
    FieldSpec::new("member_id", FieldKind::Text).searchable(),
    FieldSpec::new("book_title", FieldKind::Text).searchable(),
    FieldSpec::new("book_id", FieldKind::Text).searchable(),
    FieldSpec::new("status", FieldKind::Category).facet(),
    FieldSpec::new("fine_type", FieldKind::Category)
        .facet()
        .omit_option("None"),
    FieldSpec::new("fine_amount", FieldKind::Number),
    FieldSpec::new("paid_amount", FieldKind::Number),
    FieldSpec::new("remaining_amount", FieldKind::Number),
    FieldSpec::new("days_overdue", FieldKind::Number),
    FieldSpec::new("borrow_date", FieldKind::Date),
    FieldSpec::new("due_date", FieldKind::Date),
    FieldSpec::new("return_date", FieldKind::Date),
    FieldSpec::new("issued_date", FieldKind::Date),
];

impl Fine {
    /// Share of the fine already paid, rounded to a whole percent.
    ///
    /// A zero fine counts as fully paid.
    pub fn payment_percentage(&self) -> u32 {
        if self.fine_amount == 0 {
            return 100;
        }
        (f64::from(self.paid_amount) / f64::from(self.fine_amount) * 100.0).round() as u32
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_amount == 0
    }
}

impl Record for Fine {
    const KIND: RecordKind = RecordKind::Fine;
    const FIELDS: &'static [FieldSpec] = FINE_FIELDS;

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match name {
            "member_name" => FieldValue::Text(&self.member_name),
            "member_email" => FieldValue::Text(&self.member_email),
            "member_id" => FieldValue::Text(&self.member_id),
            "book_title" => FieldValue::Text(&self.book_title),
            "book_id" => FieldValue::Text(&self.book_id),
            "status" => FieldValue::Text(&self.status),
            "fine_type" => FieldValue::Text(&self.fine_type),
            "fine_amount" => FieldValue::Number(f64::from(self.fine_amount)),
            "paid_amount" => FieldValue::Number(f64::from(self.paid_amount)),
            "remaining_amount" => FieldValue::Number(f64::from(self.remaining_amount)),
            "days_overdue" => FieldValue::Number(f64::from(self.days_overdue)),
            "borrow_date" => FieldValue::Date(Some(self.borrow_date)),
            "due_date" => FieldValue::Date(Some(self.due_date)),
            "return_date" => FieldValue::Date(self.return_date),
            "issued_date" => FieldValue::Date(self.issued_date),
            _ => return None,
        };
        Some(value)
    }

    fn label(&self) -> String {
        format!("fine #{} ({})", self.id, self.member_name)
    }

    fn balance(&self) -> Option<u32> {
        Some(self.remaining_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::sample_fines;

    #[test]
    fn payment_percentage_rounds() {
        let fines = sample_fines();
        // 100 of 150 paid
        assert_eq!(fines[0].payment_percentage(), 67);
        // settled in full
        assert_eq!(fines[1].payment_percentage(), 100);
        // nothing paid
        assert_eq!(fines[2].payment_percentage(), 0);
    }

    #[test]
    fn zero_fine_counts_as_paid() {
        let fines = sample_fines();
        let no_fine = fines.iter().find(|f| f.fine_amount == 0).unwrap();
        assert_eq!(no_fine.payment_percentage(), 100);
        assert!(no_fine.is_settled());
    }

    #[test]
    fn field_lookup_by_name() {
        let fine = &sample_fines()[2];
        assert_eq!(fine.field("status"), Some(FieldValue::Text("Overdue")));
        assert_eq!(
            fine.field("remaining_amount"),
            Some(FieldValue::Number(250.0))
        );
        assert!(fine.field("colour").is_none());
    }

    #[test]
    fn deserializes_camel_case_with_missing_optionals() {
        let json = r#"{
            "id": 9, "memberId": "MEM1", "memberName": "Ann", "memberEmail": "a@x.org",
            "bookTitle": "Dune", "bookId": "BK9", "borrowDate": "2024-02-01",
            "dueDate": "2024-02-08", "fineAmount": 50, "paidAmount": 0,
            "remainingAmount": 50, "status": "Pending", "fineType": "Late Return"
        }"#;
        let fine: Fine = serde_json::from_str(json).unwrap();
        assert_eq!(fine.remaining_amount, 50);
        assert!(fine.return_date.is_none());
        assert!(fine.payment_history.is_empty());
    }
}
