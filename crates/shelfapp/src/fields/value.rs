//! Field value types.

use chrono::NaiveDate;

/// Runtime view of one field of a record.
///
/// Values borrow from the record so filtering a collection never clones
/// its strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Free text or category value
    Text(&'a str),

    /// Integer or decimal quantity
    Number(f64),

    /// Boolean flag
    Flag(bool),

    /// Optional calendar date
    Date(Option<NaiveDate>),
}

impl<'a> FieldValue<'a> {
    /// Get the string if this is a Text value.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the number if this is a Number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the flag if this is a Flag value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Render the value the way facet options and table cells show it.
    ///
    /// Whole numbers print without a fractional part, missing dates as "-".
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.to_string(),
            FieldValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            FieldValue::Number(n) => format!("{n}"),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::Date(Some(d)) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Date(None) => "-".to_string(),
        }
    }
}
