use super::{Record, RecordId, RecordKind};
use crate::fields::{FieldKind, FieldSpec, FieldValue};
use serde::{Deserialize, Serialize};

/// A digital title in the e-book catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EBook {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub category: String,
    /// "EPUB", "PDF", ...
    pub format: String,
    /// Human-readable file size ("2.5 MB")
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub pages: u32,
    pub year: i32,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub rating: f32,
    pub available_copies: u32,
    pub total_copies: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_featured: bool,
}

const EBOOK_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", FieldKind::Text).searchable(),
    FieldSpec::new("author", FieldKind::Text).searchable(),
    FieldSpec::new("category", FieldKind::Category)
        .searchable()
        .facet(),
    FieldSpec::new("format", FieldKind::Category).facet(),
    FieldSpec::new("year", FieldKind::Number),
    FieldSpec::new("downloads", FieldKind::Number),
    FieldSpec::new("rating", FieldKind::Number),
    FieldSpec::new("available_copies", FieldKind::Number),
    FieldSpec::new("is_featured", FieldKind::Flag),
];

impl EBook {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

impl Record for EBook {
    const KIND: RecordKind = RecordKind::Ebook;
    const FIELDS: &'static [FieldSpec] = EBOOK_FIELDS;

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match name {
            "title" => FieldValue::Text(&self.title),
            "author" => FieldValue::Text(&self.author),
            "category" => FieldValue::Text(&self.category),
            "format" => FieldValue::Text(&self.format),
            "year" => FieldValue::Number(f64::from(self.year)),
            "downloads" => FieldValue::Number(self.downloads as f64),
            "rating" => FieldValue::Number(f64::from(self.rating)),
            "available_copies" => FieldValue::Number(f64::from(self.available_copies)),
            "is_featured" => FieldValue::Flag(self.is_featured),
            _ => return None,
        };
        Some(value)
    }

    fn label(&self) -> String {
        format!("\"{}\"", self.title)
    }
}
