//! Backend responses and their display mapping.

use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Result category, also used to narrow what is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    All,
    Books,
    Members,
    Ebooks,
    Reservations,
}

impl SearchType {
    /// The concrete categories, in display order.
    pub fn categories() -> &'static [SearchType] {
        &[
            SearchType::Books,
            SearchType::Members,
            SearchType::Ebooks,
            SearchType::Reservations,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::All => "all",
            SearchType::Books => "books",
            SearchType::Members => "members",
            SearchType::Ebooks => "ebooks",
            SearchType::Reservations => "reservations",
        }
    }

    /// Whether hits of `category` are shown under this type.
    pub fn includes(self, category: SearchType) -> bool {
        self == SearchType::All || self == category
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SearchType::All),
            "books" | "book" => Ok(SearchType::Books),
            "members" | "member" => Ok(SearchType::Members),
            "ebooks" | "ebook" | "e-books" => Ok(SearchType::Ebooks),
            "reservations" | "reservation" => Ok(SearchType::Reservations),
            other => Err(format!("Unknown search type: {}", other)),
        }
    }
}

/// Raw records per category as returned by a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub categories: BTreeMap<String, Vec<Value>>,
}

impl SearchResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, name: impl Into<String>, records: Vec<Value>) -> Self {
        self.categories.insert(name.into(), records);
        self
    }

    /// Accept both `{"categories": {...}}` and the flat
    /// `{"books": [...], "total": n}` shape.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(ShelfError::Search("response is not a JSON object".into()));
        };
        if let Some(categories) = map.remove("categories") {
            return serde_json::from_value(serde_json::json!({ "categories": categories }))
                .map_err(|e| ShelfError::Search(format!("malformed categories: {}", e)));
        }

        let mut response = SearchResponse::new();
        for category in SearchType::categories() {
            match map.remove(category.as_str()) {
                Some(Value::Array(records)) => {
                    response.categories.insert(category.as_str().to_string(), records);
                }
                Some(_) => {
                    return Err(ShelfError::Search(format!(
                        "'{}' is not an array",
                        category
                    )))
                }
                None => {}
            }
        }
        if response.categories.is_empty() {
            return Err(ShelfError::Search("response has no result categories".into()));
        }
        Ok(response)
    }

    pub fn records(&self, category: SearchType) -> &[Value] {
        self.categories
            .get(category.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One display-ready result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub category: SearchType,
    pub title: String,
    /// Author, member id or member name, depending on the category
    pub detail: String,
    pub status: Option<String>,
}

/// Mapped results, one list per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub hits: BTreeMap<SearchType, Vec<SearchHit>>,
}

impl SearchResults {
    pub fn from_response(response: &SearchResponse) -> Self {
        let mut hits = BTreeMap::new();
        for category in SearchType::categories() {
            let mapped: Vec<SearchHit> = response
                .records(*category)
                .iter()
                .map(|v| map_hit(*category, v))
                .collect();
            if !mapped.is_empty() {
                hits.insert(*category, mapped);
            }
        }
        Self { hits }
    }

    pub fn total(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn category(&self, category: SearchType) -> &[SearchHit] {
        self.hits.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Hits shown under `search_type`, category by category.
    pub fn narrowed(&self, search_type: SearchType) -> Vec<&SearchHit> {
        self.hits
            .iter()
            .filter(|(category, _)| search_type.includes(**category))
            .flat_map(|(_, hits)| hits.iter())
            .collect()
    }
}

fn text(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| value.get(*k))
        .find_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn copies_available(value: &Value) -> Option<bool> {
    if let Some(n) = ["available_copies", "availableCopies"]
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_i64))
    {
        return Some(n > 0);
    }
    value.get("available").and_then(Value::as_bool)
}

fn map_hit(category: SearchType, value: &Value) -> SearchHit {
    let id = text(value, &["id", "_id"]);
    match category {
        SearchType::Books => SearchHit {
            id,
            category,
            title: text(value, &["title"]),
            detail: text(value, &["author"]),
            status: Some(
                if copies_available(value).unwrap_or(false) {
                    "Available"
                } else {
                    "Borrowed"
                }
                .to_string(),
            ),
        },
        SearchType::Ebooks => SearchHit {
            id,
            category,
            title: text(value, &["title"]),
            detail: text(value, &["author"]),
            status: copies_available(value)
                .map(|a| if a { "Available" } else { "Unavailable" }.to_string()),
        },
        SearchType::Members => SearchHit {
            id,
            category,
            title: text(value, &["name", "memberName"]),
            detail: text(value, &["memberId", "member_id", "email"]),
            status: Some(text(value, &["status"])).filter(|s| !s.is_empty()),
        },
        SearchType::Reservations | SearchType::All => SearchHit {
            id,
            category,
            title: text(value, &["bookTitle", "book"]),
            detail: text(value, &["memberName", "member"]),
            status: Some(text(value, &["status"])).filter(|s| !s.is_empty()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_books_response_is_accepted() {
        let value = json!({
            "books": [
                {"id": "64a1", "title": "Dune", "author": "Frank Herbert", "available_copies": 2},
                {"id": "64a2", "title": "Emma", "author": "Jane Austen", "available_copies": 0}
            ],
            "total": 2
        });
        let response = SearchResponse::from_value(value).unwrap();
        let results = SearchResults::from_response(&response);
        let books = results.category(SearchType::Books);
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].status.as_deref(), Some("Available"));
        assert_eq!(books[1].status.as_deref(), Some("Borrowed"));
        assert_eq!(results.total(), 2);
    }

    #[test]
    fn categories_response_is_accepted() {
        let value = json!({
            "categories": {
                "members": [{"id": 1, "name": "John Doe", "memberId": "MEM2024001"}],
                "reservations": [{"id": 4, "bookTitle": "The Hobbit", "memberName": "Charlie Wilson", "status": "Pending"}]
            }
        });
        let results = SearchResults::from_response(&SearchResponse::from_value(value).unwrap());
        assert_eq!(results.category(SearchType::Members)[0].detail, "MEM2024001");
        assert_eq!(results.category(SearchType::Members)[0].id, "1");
        assert_eq!(
            results.category(SearchType::Reservations)[0].status.as_deref(),
            Some("Pending")
        );
    }

    #[test]
    fn unrecognized_shapes_are_errors() {
        assert!(SearchResponse::from_value(json!([1, 2])).is_err());
        assert!(SearchResponse::from_value(json!({"total": 0})).is_err());
        assert!(SearchResponse::from_value(json!({"books": "none"})).is_err());
    }

    #[test]
    fn narrowing_by_type() {
        let response = SearchResponse::new()
            .with_category("books", vec![json!({"id": 1, "title": "A", "available_copies": 1})])
            .with_category("ebooks", vec![json!({"id": 2, "title": "B", "available": true})]);
        let results = SearchResults::from_response(&response);
        assert_eq!(results.narrowed(SearchType::All).len(), 2);
        let ebooks = results.narrowed(SearchType::Ebooks);
        assert_eq!(ebooks.len(), 1);
        assert_eq!(ebooks[0].title, "B");
        assert!(results.narrowed(SearchType::Members).is_empty());
    }

    #[test]
    fn search_type_parses() {
        assert_eq!("E-Books".parse::<SearchType>().unwrap(), SearchType::Ebooks);
        assert!("staff".parse::<SearchType>().is_err());
    }
}
