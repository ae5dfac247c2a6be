use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// Database Query Request/Response
// ============================================================================

/// Request body for `POST /databases/{id}/query`
#[derive(Debug, Serialize)]
pub struct QueryDatabaseRequest {
    pub filter: PropertyFilter,
    pub sorts: Vec<PropertySort>,
}

impl QueryDatabaseRequest {
    /// Rows whose `draft` checkbox is checked, newest `Date` first.
    pub fn published_posts() -> Self {
        Self {
            filter: PropertyFilter {
                property: "draft".to_string(),
                checkbox: CheckboxFilter { equals: true },
            },
            sorts: vec![PropertySort {
                property: "Date".to_string(),
                direction: SortDirection::Descending,
            }],
        }
    }
}

/// Single-property filter. Only checkbox conditions are needed here.
#[derive(Debug, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    pub checkbox: CheckboxFilter,
}

#[derive(Debug, Serialize)]
pub struct CheckboxFilter {
    pub equals: bool,
}

#[derive(Debug, Serialize)]
pub struct PropertySort {
    pub property: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Descending,
}

/// Paginated list envelope shared by query and block-children endpoints
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

// ============================================================================
// Pages and Properties
// ============================================================================

/// A database row as returned by the query endpoint
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A page property value.
///
/// Notion tags each value with `type` and stores the payload under a key of
/// the same name. Every payload we read is an optional field so that a
/// property of an unexpected type simply reads as absent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PropertyValue {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<Vec<RichText>>,
    #[serde(default)]
    pub rich_text: Option<Vec<RichText>>,
    #[serde(default)]
    pub date: Option<DateValue>,
    #[serde(default)]
    pub multi_select: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub checkbox: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl PropertyValue {
    /// The text fragments of a `title` or `rich_text` property.
    pub fn text_fragments(&self) -> &[RichText] {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.rich_text.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

// ============================================================================
// Rich Text
// ============================================================================

/// One run of styled text
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
}

// ============================================================================
// Blocks
// ============================================================================

/// A content block of a page body.
///
/// The type-specific payload lives under the key named by `type`
/// (e.g. `"paragraph": {...}`) and is kept in `extra`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Block {
    /// The payload object for this block's type.
    pub fn payload(&self) -> Option<&Value> {
        self.extra.get(&self.kind)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error object Notion returns with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
