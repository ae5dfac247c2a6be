//! Front matter fields read from a database row.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::api::{Page, RichText};

pub const DEFAULT_TITLE: &str = "Untitled Post";

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").unwrap());

/// Metadata for one generated post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMeta {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub tags: Vec<String>,
}

impl PostMeta {
    /// Extract post metadata from a row.
    ///
    /// Absent and empty properties are treated the same way: each falls back
    /// to its default (`today` supplies the date default).
    pub fn from_page(page: &Page, today: NaiveDate) -> Self {
        let title = first_plain_text(page, "Name").unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let slug = first_plain_text(page, "Slug").unwrap_or_else(|| slugify(&title));

        let date = page
            .property("Date")
            .and_then(|p| p.date.as_ref())
            .and_then(|d| d.start.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

        let tags = page
            .property("Tags")
            .and_then(|p| p.multi_select.as_ref())
            .map(|opts| opts.iter().map(|o| o.name.clone()).collect())
            .unwrap_or_default();

        Self {
            title,
            slug,
            date,
            tags,
        }
    }
}

/// Plain text of the first fragment of a text property, if non-empty.
fn first_plain_text(page: &Page, name: &str) -> Option<String> {
    page.property(name)
        .and_then(|p| p.text_fragments().first())
        .map(|t: &RichText| t.plain_text.clone())
        .filter(|s| !s.is_empty())
}

/// Derive a URL slug from a title.
///
/// Lower-cases, turns each whitespace run into a single `-`, then drops
/// everything outside `[A-Za-z0-9_-]`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lowered, "-");
    NON_SLUG_CHARS.replace_all(&hyphenated, "").into_owned()
}
