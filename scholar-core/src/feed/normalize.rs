//! Maps raw feed entries onto canonical [`Paper`] records.
//!
//! Normalization is total: each field falls back to a fixed default on its
//! own, so a malformed entry degrades instead of failing.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{FeedEntry, FeedPage};
use crate::types::{Author, Paper};

/// Prefix for ids of papers that came from the remote feed.
pub const ARXIV_ID_PREFIX: &str = "arxiv-";

pub const UNTITLED: &str = "Untitled Paper";
pub const NO_ABSTRACT: &str = "No abstract available";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const FEED_JOURNAL: &str = "arXiv";

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(normalize_whitespace)
        .filter(|v| !v.is_empty())
}

/// The last path segment of an entry URI, e.g. `1706.03762v7` for
/// `http://arxiv.org/abs/1706.03762v7`.
pub fn source_id(uri: &str) -> Option<&str> {
    uri.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// The arXiv identifier of an entry URI: everything after `/abs/`, so
/// old-style ids keep their archive (`hep-th/9901001v1`). Falls back to
/// [`source_id`] for URIs without an `/abs/` path.
pub fn arxiv_id_from_uri(uri: &str) -> Option<&str> {
    let uri = uri.trim().trim_end_matches('/');
    match uri.split_once("/abs/") {
        Some((_, rest)) if !rest.is_empty() => Some(rest),
        _ => source_id(uri),
    }
}

/// Normalize one feed entry.
///
/// `ordinal` is the entry's absolute position in the remote result set and
/// only shows up in ids when the entry has no identifier of its own.
/// `now` stands in for a missing publication date.
pub fn normalize_entry(entry: &FeedEntry, ordinal: usize, now: DateTime<Utc>) -> Paper {
    let uri = entry.id_uri.as_deref().map(str::trim).unwrap_or_default();
    let id = match source_id(uri) {
        Some(source) => format!("{}{}", ARXIV_ID_PREFIX, source),
        None => format!("{}entry-{}", ARXIV_ID_PREFIX, ordinal),
    };
    let arxiv_id = arxiv_id_from_uri(uri).map(str::to_string);

    let authors = entry
        .authors
        .iter()
        .enumerate()
        .map(|(index, author)| {
            Author::new(
                format!("author-{}-{}", ordinal, index),
                non_blank(author.name.as_deref()).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            )
        })
        .collect();

    let tags: Vec<String> = entry
        .categories
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();

    let primary_category = non_blank(entry.primary_category.as_deref())
        .or_else(|| tags.first().cloned())
        .unwrap_or_default();

    let pdf_url = entry
        .links
        .iter()
        .find(|link| link.is_pdf())
        .and_then(|link| non_blank(link.href.as_deref()));

    let publish_date = non_blank(entry.published.as_deref())
        .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Secs, true));

    Paper {
        id,
        title: non_blank(entry.title.as_deref()).unwrap_or_else(|| UNTITLED.to_string()),
        authors,
        abstract_text: non_blank(entry.summary.as_deref())
            .unwrap_or_else(|| NO_ABSTRACT.to_string()),
        publish_date,
        conference: None,
        journal: Some(
            non_blank(entry.journal_ref.as_deref()).unwrap_or_else(|| FEED_JOURNAL.to_string()),
        ),
        citations: 0,
        tags,
        url: uri.to_string(),
        image_url: None,
        arxiv_id,
        pdf_url,
        primary_category: Some(primary_category),
    }
}

/// Normalize every entry of a page fetched at result offset `start`.
pub fn normalize_page(page: &FeedPage, start: usize, now: DateTime<Utc>) -> Vec<Paper> {
    page.entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(entry, start + index, now))
        .collect()
}
