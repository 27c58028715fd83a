//! Remote bibliographic feed: raw entry model, Atom parsing, normalization,
//! and the HTTP client.

pub mod atom;
pub mod client;
pub mod normalize;

pub use atom::parse_atom_feed;
pub use client::{ArxivClient, FeedQuery, FeedSource, build_search_url};
pub use normalize::{ARXIV_ID_PREFIX, normalize_entry, normalize_page};

use serde::{Deserialize, Serialize};

/// One `<author>` element of a feed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedAuthor {
    pub name: Option<String>,
}

/// One `<link>` element of a feed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLink {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub title: Option<String>,
    pub media_type: Option<String>,
}

impl FeedLink {
    /// A link is a PDF link when labelled `pdf` or typed `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.title.as_deref() == Some("pdf") || self.media_type.as_deref() == Some("application/pdf")
    }
}

/// One raw entry from the feed, before normalization.
///
/// Every field is optional; the feed is loosely typed and the normalizer
/// supplies a default for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id_uri: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub authors: Vec<FeedAuthor>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub links: Vec<FeedLink>,
    pub categories: Vec<String>,
    pub primary_category: Option<String>,
    pub doi: Option<String>,
    pub journal_ref: Option<String>,
    pub comment: Option<String>,
}

/// A parsed feed document with its OpenSearch paging metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    pub total_results: Option<usize>,
    pub start_index: Option<usize>,
    pub items_per_page: Option<usize>,
}
