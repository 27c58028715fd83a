//! Canonical paper records and static filter definitions.

use serde::{Deserialize, Serialize};

/// An author of a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            institution: None,
        }
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }
}

/// Canonical normalized bibliographic record.
///
/// Both the embedded dataset and the remote feed produce this shape. The
/// `id` is unique within any collection handed to the query engine, and
/// `tags` keep their insertion order for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub authors: Vec<Author>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// ISO-8601 date or timestamp.
    pub publish_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default)]
    pub citations: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_category: Option<String>,
}

impl Paper {
    /// The 4-digit year at the start of `publish_date`, if there is one.
    pub fn year(&self) -> Option<&str> {
        let year = self.publish_date.get(..4)?;
        year.chars().all(|c| c.is_ascii_digit()).then_some(year)
    }

    /// Where the paper was published: conference first, then journal.
    pub fn venue(&self) -> Option<&str> {
        self.conference.as_deref().or(self.journal.as_deref())
    }

    /// Comma-separated author names.
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One selectable value inside a filter category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A group of filter options such as "Conference" or "Year".
///
/// Static configuration: option ids are not derived from paper data and
/// nothing checks that they line up with actual conference or tag values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCategory {
    pub id: String,
    pub name: String,
    pub options: Vec<FilterOption>,
}

impl FilterCategory {
    pub fn option(&self, option_id: &str) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}
