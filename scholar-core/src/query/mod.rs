//! Free-text search and category filtering over an in-memory paper list.
//!
//! The engine is a stable filter: results keep the input order and nothing
//! is ranked. Filters run first, then the free-text query runs over what is
//! left, and a paper must pass both.
//!
//! Within a category any selected option may match (OR); across categories
//! every category with a selection must match (AND).

pub mod selection;

pub use selection::{FilterSelection, split_compound_key};

use crate::dataset::{CONFERENCE, TOPIC, YEAR};
use crate::types::{FilterCategory, Paper};

/// How a category's options are compared against a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    /// Option label equals the paper's conference, ignoring case.
    Conference,
    /// Option id equals the 4-digit year of the publish date.
    Year,
    /// De-hyphenated option id appears in a tag or the primary category.
    Topic,
}

impl FilterKind {
    fn for_category(id: &str) -> Option<Self> {
        match id {
            CONFERENCE => Some(FilterKind::Conference),
            YEAR => Some(FilterKind::Year),
            TOPIC => Some(FilterKind::Topic),
            _ => None,
        }
    }
}

/// One selected option, pre-processed for matching.
#[derive(Debug)]
struct Needle {
    kind: FilterKind,
    value: String,
}

impl Needle {
    fn new(kind: FilterKind, option_id: &str, label: &str) -> Self {
        let value = match kind {
            FilterKind::Conference => label.to_lowercase(),
            FilterKind::Year => option_id.to_string(),
            FilterKind::Topic => option_id.replace('-', " ").to_lowercase(),
        };
        Self { kind, value }
    }

    fn matches(&self, paper: &Paper) -> bool {
        match self.kind {
            FilterKind::Conference => paper
                .conference
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == self.value),
            FilterKind::Year => paper.year() == Some(self.value.as_str()),
            FilterKind::Topic => {
                paper
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&self.value))
                    || paper
                        .primary_category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&self.value))
            }
        }
    }
}

/// Applies searches and filter selections to paper collections.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    categories: Vec<FilterCategory>,
}

impl QueryEngine {
    pub fn new(categories: Vec<FilterCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[FilterCategory] {
        &self.categories
    }

    /// Filter, then search. The result borrows from `papers` in input order.
    pub fn run<'a>(
        &self,
        papers: &'a [Paper],
        query: &str,
        selection: &FilterSelection,
    ) -> Vec<&'a Paper> {
        let constraints = self.compile(selection);
        let query = normalize_query(query);
        let results: Vec<&Paper> = papers
            .iter()
            .filter(|paper| satisfies_all(paper, &constraints))
            .filter(|paper| query.as_deref().is_none_or(|q| matches_normalized(paper, q)))
            .collect();
        tracing::debug!(
            total = papers.len(),
            matched = results.len(),
            filters = selection.len(),
            "Query evaluated"
        );
        results
    }

    /// Apply only the filter selection.
    pub fn filter<'a>(&self, papers: &'a [Paper], selection: &FilterSelection) -> Vec<&'a Paper> {
        let constraints = self.compile(selection);
        papers
            .iter()
            .filter(|paper| satisfies_all(paper, &constraints))
            .collect()
    }

    /// Apply only the free-text query.
    pub fn search<'a>(&self, papers: &'a [Paper], query: &str) -> Vec<&'a Paper> {
        let Some(query) = normalize_query(query) else {
            return papers.iter().collect();
        };
        papers
            .iter()
            .filter(|paper| matches_normalized(paper, &query))
            .collect()
    }

    /// Resolve the selection into one list of needles per constrained category.
    ///
    /// Unknown categories and options drop out here, so they never constrain.
    fn compile(&self, selection: &FilterSelection) -> Vec<Vec<Needle>> {
        let mut constraints = Vec::new();
        for (category_id, options) in selection.iter() {
            let category = self.categories.iter().find(|c| c.id == category_id);
            let kind = FilterKind::for_category(category_id);
            let (Some(category), Some(kind)) = (category, kind) else {
                tracing::warn!(category = category_id, "Ignoring unknown filter category");
                continue;
            };

            let needles: Vec<Needle> = options
                .iter()
                .filter_map(|option_id| match category.option(option_id) {
                    Some(option) => Some(Needle::new(kind, &option.id, &option.label)),
                    None => {
                        tracing::warn!(
                            category = category_id,
                            option = option_id.as_str(),
                            "Ignoring unknown filter option"
                        );
                        None
                    }
                })
                .collect();

            if !needles.is_empty() {
                constraints.push(needles);
            }
        }
        constraints
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(crate::dataset::filter_categories())
    }
}

fn satisfies_all(paper: &Paper, constraints: &[Vec<Needle>]) -> bool {
    constraints
        .iter()
        .all(|needles| needles.iter().any(|needle| needle.matches(paper)))
}

/// Trimmed, lowercased query; `None` when blank.
fn normalize_query(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| query.to_lowercase())
}

fn matches_normalized(paper: &Paper, query: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(query);
    contains(&paper.title)
        || contains(&paper.abstract_text)
        || paper.authors.iter().any(|a| contains(&a.name))
        || paper.tags.iter().any(|t| contains(t))
}

/// Case-insensitive substring match of a query against title, abstract,
/// author names and tags. A blank query matches everything.
pub fn matches_query(paper: &Paper, query: &str) -> bool {
    normalize_query(query).is_none_or(|q| matches_normalized(paper, &q))
}
