//! An id-indexed paper collection.

use std::collections::HashMap;

use crate::dataset;
use crate::error::{Result, ScholarError};
use crate::types::Paper;

/// Papers in display order with an index by id.
///
/// Ids are unique: when a collection repeats an id, the first paper wins and
/// later ones are dropped.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    papers: Vec<Paper>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(papers: Vec<Paper>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(papers);
        catalog
    }

    /// The embedded sample collection.
    pub fn sample() -> Self {
        Self::new(dataset::sample_papers())
    }

    /// Swap in a new collection, e.g. after a live search returns.
    pub fn replace(&mut self, papers: Vec<Paper>) {
        self.papers.clear();
        self.index.clear();
        for paper in papers {
            if self.index.contains_key(&paper.id) {
                tracing::warn!(id = %paper.id, "Dropping paper with duplicate id");
                continue;
            }
            self.index.insert(paper.id.clone(), self.papers.len());
            self.papers.push(paper);
        }
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.index.get(id).map(|&i| &self.papers[i])
    }

    /// Like [`get`](Self::get), but a missing paper is an error.
    pub fn require(&self, id: &str) -> Result<&Paper> {
        self.get(id).ok_or_else(|| ScholarError::NotFound { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_lookup() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.get("1").unwrap().title,
            "Vision Transformer for Small-Size Datasets"
        );
        assert!(catalog.get("6").is_none());
    }

    #[test]
    fn test_require_missing_is_not_found() {
        let catalog = Catalog::sample();
        let err = catalog.require("arxiv-0000.00000").unwrap_err();
        assert!(matches!(err, ScholarError::NotFound { ref id } if id == "arxiv-0000.00000"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut papers = dataset::sample_papers();
        let mut dup = papers[0].clone();
        dup.title = "Shadow copy".into();
        papers.push(dup);

        let catalog = Catalog::new(papers);
        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.get("1").unwrap().title,
            "Vision Transformer for Small-Size Datasets"
        );
    }

    #[test]
    fn test_replace_resets_index() {
        let mut catalog = Catalog::sample();
        let mut paper = dataset::sample_papers().remove(2);
        paper.id = "arxiv-2301.00001v1".into();
        catalog.replace(vec![paper]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("1").is_none());
        assert!(catalog.get("arxiv-2301.00001v1").is_some());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.papers().is_empty());
    }
}
