//! The active filter set: which options are selected in which category.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, ScholarError};
use crate::types::FilterCategory;

/// Selected filter options, keyed by category id.
///
/// Categories with no selected options are never stored, so an empty
/// selection imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an option. Returns `false` if it was already selected.
    pub fn select(&mut self, category: impl Into<String>, option: impl Into<String>) -> bool {
        self.selected
            .entry(category.into())
            .or_default()
            .insert(option.into())
    }

    /// Deselect an option. Returns `false` if it wasn't selected.
    pub fn deselect(&mut self, category: &str, option: &str) -> bool {
        let Some(options) = self.selected.get_mut(category) else {
            return false;
        };
        let removed = options.remove(option);
        if options.is_empty() {
            self.selected.remove(category);
        }
        removed
    }

    /// Flip an option. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, category: &str, option: &str) -> bool {
        if self.deselect(category, option) {
            false
        } else {
            self.select(category, option)
        }
    }

    pub fn is_selected(&self, category: &str, option: &str) -> bool {
        self.selected
            .get(category)
            .is_some_and(|options| options.contains(option))
    }

    /// Categories with at least one selected option, with their options.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.selected.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Total number of selected options across all categories.
    pub fn len(&self) -> usize {
        self.selected.values().map(BTreeSet::len).sum()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Parse `"<category>-<option>"` keys.
    ///
    /// The longest known category id that prefixes the key wins, so the
    /// option part may itself contain hyphens (`topic-object-detection`).
    /// Keys with an unknown category split at the first hyphen.
    pub fn from_compound_keys<I, S>(keys: I, categories: &[FilterCategory]) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for key in keys {
            let (category, option) = split_compound_key(key.as_ref(), categories)?;
            selection.select(category, option);
        }
        Ok(selection)
    }

    /// Render back to compound keys, sorted by category then option.
    pub fn to_compound_keys(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(category, options)| {
                options
                    .iter()
                    .map(move |option| format!("{}-{}", category, option))
            })
            .collect()
    }
}

/// Split one compound key into `(category, option)`.
pub fn split_compound_key<'k>(
    key: &'k str,
    categories: &[FilterCategory],
) -> Result<(&'k str, &'k str)> {
    let key = key.trim();
    let known = categories
        .iter()
        .filter_map(|c| {
            key.strip_prefix(c.id.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .map(|option| (c.id.len(), option))
        })
        .max_by_key(|(len, _)| *len);

    let (category, option) = match known {
        Some((len, option)) => (&key[..len], option),
        None => key.split_once('-').ok_or_else(|| ScholarError::InvalidFilter {
            key: key.to_string(),
        })?,
    };

    if category.is_empty() || option.is_empty() {
        return Err(ScholarError::InvalidFilter {
            key: key.to_string(),
        });
    }
    Ok((category, option))
}
