//! End-to-end scenarios over the embedded sample catalog: search, filters,
//! pagination, and favorites working together.

use pretty_assertions::assert_eq;
use std::num::NonZeroUsize;

use scholar_core::dataset::filter_categories;
use scholar_core::favorites::DEFAULT_BLOB_NAME;
use scholar_core::{
    Catalog, FavoritesStore, FileBlobStore, FilterSelection, Paper, QueryEngine, ScholarError,
    paginate,
};

fn titles(results: &[&Paper]) -> Vec<String> {
    results.iter().map(|p| p.title.clone()).collect()
}

fn selection(keys: &[&str]) -> FilterSelection {
    FilterSelection::from_compound_keys(keys, &filter_categories()).unwrap()
}

#[test]
fn test_transformer_search_finds_vision_transformer_paper() {
    let catalog = Catalog::sample();
    let engine = QueryEngine::default();
    let results = engine.run(catalog.papers(), "transformer", &FilterSelection::new());
    assert_eq!(
        titles(&results),
        vec!["Vision Transformer for Small-Size Datasets"]
    );
}

#[test]
fn test_conference_filter_returns_exactly_matching_papers() {
    let catalog = Catalog::sample();
    let engine = QueryEngine::default();

    let cvpr = engine.run(catalog.papers(), "", &selection(&["conference-cvpr"]));
    assert!(!cvpr.is_empty());
    assert!(cvpr
        .iter()
        .all(|p| p.conference.as_deref().is_some_and(|c| c.eq_ignore_ascii_case("cvpr"))));
    let expected = catalog
        .papers()
        .iter()
        .filter(|p| p.conference.as_deref() == Some("CVPR"))
        .count();
    assert_eq!(cvpr.len(), expected);
}

#[test]
fn test_and_across_categories_or_within() {
    let catalog = Catalog::sample();
    let engine = QueryEngine::default();

    let cvpr_3d = engine.run(catalog.papers(), "", &selection(&["conference-cvpr", "topic-3d"]));
    assert!(cvpr_3d.is_empty());

    let either_3d = engine.run(
        catalog.papers(),
        "",
        &selection(&["conference-cvpr", "conference-eccv", "topic-3d"]),
    );
    assert_eq!(
        titles(&either_3d),
        vec!["3D Scene Understanding with Neural Implicit Representations"]
    );
}

#[test]
fn test_empty_query_keeps_catalog_order() {
    let catalog = Catalog::sample();
    let engine = QueryEngine::default();
    let ids: Vec<_> = engine
        .run(catalog.papers(), "", &FilterSelection::new())
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_results_paginate_and_clamp() {
    let catalog = Catalog::sample();
    let engine = QueryEngine::default();
    let results = engine.run(catalog.papers(), "", &selection(&["year-2023"]));
    let size = NonZeroUsize::new(2).unwrap();

    let page = paginate(&results, size, 99);
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "5");
}

#[test]
fn test_detail_lookup_distinguishes_missing() {
    let catalog = Catalog::sample();
    assert_eq!(catalog.require("4").unwrap().citations, 320);
    assert!(matches!(
        catalog.require("42"),
        Err(ScholarError::NotFound { .. })
    ));
}

#[test]
fn test_invalid_compound_filter_is_rejected() {
    let err = FilterSelection::from_compound_keys(["cvpr"], &filter_categories()).unwrap_err();
    assert!(matches!(err, ScholarError::InvalidFilter { ref key } if key == "cvpr"));
}

#[test]
fn test_favorites_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::sample();

    let mut store = FavoritesStore::load(FileBlobStore::new(dir.path()), DEFAULT_BLOB_NAME);
    store.toggle("4").unwrap();
    store.toggle("2").unwrap();
    drop(store);

    let store = FavoritesStore::load(FileBlobStore::new(dir.path()), DEFAULT_BLOB_NAME);
    let saved: Vec<_> = store
        .saved_papers(catalog.papers())
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(saved, vec!["2", "4"]);

    let raw = std::fs::read_to_string(dir.path().join("savedPapers.json")).unwrap();
    let ids: Vec<String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(ids, vec!["2", "4"]);
}

#[test]
fn test_corrupt_favorites_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("savedPapers.json"), "not json at all").unwrap();
    let mut store = FavoritesStore::load(FileBlobStore::new(dir.path()), DEFAULT_BLOB_NAME);
    assert!(store.is_empty());

    store.toggle("1").unwrap();
    let reloaded = FavoritesStore::load(FileBlobStore::new(dir.path()), DEFAULT_BLOB_NAME);
    assert!(reloaded.is_favorite("1"));
}
