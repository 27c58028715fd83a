//! # Scholar Core
//!
//! Core library for Scholar, a paper discovery tool.
//! Provides the paper model, the embedded sample catalog, arXiv feed
//! ingestion and normalization, the query engine, pagination, the favorites
//! store, live-search request tracking, and configuration.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod favorites;
pub mod feed;
pub mod pagination;
pub mod persistence;
pub mod query;
pub mod session;
pub mod types;

// Re-export commonly used types at the crate root.
pub use catalog::Catalog;
pub use config::{CatalogSource, ScholarConfig, load_config};
pub use error::{ConfigError, FavoritesError, FeedError, Result, ScholarError};
pub use favorites::{BlobStore, FavoritesStore, FileBlobStore, MemoryBlobStore};
pub use feed::{ArxivClient, FeedEntry, FeedPage, FeedQuery, FeedSource};
pub use pagination::{FeedWindow, Page, paginate};
pub use query::{FilterSelection, QueryEngine};
pub use session::{LiveSearch, RequestToken, RequestTracker, SearchOutcome, fetch_paper};
pub use types::{Author, FilterCategory, FilterOption, Paper};
