//! Favorites store: a persisted set of paper ids.
//!
//! The whole set lives in one named blob as a JSON array of ids and is
//! rewritten after every mutation. A missing or unreadable blob loads as an
//! empty set.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::FavoritesError;
use crate::persistence;
use crate::types::Paper;

/// Default name of the favorites blob.
pub const DEFAULT_BLOB_NAME: &str = "savedPapers";

/// Named string blobs, the storage the favorites set is written to.
pub trait BlobStore {
    /// Read a blob. `Ok(None)` when it does not exist.
    fn read(&self, name: &str) -> io::Result<Option<String>>;

    /// Replace a blob's contents.
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()>;

    /// Human-readable location of a blob, for messages.
    fn describe(&self, name: &str) -> String {
        name.to_string()
    }
}

// ── File Backend ──────────────────────────────────────────────

/// Stores each blob as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        persistence::read_optional(&self.path_for(name))
    }

    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        persistence::atomic_write(&self.path_for(name), contents.as_bytes())
    }

    fn describe(&self, name: &str) -> String {
        self.path_for(name).display().to_string()
    }
}

// ── Memory Backend ────────────────────────────────────────────

/// In-process blobs for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with one blob already present.
    pub fn with_blob(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.blobs.insert(name.into(), contents.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.blobs.get(name).map(String::as_str)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        Ok(self.blobs.get(name).cloned())
    }

    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        self.blobs.insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn describe(&self, name: &str) -> String {
        format!("memory:{}", name)
    }
}

// ── Favorites Store ───────────────────────────────────────────

/// The favorite set together with the backend it persists to.
#[derive(Debug)]
pub struct FavoritesStore<B: BlobStore> {
    backend: B,
    name: String,
    ids: BTreeSet<String>,
}

impl<B: BlobStore> FavoritesStore<B> {
    /// Load the set from `backend`.
    ///
    /// Never fails: an absent blob is an empty set, and an unreadable or
    /// corrupt one is logged and also treated as empty.
    pub fn load(backend: B, name: impl Into<String>) -> Self {
        let name = name.into();
        let ids = match backend.read(&name) {
            Ok(Some(contents)) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    tracing::warn!(
                        location = %backend.describe(&name),
                        error = %e,
                        "Corrupt favorites blob, starting empty"
                    );
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                tracing::warn!(
                    location = %backend.describe(&name),
                    error = %e,
                    "Failed to read favorites, starting empty"
                );
                BTreeSet::new()
            }
        };
        tracing::debug!(count = ids.len(), "Favorites loaded");
        Self { backend, name, ids }
    }

    /// Add `id` if absent, remove it if present, then persist the full set.
    ///
    /// The in-memory change stands even when persisting fails; the error
    /// tells the caller the change will not survive the session.
    pub fn toggle(&mut self, id: &str) -> Result<&BTreeSet<String>, FavoritesError> {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
        self.persist()?;
        Ok(&self.ids)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorites present in `papers`, in collection order.
    pub fn saved_papers<'a>(&self, papers: &'a [Paper]) -> Vec<&'a Paper> {
        papers.iter().filter(|p| self.is_favorite(&p.id)).collect()
    }

    pub fn location(&self) -> String {
        self.backend.describe(&self.name)
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn persist(&mut self) -> Result<(), FavoritesError> {
        let written = serde_json::to_string(&self.ids)
            .map_err(|e| e.to_string())
            .and_then(|contents| {
                self.backend
                    .write(&self.name, &contents)
                    .map_err(|e| e.to_string())
            });
        written.map_err(|message| FavoritesError::Persist {
            location: self.backend.describe(&self.name),
            message,
        })
    }
}
