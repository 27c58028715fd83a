//! Live search against the remote feed.
//!
//! Every search takes a [`RequestToken`] when it starts. When its response
//! arrives it is applied only if no newer search has started in the
//! meantime; otherwise it is discarded as stale. This keeps a slow response
//! to an old query from overwriting the results of a newer one.

use chrono::{DateTime, Utc};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::FeedConfig;
use crate::error::{FeedError, Result, ScholarError};
use crate::feed::{ARXIV_ID_PREFIX, FeedPage, FeedQuery, FeedSource, normalize_entry, normalize_page};
use crate::pagination::FeedWindow;
use crate::types::Paper;

/// Identifies one live search. Later searches get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request tokens and remembers the latest one.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestToken(n)),
        }
    }
}

/// A search that has been started but whose response is not applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub token: RequestToken,
    pub query: FeedQuery,
}

/// What happened to a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response replaced the catalog.
    Applied(FeedWindow),
    /// A newer search started first; the response was dropped.
    Stale { token: RequestToken },
}

// ── Live Search ───────────────────────────────────────────────

/// Runs searches against a [`FeedSource`] and keeps the latest results.
pub struct LiveSearch<S: FeedSource> {
    source: S,
    tracker: RequestTracker,
    catalog: Catalog,
    window: Option<FeedWindow>,
    page_size: NonZeroUsize,
    timeout: Duration,
}

impl<S: FeedSource> LiveSearch<S> {
    pub fn new(source: S, page_size: NonZeroUsize, timeout: Duration) -> Self {
        Self {
            source,
            tracker: RequestTracker::new(),
            catalog: Catalog::default(),
            window: None,
            page_size,
            timeout,
        }
    }

    /// Page size and timeout taken from the feed settings.
    pub fn from_config(source: S, config: &FeedConfig) -> Self {
        let page_size = NonZeroUsize::new(config.max_results).unwrap_or(NonZeroUsize::MIN);
        Self::new(source, page_size, Duration::from_secs(config.timeout_secs))
    }

    /// Start a search at result offset `start`.
    pub fn begin(&self, query: &str, start: usize) -> PendingSearch {
        let token = self.tracker.issue();
        tracing::debug!(%token, query, start, "Live search started");
        PendingSearch {
            token,
            query: FeedQuery::new(query, start, self.page_size.get()),
        }
    }

    /// Fetch the raw page for a pending search, bounded by the timeout.
    pub async fn fetch(&self, pending: &PendingSearch) -> std::result::Result<FeedPage, FeedError> {
        match tokio::time::timeout(self.timeout, self.source.search(&pending.query)).await {
            Ok(result) => result,
            Err(_) => Err(FeedError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }

    /// Apply a fetch result unless a newer search has started.
    ///
    /// Stale results are dropped whether they succeeded or failed, so an
    /// old error never surfaces over a newer search.
    pub fn complete(
        &mut self,
        pending: PendingSearch,
        result: std::result::Result<FeedPage, FeedError>,
        now: DateTime<Utc>,
    ) -> Result<SearchOutcome> {
        if !self.tracker.is_current(pending.token) {
            tracing::warn!(
                token = %pending.token,
                latest = ?self.tracker.latest().map(RequestToken::value),
                "Discarding stale feed response"
            );
            return Ok(SearchOutcome::Stale {
                token: pending.token,
            });
        }

        let page = result?;
        let start = pending.query.start;
        let papers = normalize_page(&page, start, now);
        let window = FeedWindow::new(start, self.page_size)
            .with_fetched(papers.len(), page.total_results);
        tracing::debug!(
            token = %pending.token,
            fetched = papers.len(),
            has_more = window.has_more(),
            "Live search applied"
        );
        self.catalog.replace(papers);
        self.window = Some(window);
        Ok(SearchOutcome::Applied(window))
    }

    /// Begin, fetch and complete one search.
    pub async fn search(&mut self, query: &str, start: usize, now: DateTime<Utc>) -> Result<SearchOutcome> {
        let pending = self.begin(query, start);
        let result = self.fetch(&pending).await;
        self.complete(pending, result, now)
    }

    /// Papers from the latest applied search.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Paging state of the latest applied search.
    pub fn window(&self) -> Option<FeedWindow> {
        self.window
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Look up one paper by id on the remote feed.
///
/// Accepts catalog ids (`arxiv-2301.12345v1`) as well as bare arXiv ids,
/// including old-style ones (`hep-th/9901001v1`). An empty response, or an id
/// the feed cannot resolve such as `arxiv-entry-3`, is
/// [`ScholarError::NotFound`], distinct from transport failures.
pub async fn fetch_paper<S: FeedSource + ?Sized>(
    source: &S,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Paper> {
    let id = id.trim();
    let arxiv_id = id.strip_prefix(ARXIV_ID_PREFIX).unwrap_or(id);
    match source.fetch_entry(arxiv_id).await {
        Ok(Some(entry)) => Ok(normalize_entry(&entry, 0, now)),
        Ok(None) | Err(FeedError::InvalidId { .. }) => {
            Err(ScholarError::NotFound { id: id.to_string() })
        }
        Err(e) => Err(e.into()),
    }
}
