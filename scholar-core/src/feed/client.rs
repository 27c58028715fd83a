//! HTTP client for the arXiv query API.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::{FeedEntry, FeedPage, parse_atom_feed};
use crate::config::FeedConfig;
use crate::error::FeedError;

/// Parameters of one remote search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Free-text query. Blank falls back to the configured default.
    pub query: String,
    /// Result offset.
    pub start: usize,
    /// Result limit.
    pub max_results: usize,
}

impl FeedQuery {
    pub fn new(query: impl Into<String>, start: usize, max_results: usize) -> Self {
        Self {
            query: query.into(),
            start,
            max_results,
        }
    }
}

/// A source of feed pages. Implemented by [`ArxivClient`]; tests swap in
/// canned sources.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Run a search and return the raw page.
    async fn search(&self, query: &FeedQuery) -> Result<FeedPage, FeedError>;

    /// Fetch a single entry by arXiv id. `Ok(None)` when the feed has no such entry.
    async fn fetch_entry(&self, arxiv_id: &str) -> Result<Option<FeedEntry>, FeedError>;
}

// ── URL Building ──────────────────────────────────────────────

/// Turn user input into an arXiv `search_query` value.
///
/// Blank input becomes `default_query`. Input already using field syntax
/// (`ti:`, `cat:`, ...) is passed through; plain words search all fields.
pub fn search_query_value(query: &str, default_query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        default_query.to_string()
    } else if query.contains(':') {
        query.to_string()
    } else {
        format!("all:{}", query)
    }
}

/// Build the search URL. Sorting is fixed to newest submissions first.
pub fn build_search_url(base_url: &str, query: &FeedQuery, default_query: &str) -> String {
    format!(
        "{}?search_query={}&start={}&max_results={}&sortBy=submittedDate&sortOrder=descending",
        base_url,
        urlencoding::encode(&search_query_value(&query.query, default_query)),
        query.start,
        query.max_results,
    )
}

/// Build the single-paper lookup URL.
pub fn build_lookup_url(base_url: &str, arxiv_id: &str) -> String {
    format!("{}?id_list={}", base_url, urlencoding::encode(arxiv_id))
}

// ── ID Validation ─────────────────────────────────────────────

/// Validate that a string looks like an arXiv id: new format `YYMM.NNNNN[vN]`
/// or old format `category/NNNNNNN[vN]`.
pub fn validate_arxiv_id(id: &str) -> Result<(), FeedError> {
    let id = id.trim();
    if is_new_style_id(id) || is_old_style_id(id) {
        Ok(())
    } else {
        Err(FeedError::InvalidId { id: id.to_string() })
    }
}

fn split_version(id: &str) -> Option<&str> {
    match id.rsplit_once('v') {
        Some((base, version))
            if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) =>
        {
            Some(base)
        }
        Some(_) => None,
        None => Some(id),
    }
}

fn is_new_style_id(id: &str) -> bool {
    let Some(base) = split_version(id) else {
        return false;
    };
    let Some((yymm, number)) = base.split_once('.') else {
        return false;
    };
    yymm.len() == 4
        && yymm.chars().all(|c| c.is_ascii_digit())
        && (4..=5).contains(&number.len())
        && number.chars().all(|c| c.is_ascii_digit())
}

fn is_old_style_id(id: &str) -> bool {
    let Some((archive, rest)) = id.split_once('/') else {
        return false;
    };
    let Some(number) = split_version(rest) else {
        return false;
    };
    !archive.is_empty()
        && archive
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && number.len() == 7
        && number.chars().all(|c| c.is_ascii_digit())
}

// ── ArXiv API Client ──────────────────────────────────────────

/// HTTP client for the arXiv API.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
    default_query: String,
    timeout_secs: u64,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl ArxivClient {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FeedError::Client {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            default_query: config.default_query.clone(),
            timeout_secs: config.timeout_secs,
            min_interval: Duration::from_millis(config.min_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Wait until the configured interval since the previous request has passed.
    ///
    /// The lock is held across the sleep so requests go out one at a time.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(instant) = *last {
            let elapsed = instant.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_feed(&self, url: &str) -> Result<FeedPage, FeedError> {
        self.rate_limit().await;
        tracing::debug!(url, "Requesting arXiv feed");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                FeedError::Transport {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body = response.text().await.map_err(|e| FeedError::Transport {
            message: format!("Failed to read feed response: {}", e),
        })?;

        Ok(parse_atom_feed(&body))
    }
}

#[async_trait]
impl FeedSource for ArxivClient {
    async fn search(&self, query: &FeedQuery) -> Result<FeedPage, FeedError> {
        let url = build_search_url(&self.base_url, query, &self.default_query);
        let page = self.get_feed(&url).await?;
        tracing::debug!(
            entries = page.entries.len(),
            total = ?page.total_results,
            "arXiv search returned"
        );
        Ok(page)
    }

    async fn fetch_entry(&self, arxiv_id: &str) -> Result<Option<FeedEntry>, FeedError> {
        let clean_id = arxiv_id.trim();
        validate_arxiv_id(clean_id)?;
        let url = build_lookup_url(&self.base_url, clean_id);
        let page = self.get_feed(&url).await?;
        // arXiv answers unknown ids with an entry that only carries an error title.
        Ok(page
            .entries
            .into_iter()
            .find(|entry| entry.id_uri.as_deref().is_some_and(|uri| !uri.contains("/api/errors"))))
    }
}
