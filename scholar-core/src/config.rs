//! Configuration system for Scholar.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/scholar/config.toml` and/or `.scholar/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "scholar";
const APPLICATION: &str = "scholar";

/// Largest page arXiv serves per request.
pub const MAX_RESULTS_LIMIT: usize = 2000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScholarConfig {
    pub source: CatalogSource,
    pub feed: FeedConfig,
    pub display: DisplayConfig,
    pub favorites: FavoritesConfig,
}

impl ScholarConfig {
    /// Reject settings the feed client cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "feed.base_url must not be empty".into(),
            });
        }
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.feed.max_results) {
            return Err(ConfigError::Invalid {
                message: format!("feed.max_results must be between 1 and {}", MAX_RESULTS_LIMIT),
            });
        }
        if self.favorites.blob_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "favorites.blob_name must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Where the catalog comes from by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// The embedded sample dataset.
    #[default]
    Static,
    /// The remote arXiv feed.
    Live,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Static => write!(f, "static"),
            CatalogSource::Live => write!(f, "live"),
        }
    }
}

/// Remote feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Query endpoint.
    pub base_url: String,
    /// `search_query` used when the user's query is blank.
    pub default_query: String,
    /// Entries requested per remote page.
    pub max_results: usize,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Minimum gap between consecutive requests. arXiv asks for three seconds.
    pub min_interval_ms: u64,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://export.arxiv.org/api/query".to_string(),
            default_query: "cat:cs.CV".to_string(),
            max_results: 25,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            min_interval_ms: 3000,
            user_agent: format!("Scholar/{} (paper discovery)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Results per page when paginating a local result list.
    pub page_size: NonZeroUsize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Favorites persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    /// Directory holding the favorites blob. Defaults to the user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Name of the blob holding the id array.
    pub blob_name: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            blob_name: "savedPapers".to_string(),
        }
    }
}

impl FavoritesConfig {
    /// The configured directory, or the platform data directory.
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(user_data_dir)
    }
}

/// The per-user data directory (logs, favorites).
pub fn user_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".scholar").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `SCHOLAR_`)
/// 3. Workspace-local config (`.scholar/config.toml`)
/// 4. User config (`~/.config/scholar/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ScholarConfig>,
) -> Result<ScholarConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(ScholarConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // SCHOLAR_FEED__TIMEOUT_SECS, SCHOLAR_DISPLAY__PAGE_SIZE, ...
    figment = figment.merge(Env::prefixed("SCHOLAR_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Check whether any Scholar configuration file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}

/// Write the default configuration to `<workspace>/.scholar/config.toml`.
///
/// Returns the path and whether a new file was written; an existing file is
/// left untouched.
pub fn write_default_config(workspace: &Path) -> anyhow::Result<(PathBuf, bool)> {
    let config_path = workspace_config_path(workspace);
    if config_path.exists() {
        return Ok((config_path, false));
    }
    let toml_str = toml::to_string_pretty(&ScholarConfig::default())?;
    crate::persistence::atomic_write(&config_path, toml_str.as_bytes())?;
    Ok((config_path, true))
}
