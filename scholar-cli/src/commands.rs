//! CLI subcommand handlers.
//!
//! Each handler returns the text to print so the handlers can be tested
//! without capturing stdout.

use crate::Commands;
use crate::ConfigAction;
use crate::FavoritesAction;
use crate::render;
use anyhow::Context;
use chrono::Utc;
use scholar_core::config::{self, CatalogSource, ScholarConfig};
use scholar_core::feed::ARXIV_ID_PREFIX;
use scholar_core::{
    ArxivClient, Catalog, ConfigError, FavoritesStore, FileBlobStore, FilterSelection,
    LiveSearch, QueryEngine, SearchOutcome, fetch_paper, paginate,
};
use std::num::NonZeroUsize;
use std::path::Path;

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    let output = run_command(command, workspace).await?;
    print!("{}", output);
    Ok(())
}

async fn run_command(command: Commands, workspace: &Path) -> anyhow::Result<String> {
    match command {
        Commands::Search {
            query,
            filters,
            page,
            page_size,
            live,
        } => {
            let config = load(workspace)?;
            let query = query.unwrap_or_default();
            if live || config.source == CatalogSource::Live {
                search_live(&config, &query, &filters, page, page_size).await
            } else {
                search_static(&config, &query, &filters, page, page_size)
            }
        }
        Commands::Show { id, live } => {
            let config = load(workspace)?;
            show(&config, &id, live).await
        }
        Commands::Favorites { action } => {
            let config = load(workspace)?;
            handle_favorites(action, &config)
        }
        Commands::Filters => Ok(render::filter_list(QueryEngine::default().categories())),
        Commands::Config { action } => handle_config(action, workspace),
    }
}

fn load(workspace: &Path) -> anyhow::Result<ScholarConfig> {
    let config = config::load_config(Some(workspace), None).map_err(|e| {
        ConfigError::ParseError {
            message: e.to_string(),
        }
    })?;
    config.validate()?;
    Ok(config)
}

fn open_favorites(config: &ScholarConfig) -> anyhow::Result<FavoritesStore<FileBlobStore>> {
    let dir = config
        .favorites
        .resolve_data_dir()
        .context("No data directory available; set favorites.data_dir")?;
    Ok(FavoritesStore::load(
        FileBlobStore::new(dir),
        config.favorites.blob_name.as_str(),
    ))
}

// ── Search ────────────────────────────────────────────────────

fn search_static(
    config: &ScholarConfig,
    query: &str,
    filters: &[String],
    page: usize,
    page_size: Option<NonZeroUsize>,
) -> anyhow::Result<String> {
    let engine = QueryEngine::default();
    let selection = FilterSelection::from_compound_keys(filters, engine.categories())?;
    let catalog = Catalog::sample();
    let favorites = open_favorites(config)?;

    let results = engine.run(catalog.papers(), query, &selection);
    let page = paginate(
        &results,
        page_size.unwrap_or(config.display.page_size),
        page,
    );

    let mut out = String::new();
    if let Some(line) = render::active_filters(&selection) {
        out.push_str(&line);
        out.push_str("\n\n");
    }
    out.push_str(&render::result_page(&page, |id| favorites.is_favorite(id)));
    Ok(out)
}

/// Result offset of a 1-based live page.
fn feed_offset(page: usize, page_size: usize) -> anyhow::Result<usize> {
    page.saturating_sub(1)
        .checked_mul(page_size)
        .ok_or_else(|| anyhow::anyhow!("Page {} is out of range", page))
}

async fn search_live(
    config: &ScholarConfig,
    query: &str,
    filters: &[String],
    page: usize,
    page_size: Option<NonZeroUsize>,
) -> anyhow::Result<String> {
    let engine = QueryEngine::default();
    let selection = FilterSelection::from_compound_keys(filters, engine.categories())?;
    let favorites = open_favorites(config)?;

    let mut feed = config.feed.clone();
    if let Some(size) = page_size {
        feed.max_results = size.get();
    }
    let start = feed_offset(page, feed.max_results)?;

    let client = ArxivClient::new(&feed)?;
    let mut live = LiveSearch::from_config(client, &feed);
    let SearchOutcome::Applied(window) = live.search(query, start, Utc::now()).await? else {
        anyhow::bail!("Search was superseded before it completed");
    };

    // The feed already matched the text query; filters apply locally.
    let results = engine.filter(live.catalog().papers(), &selection);

    let mut out = String::new();
    if let Some(line) = render::active_filters(&selection) {
        out.push_str(&line);
        out.push_str("\n\n");
    }
    if results.is_empty() {
        out.push_str("No papers match.\n");
    }
    for paper in &results {
        out.push_str(&render::paper_line(paper, favorites.is_favorite(&paper.id)));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render::feed_footer(&window, results.len()));
    out.push('\n');
    Ok(out)
}

// ── Details ───────────────────────────────────────────────────

async fn show(config: &ScholarConfig, id: &str, live: bool) -> anyhow::Result<String> {
    let favorites = open_favorites(config)?;
    let remote = live || config.source == CatalogSource::Live || id.starts_with(ARXIV_ID_PREFIX);
    let paper = if remote {
        let client = ArxivClient::new(&config.feed)?;
        fetch_paper(&client, id, Utc::now()).await?
    } else {
        Catalog::sample().require(id)?.clone()
    };
    Ok(render::paper_details(&paper, favorites.is_favorite(&paper.id)))
}

// ── Favorites ─────────────────────────────────────────────────

fn handle_favorites(action: FavoritesAction, config: &ScholarConfig) -> anyhow::Result<String> {
    let mut favorites = open_favorites(config)?;
    match action {
        FavoritesAction::List => {
            if favorites.is_empty() {
                return Ok("No saved papers yet.\n".to_string());
            }
            let catalog = Catalog::sample();
            let mut out = String::new();
            for paper in favorites.saved_papers(catalog.papers()) {
                out.push_str(&render::paper_line(paper, true));
                out.push('\n');
            }
            // Feed papers are not cached locally; list their ids.
            for id in favorites.ids().iter().filter(|id| catalog.get(id).is_none()) {
                out.push_str(&format!("★ [{}]\n", id));
            }
            out.push_str(&format!(
                "\n{} saved ({})\n",
                favorites.len(),
                favorites.location()
            ));
            Ok(out)
        }
        FavoritesAction::Toggle { id } => {
            let id = id.trim();
            if id.is_empty() {
                anyhow::bail!("Paper id must not be empty");
            }
            favorites
                .toggle(id)
                .with_context(|| format!("Favorite change for '{}' was not saved", id))?;
            if favorites.is_favorite(id) {
                Ok(format!("Added {} to favorites\n", id))
            } else {
                Ok(format!("Removed {} from favorites\n", id))
            }
        }
    }
}

// ── Config ────────────────────────────────────────────────────

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<String> {
    match action {
        ConfigAction::Init => {
            let (config_path, created) = config::write_default_config(workspace)?;
            if created {
                Ok(format!(
                    "Created default configuration at: {}\n",
                    config_path.display()
                ))
            } else {
                Ok(format!(
                    "Configuration file already exists at: {}\n",
                    config_path.display()
                ))
            }
        }
        ConfigAction::Show => {
            let config = load(workspace)?;
            let toml_str = toml::to_string_pretty(&config)?;
            Ok(toml_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholar_core::ScholarError;
    use tempfile::TempDir;

    /// A workspace whose favorites live inside the temp dir.
    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        let scholar_dir = dir.path().join(".scholar");
        std::fs::create_dir_all(&scholar_dir).unwrap();
        let data_dir = dir.path().join("data");
        std::fs::write(
            scholar_dir.join("config.toml"),
            format!(
                "source = \"static\"\n\n[favorites]\ndata_dir = {:?}\n",
                data_dir.display().to_string()
            ),
        )
        .unwrap();
        dir
    }

    fn search(query: &str, filters: &[&str], page: usize) -> Commands {
        Commands::Search {
            query: Some(query.to_string()),
            filters: filters.iter().map(|f| f.to_string()).collect(),
            page,
            page_size: None,
            live: false,
        }
    }

    #[tokio::test]
    async fn test_search_static_transformer() {
        let dir = workspace();
        let out = run_command(search("transformer", &[], 1), dir.path())
            .await
            .unwrap();
        assert!(out.contains("[1] Vision Transformer for Small-Size Datasets"));
        assert!(out.contains("Page 1 of 1 (1 results)"));
    }

    #[tokio::test]
    async fn test_search_static_with_filters_and_page_size() {
        let dir = workspace();
        let command = Commands::Search {
            query: None,
            filters: vec!["year-2023".into()],
            page: 9,
            page_size: NonZeroUsize::new(2),
            live: false,
        };
        let out = run_command(command, dir.path()).await.unwrap();
        assert!(out.starts_with("Filters: year-2023\n"));
        assert!(out.contains("Page 3 of 3 (5 results)"));
        assert!(out.contains("[5] 3D Scene Understanding"));
    }

    #[tokio::test]
    async fn test_search_rejects_malformed_filter() {
        let dir = workspace();
        let err = run_command(search("", &["cvpr"], 1), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScholarError>(),
            Some(ScholarError::InvalidFilter { .. })
        ));
    }

    #[tokio::test]
    async fn test_show_static_paper() {
        let dir = workspace();
        let out = run_command(
            Commands::Show {
                id: "4".into(),
                live: false,
            },
            dir.path(),
        )
        .await
        .unwrap();
        assert!(out.starts_with("Contrastive Learning of Visual Representations\n"));
        assert!(out.contains("citations:  320"));
    }

    #[tokio::test]
    async fn test_show_missing_paper_is_not_found() {
        let dir = workspace();
        let err = run_command(
            Commands::Show {
                id: "42".into(),
                live: false,
            },
            dir.path(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScholarError>(),
            Some(ScholarError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_favorites_toggle_and_list() {
        let dir = workspace();
        let toggle = |id: &str| Commands::Favorites {
            action: FavoritesAction::Toggle { id: id.into() },
        };

        let out = run_command(toggle("2"), dir.path()).await.unwrap();
        assert_eq!(out, "Added 2 to favorites\n");
        run_command(toggle("arxiv-2301.00001v1"), dir.path())
            .await
            .unwrap();

        let list = Commands::Favorites {
            action: FavoritesAction::List,
        };
        let out = run_command(list, dir.path()).await.unwrap();
        assert!(out.contains("★ [2] Real-time Object Detection with Sparse Attention"));
        assert!(out.contains("★ [arxiv-2301.00001v1]"));
        assert!(out.contains("2 saved"));
        assert!(dir.path().join("data").join("savedPapers.json").exists());

        let out = run_command(search("", &[], 1), dir.path()).await.unwrap();
        assert!(out.contains("★ [2]"));

        let out = run_command(toggle("2"), dir.path()).await.unwrap();
        assert_eq!(out, "Removed 2 from favorites\n");
    }

    #[tokio::test]
    async fn test_favorites_list_empty() {
        let dir = workspace();
        let list = Commands::Favorites {
            action: FavoritesAction::List,
        };
        let out = run_command(list, dir.path()).await.unwrap();
        assert_eq!(out, "No saved papers yet.\n");
    }

    #[tokio::test]
    async fn test_filters_lists_compound_keys() {
        let dir = workspace();
        let out = run_command(Commands::Filters, dir.path()).await.unwrap();
        assert!(out.contains("conference-neurips"));
        assert!(out.contains("topic-self-supervised"));
    }

    #[tokio::test]
    async fn test_config_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let init = || Commands::Config {
            action: ConfigAction::Init,
        };

        let out = run_command(init(), dir.path()).await.unwrap();
        assert!(out.starts_with("Created default configuration"));
        let config_path = dir.path().join(".scholar").join("config.toml");
        let first = std::fs::read_to_string(&config_path).unwrap();

        let out = run_command(init(), dir.path()).await.unwrap();
        assert!(out.starts_with("Configuration file already exists"));
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), first);

        let parsed: ScholarConfig = toml::from_str(&first).unwrap();
        assert_eq!(parsed, ScholarConfig::default());
    }

    #[tokio::test]
    async fn test_config_show_reflects_workspace() {
        let dir = workspace();
        let out = run_command(
            Commands::Config {
                action: ConfigAction::Show,
            },
            dir.path(),
        )
        .await
        .unwrap();
        assert!(out.contains("source = \"static\""));
        assert!(out.contains("data_dir"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let scholar_dir = dir.path().join(".scholar");
        std::fs::create_dir_all(&scholar_dir).unwrap();
        std::fs::write(scholar_dir.join("config.toml"), "[feed]\nmax_results = 0\n").unwrap();

        let err = run_command(search("", &[], 1), dir.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_feed_offset() {
        assert_eq!(feed_offset(1, 25).unwrap(), 0);
        assert_eq!(feed_offset(0, 25).unwrap(), 0);
        assert_eq!(feed_offset(3, 25).unwrap(), 50);
        assert!(feed_offset(usize::MAX, 25).is_err());
    }

    #[tokio::test]
    async fn test_live_search_rejects_huge_page() {
        let dir = workspace();
        let command = Commands::Search {
            query: Some("vit".to_string()),
            filters: Vec::new(),
            page: usize::MAX,
            page_size: None,
            live: true,
        };
        let err = run_command(command, dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
