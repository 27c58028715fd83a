//! Scholar CLI: search, filter, and bookmark research papers from the terminal.
//!
//! Works against the embedded sample catalog or the live arXiv feed.

mod commands;
mod render;

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Scholar: research paper discovery
#[derive(Parser, Debug)]
#[command(name = "scholar", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search papers by free text and filters
    Search {
        /// Text matched against titles, abstracts, authors and tags
        query: Option<String>,
        /// Filter as <category>-<option>, e.g. conference-cvpr (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<String>,
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Results per page
        #[arg(long)]
        page_size: Option<NonZeroUsize>,
        /// Query the arXiv feed instead of the sample catalog
        #[arg(long)]
        live: bool,
    },
    /// Show the details of one paper
    Show {
        /// Paper id (sample ids are numerals, feed ids start with "arxiv-")
        id: String,
        /// Look the paper up on the arXiv feed
        #[arg(long)]
        live: bool,
    },
    /// Manage favorite papers
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// List the available filters
    Filters,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum FavoritesAction {
    /// List saved papers
    List,
    /// Add a paper to favorites, or remove it if already saved
    Toggle {
        /// Paper id
        id: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default configuration file
    Init,
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "scholar", "scholar")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "scholar.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace).await
}
