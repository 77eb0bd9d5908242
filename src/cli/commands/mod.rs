//! CLI parser and command dispatch.

mod crawl;
mod init;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, Settings};
use crate::crawler::{DEFAULT_COMMENT_TARGET, DEFAULT_VIDEO_TARGET};

#[derive(Parser)]
#[command(name = "ytharvest")]
#[command(about = "Harvest channels, videos and comments into SQLite")]
#[command(version)]
pub struct Cli {
    /// SQLite database file (overrides config file)
    #[arg(short, long, global = true, env = "YTHARVEST_DATABASE")]
    database: Option<PathBuf>,

    /// Config file path (default: ./ytharvest.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,

    /// Crawl a channel's videos and their comments
    Crawl {
        /// Channel handle, e.g. @somechannel
        handle: String,
        /// Number of videos to crawl
        #[arg(long, default_value_t = DEFAULT_VIDEO_TARGET)]
        videos: usize,
        /// Number of comments to fetch per video
        #[arg(long, default_value_t = DEFAULT_COMMENT_TARGET)]
        comments: usize,
        /// User agent ("impersonate" for a browser UA)
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Show row counts per table
    Stats,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .await
        .map_err(anyhow::Error::msg)?;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    if let Some(database) = cli.database {
        settings.database = database;
    }

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Crawl {
            handle,
            videos,
            comments,
            user_agent,
        } => {
            if user_agent.is_some() {
                settings.user_agent = user_agent;
            }
            crawl::cmd_crawl(&settings, &handle, videos, comments).await
        }
        Commands::Stats => stats::cmd_stats(&settings).await,
    }
}
