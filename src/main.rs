//! ytharvest - harvest a channel's videos and comments into SQLite.

mod cli;

// Library modules the CLI refers to as `crate::...`.
pub(crate) use ytharvest::{config, crawler, fetcher, progress, repository};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let default_filter = if cli::is_verbose() {
        "ytharvest=info"
    } else {
        "ytharvest=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
