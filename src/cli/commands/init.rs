//! Initialize command.

use console::style;

use crate::config::Settings;
use crate::repository::Store;

/// Create the database and its schema.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    if let Some(parent) = settings.database.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    Store::open(&settings.database)?;

    println!(
        "{} Initialized database {}",
        style("✓").green(),
        settings.database.display()
    );
    Ok(())
}
