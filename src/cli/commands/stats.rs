//! Stats command.

use console::style;

use crate::config::Settings;
use crate::repository::Store;

/// Print the row count of every table.
pub async fn cmd_stats(settings: &Settings) -> anyhow::Result<()> {
    if !tokio::fs::try_exists(&settings.database).await.unwrap_or(false) {
        println!(
            "{} No database at {}. Run 'ytharvest init' or 'ytharvest crawl' first.",
            style("!").yellow(),
            settings.database.display()
        );
        return Ok(());
    }

    let stats = Store::open(&settings.database)?.stats()?;

    println!("{}", style(settings.database.display()).bold());
    println!("{}", "─".repeat(32));
    for (table, count) in &stats.tables {
        println!("{:<20} {:>10}", table.as_str(), count);
    }
    Ok(())
}
