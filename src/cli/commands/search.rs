use crate::config::Config;
use crate::state::AppState;

use super::print_enriched_list;

pub async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let state = AppState::new(config.clone()).await?;
    let results = state.discovery.search(query).await?;

    if results.is_empty() {
        println!("No titles found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results ({} found)", results.len());
    println!("{:-<70}", "");
    print_enriched_list(&results);

    println!();
    println!("Import with: vodarr import <tmdb_id> <movie|series>");

    Ok(())
}
