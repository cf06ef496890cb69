use crate::config::Config;
use crate::domain::{MediaKind, TmdbId};
use crate::state::AppState;

use super::print_enriched_list;

pub async fn cmd_similar(config: &Config, id: i64, kind_str: &str) -> anyhow::Result<()> {
    let Ok(kind) = kind_str.parse::<MediaKind>() else {
        println!("Invalid media kind: {kind_str} (use movie or series)");
        return Ok(());
    };

    let state = AppState::new(config.clone()).await?;
    let results = state
        .discovery
        .recommendations(TmdbId::new(id), kind)
        .await?;

    if results.is_empty() {
        println!("No recommendations for {kind} {id}.");
        return Ok(());
    }

    println!("Similar to {kind} {id}");
    println!("{:-<70}", "");
    print_enriched_list(&results);

    Ok(())
}
