use crate::config::Config;
use crate::domain::MediaKind;
use crate::state::AppState;

use super::print_enriched_list;

pub async fn cmd_discover(config: &Config, chart: &str, kind_str: &str) -> anyhow::Result<()> {
    let Ok(kind) = kind_str.parse::<MediaKind>() else {
        println!("Invalid media kind: {kind_str} (use movie or series)");
        return Ok(());
    };

    let state = AppState::new(config.clone()).await?;

    let (heading, results) = match chart {
        "trending" => ("Trending this week".to_string(), state.discovery.trending().await?),
        "popular" => (
            format!("Popular {kind}s"),
            state.discovery.popular(kind).await?,
        ),
        "top-rated" | "top" => (
            format!("Top rated {kind}s"),
            state.discovery.top_rated(kind).await?,
        ),
        other => {
            println!("Unknown chart: {other}");
            println!("Use: trending, popular, top-rated");
            return Ok(());
        }
    };

    if results.is_empty() {
        println!("Nothing to show.");
        return Ok(());
    }

    println!("{heading}");
    println!("{:-<70}", "");
    print_enriched_list(&results);

    Ok(())
}
