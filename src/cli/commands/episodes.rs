use crate::config::Config;
use crate::domain::TmdbId;
use crate::state::AppState;

pub async fn cmd_episodes(config: &Config, id: i64, season: i32) -> anyhow::Result<()> {
    let state = AppState::new(config.clone()).await?;

    let Some(series) = state
        .store
        .get_series_by_tmdb_id(TmdbId::new(id))
        .await?
    else {
        println!("No series with TMDB id {id} in the catalog.");
        println!("Import it first: vodarr import {id} series");
        return Ok(());
    };

    let episodes = state.discovery.episode_availability(&series.id, season).await?;

    println!("{} - Season {season}", series.title);
    println!("{:-<70}", "");

    if episodes.is_empty() {
        println!("No episodes recorded for this season.");
        return Ok(());
    }

    for row in &episodes {
        let title = row.episode.title.as_deref().unwrap_or("(untitled)");
        let runtime = row
            .episode
            .runtime_minutes
            .map(|m| format!(" ({m} min)"))
            .unwrap_or_default();

        if row.available {
            println!("✓ E{:02}: {title}{runtime}", row.episode.number);
            if let Some(url) = &row.playback_url {
                println!("    {url}");
            }
        } else {
            println!("○ E{:02}: {title}{runtime}", row.episode.number);
        }
    }

    let playable = episodes.iter().filter(|e| e.available).count();
    println!();
    println!("Legend: ✓ Playable | ○ Not on the playback provider");
    println!("{playable} of {} episodes playable", episodes.len());

    Ok(())
}
