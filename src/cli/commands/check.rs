//! Connectivity diagnostics for the store and both upstream providers

use crate::config::Config;
use crate::domain::MediaKind;
use crate::state::AppState;

pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    let state = AppState::new(config.clone()).await?;

    println!("Checking Vodarr connectivity");
    println!("{:-<70}", "");

    match state.store.ping().await {
        Ok(()) => println!("✓ Database reachable"),
        Err(e) => println!("⚠ Database: {e}"),
    }

    if config.tmdb.api_key.is_empty() {
        println!("⚠ TMDB: no API key configured (set TMDB_API_KEY or tmdb.api_key)");
    } else {
        match state.tmdb.trending().await {
            Ok(rows) => println!("✓ TMDB reachable ({} trending rows)", rows.len()),
            Err(e) => println!("⚠ TMDB: {e}"),
        }
    }

    match state.superflix.list_catalog_ids(MediaKind::Movie).await {
        Ok(ids) => println!("✓ Playback provider reachable ({} movie ids)", ids.len()),
        Err(e) => println!("⚠ Playback provider (movies): {e}"),
    }
    match state.superflix.list_catalog_ids(MediaKind::Series).await {
        Ok(ids) => println!("✓ Playback provider reachable ({} series ids)", ids.len()),
        Err(e) => println!("⚠ Playback provider (series): {e}"),
    }

    Ok(())
}
