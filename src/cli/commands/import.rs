use crate::config::Config;
use crate::domain::{MediaKind, TmdbId};
use crate::services::ImportError;
use crate::state::AppState;

pub async fn cmd_import(config: &Config, id: i64, kind_str: &str) -> anyhow::Result<()> {
    let Ok(kind) = kind_str.parse::<MediaKind>() else {
        println!("Invalid media kind: {kind_str} (use movie or series)");
        return Ok(());
    };

    let state = AppState::new(config.clone()).await?;
    let tmdb_id = TmdbId::new(id);

    println!("Importing {kind} {tmdb_id}...");

    match state.import_service.import_title(tmdb_id, kind).await {
        Ok(imported) => {
            println!("✓ Imported: {} (ID: {})", imported.title, imported.internal_id);

            if kind.is_series() {
                let seasons = state.store.seasons_for_series(&imported.internal_id).await?;
                println!("  Seasons imported: {}", seasons.len());
            }
        }
        Err(ImportError::NotAvailable { .. }) => {
            println!("Not available on the playback provider; nothing imported.");
        }
        Err(ImportError::UnknownTitle { .. }) => {
            println!("The metadata provider has no {kind} with id {tmdb_id}.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
