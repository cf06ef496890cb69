use crate::config::Config;
use crate::domain::{MediaKind, TmdbId};
use crate::state::AppState;

pub async fn cmd_sync(
    config: &Config,
    id: Option<i64>,
    kind_str: Option<&str>,
) -> anyhow::Result<()> {
    let state = AppState::new(config.clone()).await?;

    let Some(id) = id else {
        println!("Refreshing library metadata...");
        let report = state.import_service.sync_library().await;
        println!(
            "✓ Library sync finished: {} refreshed, {} skipped, {} failed",
            report.synced, report.skipped, report.failed
        );
        return Ok(());
    };

    let Some(kind_str) = kind_str else {
        println!("A media kind is required with an id: vodarr sync {id} <movie|series>");
        return Ok(());
    };
    let Ok(kind) = kind_str.parse::<MediaKind>() else {
        println!("Invalid media kind: {kind_str} (use movie or series)");
        return Ok(());
    };

    let tmdb_id = TmdbId::new(id);
    let Some(title) = state.store.get_title_by_tmdb_id(tmdb_id, kind).await? else {
        println!("No {kind} with TMDB id {id} in the catalog.");
        return Ok(());
    };

    println!("Refreshing '{}'...", title.title);
    state
        .import_service
        .sync_title(title.id, tmdb_id, kind)
        .await?;
    println!("✓ Metadata refreshed.");

    Ok(())
}
