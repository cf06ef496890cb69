use crate::config::Config;
use crate::domain::{MediaKind, TmdbId};
use crate::services::Resolution;
use crate::state::AppState;

pub async fn cmd_resolve(config: &Config, id: i64, kind_str: &str) -> anyhow::Result<()> {
    let Ok(kind) = kind_str.parse::<MediaKind>() else {
        println!("Invalid media kind: {kind_str} (use movie or series)");
        return Ok(());
    };

    let state = AppState::new(config.clone()).await?;

    match state.resolver.resolve_detailed(TmdbId::new(id), kind).await {
        Resolution::FoundExisting { internal_id } => {
            println!("✓ Resolves to catalog entry {internal_id}");
        }
        Resolution::Added { internal_id } => {
            println!("✓ Imported on resolve as {internal_id}");
        }
        Resolution::RejectedUnreleased { reason } => {
            println!("Rejected: {reason}");
        }
        Resolution::RejectedUnavailable => {
            println!("Rejected: not available on the playback provider");
        }
        Resolution::NotFound => {
            println!("Not in the catalog.");
            println!("Eligible titles appear here once imported: vodarr import {id} {kind}");
        }
    }

    Ok(())
}
