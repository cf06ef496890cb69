use crate::config::Config;
use crate::services::import_service::CollectionItem;
use crate::state::AppState;

use super::print_enriched_list;

pub async fn cmd_collection(config: &Config, id: i64, import: bool) -> anyhow::Result<()> {
    let state = AppState::new(config.clone()).await?;

    let Some(preview) = state.discovery.collection_preview(id).await? else {
        println!("No collection with id {id}.");
        return Ok(());
    };

    println!("Collection: {}", preview.name);
    println!("{:-<70}", "");
    if let Some(overview) = &preview.overview {
        println!("{overview}");
        println!();
    }
    print_enriched_list(&preview.parts);

    if !import {
        println!();
        println!("Import the available parts with: vodarr collection {id} --import");
        return Ok(());
    }

    let items: Vec<CollectionItem> = preview
        .parts
        .iter()
        .filter(|part| part.available && !part.in_library)
        .map(|part| CollectionItem {
            tmdb_id: part.tmdb_id,
            kind: part.kind,
        })
        .collect();

    if items.is_empty() {
        println!();
        println!("Nothing to import: every available part is already in the catalog.");
        return Ok(());
    }

    println!();
    println!("Importing {} part(s)...", items.len());

    let report = state.import_service.import_collection(items).await;

    println!(
        "✓ Collection import finished: {} imported, {} failed",
        report.imported, report.failed
    );
    for failure in &report.failed_items {
        println!("  ⚠ {}: {}", failure.tmdb_id, failure.error);
    }

    Ok(())
}
