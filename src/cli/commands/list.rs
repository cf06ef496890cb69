//! Catalog listing command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::CatalogTitle;

pub async fn cmd_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let movies = store.list_movies().await?;
    let series = store.list_series().await?;

    if movies.is_empty() && series.is_empty() {
        println!("The catalog is empty.");
        println!();
        println!("Find titles with: vodarr search \"title\"");
        return Ok(());
    }

    println!(
        "Catalog ({} movies, {} series)",
        movies.len(),
        series.len()
    );
    println!("{:-<70}", "");

    // Tables are each newest-first; merge keeps that order across kinds.
    let mut titles: Vec<CatalogTitle> = movies.into_iter().chain(series).collect();
    titles.sort_by(|a, b| b.added_at.cmp(&a.added_at));

    for title in &titles {
        let year = title
            .release_year
            .map_or_else(|| "????".to_string(), |y| y.to_string());

        println!("• {} ({}) [{}]", title.title, year, title.kind);
        println!("  ID: {} | TMDB: {}", title.id, title.tmdb_id);
    }

    Ok(())
}
