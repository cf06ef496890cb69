use crate::config::Config;
use crate::db::Store;
use crate::domain::MediaKind;

pub async fn cmd_remove(config: &Config, id: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    // The internal id says nothing about which table holds it.
    let found = match store.get_movie(id).await? {
        Some(title) => Some(title),
        None => store.get_series(id).await?,
    };

    let Some(title) = found else {
        println!("No catalog entry with ID {id}.");
        println!("Use 'vodarr list' to see catalog IDs.");
        return Ok(());
    };

    println!("Remove '{}' ({}) from the catalog?", title.title, title.kind);
    if title.kind.is_series() {
        println!("This also removes its seasons and episodes.");
    }
    println!("Enter 'y' to confirm, anything else to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if !input.trim().eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = match title.kind {
        MediaKind::Movie => store.remove_movie(id).await?,
        MediaKind::Series => store.remove_series(id).await?,
    };

    if removed {
        println!("✓ Removed: {}", title.title);
    } else {
        println!("Failed to remove catalog entry.");
    }

    Ok(())
}
