use crate::clients::tmdb::TitleDetails;
use crate::config::Config;
use crate::domain::{MediaKind, TmdbId};
use crate::state::AppState;

pub async fn cmd_title_info(config: &Config, id: i64, kind_str: &str) -> anyhow::Result<()> {
    let Ok(kind) = kind_str.parse::<MediaKind>() else {
        println!("Invalid media kind: {kind_str} (use movie or series)");
        return Ok(());
    };

    let state = AppState::new(config.clone()).await?;

    let Some(info) = state.discovery.title_info(TmdbId::new(id), kind).await? else {
        println!("No {kind} with TMDB id {id}.");
        return Ok(());
    };

    println!("Title Info");
    println!("{:-<70}", "");
    println!("Title:     {}", info.details.title());
    println!("TMDB:      {id} ({kind})");
    if let Some(date) = info.details.release_date() {
        println!("Released:  {date}");
    }
    if let Some(status) = info.details.status() {
        println!("Status:    {status}");
    }
    if let Some(rating) = info.details.vote_average() {
        println!("Rating:    {rating:.1}");
    }
    if let Some(genre) = info.details.primary_genre() {
        println!("Genre:     {genre}");
    }

    match &info.details {
        TitleDetails::Movie(movie) => {
            if let Some(runtime) = movie.runtime {
                println!("Runtime:   {runtime} min");
            }
            if let Some(collection) = &movie.belongs_to_collection {
                println!(
                    "Franchise: {} (collection {})",
                    collection.name, collection.id
                );
            }
        }
        TitleDetails::Series(series) => {
            let regular = series
                .seasons
                .iter()
                .filter(|s| s.season_number > 0)
                .count();
            println!("Seasons:   {regular}");
        }
    }

    println!(
        "Playable:  {}",
        if info.available { "yes" } else { "no" }
    );
    if info.in_library {
        println!("Library:   already imported");
    }

    if let Some(overview) = info.details.overview() {
        println!();
        println!("{overview}");
    }

    if !info.cast.is_empty() {
        println!();
        println!("Top cast:");
        for member in &info.cast {
            match &member.character {
                Some(character) => println!("  {} as {character}", member.name),
                None => println!("  {}", member.name),
            }
        }
    }

    println!();
    Ok(())
}
