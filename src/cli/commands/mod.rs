mod check;
mod collection;
mod config;
mod discover;
mod episodes;
mod import;
mod info;
mod list;
mod remove;
mod resolve;
mod search;
mod similar;
mod sync;

pub use check::cmd_check;
pub use collection::cmd_collection;
pub use config::{cmd_config_get, cmd_config_set};
pub use discover::cmd_discover;
pub use episodes::cmd_episodes;
pub use import::cmd_import;
pub use info::cmd_title_info;
pub use list::cmd_list;
pub use remove::cmd_remove;
pub use resolve::cmd_resolve;
pub use search::cmd_search;
pub use similar::cmd_similar;
pub use sync::cmd_sync;

use crate::models::EnrichedResult;

/// Shared numbered-listing format for search, charts, recommendations
/// and collection parts.
pub(crate) fn print_enriched_list(rows: &[EnrichedResult]) {
    for (i, row) in rows.iter().enumerate() {
        let year = row
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .unwrap_or("????");

        let marker = if row.in_library {
            "in library"
        } else if row.available {
            "available"
        } else {
            "not available"
        };

        println!("[{}] {} ({}) [{}]", i + 1, row.title, year, row.kind);

        let rating = row
            .rating
            .map(|r| format!(" | Rating: {r:.1}"))
            .unwrap_or_default();
        println!("    TMDB: {} | {}{}", row.tmdb_id, marker, rating);
    }
}
