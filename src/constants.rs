/// Statuses the metadata provider reports for titles that are watchable
/// now or still receiving episodes. Anything else (Rumored, Planned, In
/// Production, Post Production, Canceled, Pilot) is not surfaced.
pub const RELEASABLE_STATUSES: &[&str] = &["Released", "Returning Series", "Ended"];

pub mod playback {
    /// Fallback player base when the catalog config store has no override.
    pub const DEFAULT_BASE_URL: &str = "https://superflixapi.buzz";

    /// Path segment under the player base for movies.
    pub const MOVIE_SEGMENT: &str = "filme";

    /// Path segment under the player base for series.
    pub const SERIES_SEGMENT: &str = "serie";
}

pub mod config_keys {

    pub const BASE_PLAYBACK_URL: &str = "base_playback_url";
}

pub mod cache {

    pub const AVAILABILITY_TTL_MINUTES: i64 = 60;
}

pub mod locale {

    pub const METADATA_LANGUAGE: &str = "pt-BR";

    /// Logo pick order: primary display language, then fallback, then
    /// whatever the provider listed first.
    pub const LOGO_LANGUAGE_PRIORITY: &[&str] = &["pt", "en"];

    /// Value of `include_image_language` on image requests; `null` pulls
    /// textless art.
    pub const IMAGE_LANGUAGES: &str = "pt,en,null";
}

pub mod limits {

    pub const MAX_SEARCH_RESULTS: usize = 20;

    pub const SYNC_BATCH_LIMIT: u64 = 50;

    pub const TOP_CAST_SHOWN: usize = 8;
}
