use serde::Serialize;

use super::season::Episode;
use crate::domain::{MediaKind, TmdbId};

/// A listing row decorated with what this catalog knows about it.
///
/// Search hits, charts and collection parts all pass through the same
/// enrichment, so operators see at a glance whether a row is playable
/// upstream and whether it is already imported.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedResult {
    pub tmdb_id: TmdbId,
    pub kind: MediaKind,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub rating: Option<f32>,
    pub available: bool,
    pub in_library: bool,
}

/// One catalog episode joined with whether the upstream can actually
/// play it right now. The deep link is only derived for playable
/// episodes.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeAvailability {
    pub episode: Episode,
    pub available: bool,
    pub playback_url: Option<String>,
}
