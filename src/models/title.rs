use serde::{Deserialize, Serialize};

use crate::domain::{MediaKind, TmdbId};

/// A catalog row independent of which table it came from. Movies carry a
/// runtime; series carry seasons (fetched separately).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTitle {
    pub id: String,
    pub tmdb_id: TmdbId,
    pub kind: MediaKind,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub logo_url: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f32>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub video_url: Option<String>,
    pub added_at: String,
}

impl CatalogTitle {
    /// Player link for one episode of a series: the stored base link with
    /// `/{season}/{episode}` appended. Derived on demand, never persisted.
    #[must_use]
    pub fn episode_playback_url(&self, season: i32, episode: i32) -> Option<String> {
        let base = self.video_url.as_deref()?;
        let base = base.strip_suffix('/').unwrap_or(base);
        Some(format!("{base}/{season}/{episode}"))
    }
}

/// The columns a metadata sync is allowed to rewrite. Playback link,
/// internal id and added-at stay whatever import (or the operator) made
/// them.
#[derive(Debug, Clone, Default)]
pub struct DescriptiveFields {
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub logo_url: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f32>,
    pub genre: Option<String>,
}
