use serde::{Deserialize, Serialize};

use crate::domain::TmdbId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub tmdb_id: TmdbId,
    pub number: i32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub air_date: Option<String>,
    pub episode_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub tmdb_id: TmdbId,
    pub number: i32,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub still_url: Option<String>,
    pub runtime_minutes: Option<i32>,
}
