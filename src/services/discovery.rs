//! Browsing surfaces: search, charts, recommendations, collection
//! preview, title info and per-season episode availability.
//!
//! Everything here is read-only. Listings come from the metadata
//! provider and are decorated concurrently with local knowledge; the
//! catalog overview and episode browse read the store. Nothing in this
//! module writes a row.

use crate::clients::tmdb::{
    CastMember, CollectionPart, DiscoveryItem, ImageSize, TitleDetails, TmdbClient, image_url,
};
use crate::constants::limits;
use crate::db::Store;
use crate::domain::{MediaKind, TmdbId};
use crate::models::{CatalogTitle, EnrichedResult, EpisodeAvailability};
use crate::services::availability::AvailabilityService;
use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Collection header plus its parts run through enrichment.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionPreview {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub parts: Vec<EnrichedResult>,
}

/// Operator view of one title: full details plus top-billed cast.
#[derive(Debug, Clone)]
pub struct TitleInfo {
    pub details: TitleDetails,
    pub cast: Vec<CastMember>,
    pub available: bool,
    pub in_library: bool,
}

/// Both catalog tables, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogOverview {
    pub movies: Vec<CatalogTitle>,
    pub series: Vec<CatalogTitle>,
}

/// Collection parts carry no kind discriminator; a franchise groups
/// movies by definition.
fn part_to_item(part: CollectionPart) -> DiscoveryItem {
    DiscoveryItem {
        id: part.id,
        media_type: Some("movie".to_string()),
        title: Some(part.title),
        release_date: part.release_date,
        overview: part.overview,
        poster_path: part.poster_path,
        vote_average: None,
    }
}

pub struct DiscoveryService {
    store: Store,
    tmdb: TmdbClient,
    availability: Arc<AvailabilityService>,
}

impl DiscoveryService {
    #[must_use]
    pub const fn new(store: Store, tmdb: TmdbClient, availability: Arc<AvailabilityService>) -> Self {
        Self {
            store,
            tmdb,
            availability,
        }
    }

    /// Decorates listing rows with availability and catalog membership.
    ///
    /// All rows are enriched concurrently and come back in input order.
    /// A store failure for one row degrades that row to not-in-library;
    /// it never aborts the set. Rows whose kind cannot be determined
    /// (person results, unknown types) are dropped.
    async fn enrich(
        &self,
        items: Vec<DiscoveryItem>,
        fallback_kind: Option<MediaKind>,
    ) -> Vec<EnrichedResult> {
        let futures: Vec<_> = items
            .into_iter()
            .filter_map(|item| item.kind().or(fallback_kind).map(|kind| (item, kind)))
            .map(|(item, kind)| async move {
                let tmdb_id = TmdbId::new(item.id);
                let available = self.availability.is_available(tmdb_id, kind).await;
                let in_library = matches!(
                    self.store.get_title_by_tmdb_id(tmdb_id, kind).await,
                    Ok(Some(_))
                );

                EnrichedResult {
                    tmdb_id,
                    kind,
                    title: item.title.unwrap_or_default(),
                    release_date: item.release_date,
                    overview: item.overview,
                    poster_url: item
                        .poster_path
                        .as_deref()
                        .map(|p| image_url(p, ImageSize::W500)),
                    rating: item.vote_average,
                    available,
                    in_library,
                }
            })
            .collect();

        join_all(futures).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<EnrichedResult>> {
        info!("Searching for '{}'", query);
        let hits = self.tmdb.search_multi(query).await?;
        Ok(self.enrich(hits, None).await)
    }

    pub async fn trending(&self) -> Result<Vec<EnrichedResult>> {
        let items = self.tmdb.trending().await?;
        Ok(self.enrich(items, None).await)
    }

    /// Chart endpoints return bare rows without a kind discriminator, so
    /// the requested kind rides along as the fallback.
    pub async fn popular(&self, kind: MediaKind) -> Result<Vec<EnrichedResult>> {
        let items = self.tmdb.popular(kind).await?;
        Ok(self.enrich(items, Some(kind)).await)
    }

    pub async fn top_rated(&self, kind: MediaKind) -> Result<Vec<EnrichedResult>> {
        let items = self.tmdb.top_rated(kind).await?;
        Ok(self.enrich(items, Some(kind)).await)
    }

    pub async fn recommendations(
        &self,
        tmdb_id: TmdbId,
        kind: MediaKind,
    ) -> Result<Vec<EnrichedResult>> {
        let items = self.tmdb.recommendations(tmdb_id, kind).await?;
        Ok(self.enrich(items, Some(kind)).await)
    }

    pub async fn collection_preview(&self, collection_id: i64) -> Result<Option<CollectionPreview>> {
        let Some(collection) = self.tmdb.collection(collection_id).await? else {
            return Ok(None);
        };

        let parts: Vec<DiscoveryItem> =
            collection.parts.into_iter().map(part_to_item).collect();

        Ok(Some(CollectionPreview {
            id: collection.id,
            name: collection.name,
            overview: collection.overview,
            parts: self.enrich(parts, None).await,
        }))
    }

    /// Details and credits for one title. `None` when the provider has
    /// no such id; the cast list is capped to the top-billed names.
    pub async fn title_info(&self, tmdb_id: TmdbId, kind: MediaKind) -> Result<Option<TitleInfo>> {
        let (details, mut cast) = tokio::try_join!(
            self.tmdb.title_details(tmdb_id, kind),
            self.tmdb.credits(tmdb_id, kind),
        )?;

        let Some(details) = details else {
            return Ok(None);
        };

        cast.truncate(limits::TOP_CAST_SHOWN);

        let available = self.availability.is_available(tmdb_id, kind).await;
        let in_library = self
            .store
            .get_title_by_tmdb_id(tmdb_id, kind)
            .await?
            .is_some();

        Ok(Some(TitleInfo {
            details,
            cast,
            available,
            in_library,
        }))
    }

    /// Both catalog tables in one shot. Strict: a failure reading either
    /// table fails the overview as a unit.
    pub async fn catalog_overview(&self) -> Result<CatalogOverview> {
        let (movies, series) = tokio::try_join!(self.store.list_movies(), self.store.list_series())?;
        Ok(CatalogOverview { movies, series })
    }

    /// Catalog episodes of one season joined with the provider's
    /// genuinely linkable episode numbers. A scrape failure upstream
    /// shows every episode as unavailable rather than erroring.
    pub async fn episode_availability(
        &self,
        series_internal_id: &str,
        season_number: i32,
    ) -> Result<Vec<EpisodeAvailability>> {
        let series = self
            .store
            .get_series(series_internal_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("No series with id {series_internal_id}"))?;

        let season = self
            .store
            .season_by_number(series_internal_id, season_number)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!("No season {season_number} for '{}'", series.title)
            })?;

        let episodes = self.store.episodes_for_season(season.tmdb_id).await?;
        let linkable = self
            .availability
            .available_episodes(series.tmdb_id, season_number)
            .await;

        Ok(episodes
            .into_iter()
            .map(|episode| {
                let available = linkable.contains(&episode.number);
                let playback_url = available
                    .then(|| series.episode_playback_url(season_number, episode.number))
                    .flatten();
                EpisodeAvailability {
                    episode,
                    available,
                    playback_url,
                }
            })
            .collect())
    }
}
