//! Default implementation of the `ImportService` trait.

use crate::clients::superflix;
use crate::clients::tmdb::{ImageSize, SeasonSummary, TitleDetails, image_url};
use crate::constants::{config_keys, playback};
use crate::db::Store;
use crate::domain::{MediaKind, TmdbId};
use crate::models::{CatalogTitle, DescriptiveFields, Episode, Season};
use crate::services::availability::AvailabilityService;
use crate::services::clock::Clock;
use crate::services::import_service::{
    CollectionImportReport, CollectionItem, FailedImport, ImportError, ImportService,
    ImportedTitle, LibrarySyncReport,
};
use crate::services::metadata::MetadataProvider;
use crate::services::pacing::Pacer;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the catalog row an import writes, resolving provider image
/// paths to full CDN URLs.
fn map_details(
    details: &TitleDetails,
    logo_url: Option<String>,
    video_url: Option<String>,
    internal_id: String,
    added_at: String,
) -> CatalogTitle {
    CatalogTitle {
        id: internal_id,
        tmdb_id: details.tmdb_id(),
        kind: details.kind(),
        title: details.title().to_string(),
        description: details.overview().map(ToString::to_string),
        poster_url: details
            .poster_path()
            .map(|p| image_url(p, ImageSize::W500)),
        backdrop_url: details
            .backdrop_path()
            .map(|p| image_url(p, ImageSize::Original)),
        logo_url,
        release_year: details.release_year(),
        rating: details.vote_average(),
        genre: details.primary_genre().map(ToString::to_string),
        runtime_minutes: match details {
            TitleDetails::Movie(m) => m.runtime,
            TitleDetails::Series(_) => None,
        },
        video_url,
        added_at,
    }
}

/// Merges freshly fetched metadata over an existing row.
///
/// A field the provider no longer reports keeps its stored value; a
/// refresh must never blank out data we already have.
fn descriptive_update(
    existing: &CatalogTitle,
    details: &TitleDetails,
    logo_url: Option<String>,
) -> DescriptiveFields {
    DescriptiveFields {
        title: details.title().to_string(),
        description: details
            .overview()
            .map(ToString::to_string)
            .or_else(|| existing.description.clone()),
        poster_url: details
            .poster_path()
            .map(|p| image_url(p, ImageSize::W500))
            .or_else(|| existing.poster_url.clone()),
        backdrop_url: details
            .backdrop_path()
            .map(|p| image_url(p, ImageSize::Original))
            .or_else(|| existing.backdrop_url.clone()),
        logo_url: logo_url.or_else(|| existing.logo_url.clone()),
        release_year: details.release_year().or(existing.release_year),
        rating: details.vote_average().or(existing.rating),
        genre: details
            .primary_genre()
            .map(ToString::to_string)
            .or_else(|| existing.genre.clone()),
    }
}

pub struct DefaultImportService {
    store: Store,
    metadata: Arc<dyn MetadataProvider>,
    availability: Arc<AvailabilityService>,
    clock: Arc<dyn Clock>,
    import_delay_ms: u64,
    batch_limit: u64,
}

impl DefaultImportService {
    #[must_use]
    pub const fn new(
        store: Store,
        metadata: Arc<dyn MetadataProvider>,
        availability: Arc<AvailabilityService>,
        clock: Arc<dyn Clock>,
        import_delay_ms: u64,
        batch_limit: u64,
    ) -> Self {
        Self {
            store,
            metadata,
            availability,
            clock,
            import_delay_ms,
            batch_limit,
        }
    }

    async fn playback_base(&self) -> Result<String, ImportError> {
        Ok(self
            .store
            .get_config_or(config_keys::BASE_PLAYBACK_URL, playback::DEFAULT_BASE_URL)
            .await?)
    }

    /// Imports every regular season of a series, continuing past
    /// individual failures so one bad season cannot sink the rest.
    async fn import_seasons(
        &self,
        series_internal_id: &str,
        series_id: TmdbId,
        seasons: &[SeasonSummary],
    ) {
        for summary in seasons {
            // Specials (season 0) are not imported.
            if summary.season_number == 0 {
                continue;
            }

            if let Err(e) = self
                .import_one_season(series_internal_id, series_id, summary)
                .await
            {
                warn!(
                    series = %series_id,
                    season = summary.season_number,
                    error = %e,
                    "Failed to import season"
                );
            }
        }
    }

    async fn import_one_season(
        &self,
        series_internal_id: &str,
        series_id: TmdbId,
        summary: &SeasonSummary,
    ) -> Result<(), ImportError> {
        let season = Season {
            tmdb_id: TmdbId::new(summary.id),
            number: summary.season_number,
            name: summary.name.clone(),
            overview: summary.overview.clone(),
            poster_url: summary
                .poster_path
                .as_deref()
                .map(|p| image_url(p, ImageSize::W500)),
            air_date: summary.air_date.clone(),
            episode_count: summary.episode_count,
        };
        self.store.upsert_season(series_internal_id, &season).await?;

        let Some(season_details) = self
            .metadata
            .season_details(series_id, summary.season_number)
            .await
            .map_err(|e| ImportError::metadata_error(e.to_string()))?
        else {
            return Ok(());
        };

        let episodes: Vec<Episode> = season_details
            .episodes
            .iter()
            .map(|ep| Episode {
                tmdb_id: TmdbId::new(ep.id),
                number: ep.episode_number,
                title: ep.name.clone(),
                overview: ep.overview.clone(),
                still_url: ep
                    .still_path
                    .as_deref()
                    .map(|p| image_url(p, ImageSize::W300)),
                runtime_minutes: ep.runtime,
            })
            .collect();

        self.store.upsert_episodes(season.tmdb_id, &episodes).await?;
        Ok(())
    }

    async fn sync_one(&self, report: &mut LibrarySyncReport, title: CatalogTitle) {
        match self
            .sync_title(title.id.clone(), title.tmdb_id, title.kind)
            .await
        {
            Ok(()) => report.synced += 1,
            Err(ImportError::UnknownTitle { .. }) => {
                // Provider no longer knows the id; nothing to refresh.
                report.skipped += 1;
            }
            Err(e) => {
                warn!(tmdb_id = %title.tmdb_id, error = %e, "Failed to refresh title");
                report.failed += 1;
            }
        }
    }
}

#[async_trait]
impl ImportService for DefaultImportService {
    async fn import_title(
        &self,
        tmdb_id: TmdbId,
        kind: MediaKind,
    ) -> Result<ImportedTitle, ImportError> {
        if !self.availability.is_available(tmdb_id, kind).await {
            return Err(ImportError::NotAvailable { tmdb_id, kind });
        }

        let (details, logo) = tokio::try_join!(
            self.metadata.title_details(tmdb_id, kind),
            self.metadata.logo_url(tmdb_id, kind),
        )
        .map_err(|e| ImportError::metadata_error(e.to_string()))?;

        let details = details.ok_or(ImportError::UnknownTitle { tmdb_id, kind })?;

        let playback_base = self.playback_base().await?;
        let video_url = Some(superflix::playback_url(&playback_base, kind, tmdb_id));

        let title = map_details(
            &details,
            logo,
            video_url,
            uuid::Uuid::new_v4().to_string(),
            self.clock.now().to_rfc3339(),
        );

        let stored = match kind {
            MediaKind::Movie => self.store.upsert_movie(&title).await?,
            MediaKind::Series => self.store.upsert_series(&title).await?,
        };

        if let TitleDetails::Series(ref series) = details {
            self.import_seasons(&stored.id, tmdb_id, &series.seasons)
                .await;
        }

        info!("Imported {}: {} (tmdb {})", kind, stored.title, stored.tmdb_id);

        Ok(ImportedTitle {
            internal_id: stored.id,
            tmdb_id: stored.tmdb_id,
            kind,
            title: stored.title,
        })
    }

    async fn import_collection(&self, items: Vec<CollectionItem>) -> CollectionImportReport {
        let mut report = CollectionImportReport::default();
        let mut pacer = Pacer::from_millis(self.import_delay_ms);

        info!("Importing collection of {} titles", items.len());

        for item in items {
            pacer.pace().await;

            match self.import_title(item.tmdb_id, item.kind).await {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    warn!(tmdb_id = %item.tmdb_id, error = %e, "Collection item failed to import");
                    report.failed_items.push(FailedImport {
                        tmdb_id: item.tmdb_id,
                        error: e.to_string(),
                    });
                    report.failed += 1;
                }
            }
        }

        info!(
            "Collection import finished: {} imported, {} failed",
            report.imported, report.failed
        );
        report
    }

    async fn sync_title(
        &self,
        internal_id: String,
        tmdb_id: TmdbId,
        kind: MediaKind,
    ) -> Result<(), ImportError> {
        let existing = match kind {
            MediaKind::Movie => self.store.get_movie(&internal_id).await?,
            MediaKind::Series => self.store.get_series(&internal_id).await?,
        }
        .ok_or_else(|| ImportError::TitleNotFound(internal_id.clone()))?;

        let (details, logo) = tokio::try_join!(
            self.metadata.title_details(tmdb_id, kind),
            self.metadata.logo_url(tmdb_id, kind),
        )
        .map_err(|e| ImportError::metadata_error(e.to_string()))?;

        let details = details.ok_or(ImportError::UnknownTitle { tmdb_id, kind })?;

        let fields = descriptive_update(&existing, &details, logo);

        let updated = match kind {
            MediaKind::Movie => self.store.update_movie_descriptive(tmdb_id, &fields).await?,
            MediaKind::Series => {
                self.store
                    .update_series_descriptive(tmdb_id, &fields)
                    .await?
            }
        };

        if !updated {
            return Err(ImportError::TitleNotFound(internal_id));
        }

        info!("Synced metadata for {}: {}", kind, fields.title);
        Ok(())
    }

    async fn sync_library(&self) -> LibrarySyncReport {
        let mut report = LibrarySyncReport::default();
        let mut pacer = Pacer::from_millis(self.import_delay_ms);

        let movies = match self.store.list_movies_batch(self.batch_limit).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Library sync could not list movies: {}", e);
                Vec::new()
            }
        };
        let series = match self.store.list_series_batch(self.batch_limit).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Library sync could not list series: {}", e);
                Vec::new()
            }
        };

        info!(
            "Refreshing metadata for {} movies and {} series",
            movies.len(),
            series.len()
        );

        for title in movies.into_iter().chain(series) {
            pacer.pace().await;
            self.sync_one(&mut report, title).await;
        }

        info!(
            "Library sync finished: {} synced, {} skipped, {} failed",
            report.synced, report.skipped, report.failed
        );
        report
    }
}
