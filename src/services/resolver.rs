//! Eligibility decisions for titles reached from outside the catalog.
//!
//! A recommendation click or deep link carries only an external id; the
//! resolver decides whether that id maps to a local row. It is read-mostly
//! by policy: every recommendation click inserting a row would amplify
//! writes and surface unreleased or delisted content through stale links,
//! so insertion only happens behind an explicit config toggle.

use crate::constants::RELEASABLE_STATUSES;
use crate::db::Store;
use crate::domain::{MediaKind, TmdbId};
use crate::services::availability::AvailabilityService;
use crate::services::clock::Clock;
use crate::services::import_service::ImportService;
use crate::services::metadata::MetadataProvider;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Terminal outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The catalog already had the row; nothing upstream was contacted.
    FoundExisting { internal_id: String },

    /// Every gate passed and the auto-add toggle imported the title.
    Added { internal_id: String },

    /// Missing, future or unparseable release date, or a status outside
    /// the releasable family.
    RejectedUnreleased { reason: String },

    /// The playback provider does not carry the title.
    RejectedUnavailable,

    /// Nothing to surface: the metadata provider has no such id, or the
    /// title is eligible but no import has created a row for it.
    NotFound,
}

impl Resolution {
    /// The internal row id, when resolution produced one.
    #[must_use]
    pub fn internal_id(&self) -> Option<&str> {
        match self {
            Self::FoundExisting { internal_id } | Self::Added { internal_id } => {
                Some(internal_id)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn into_internal_id(self) -> Option<String> {
        match self {
            Self::FoundExisting { internal_id } | Self::Added { internal_id } => {
                Some(internal_id)
            }
            _ => None,
        }
    }

    /// True for the explicit eligibility rejections, as opposed to the
    /// title merely not being in the catalog yet.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RejectedUnreleased { .. } | Self::RejectedUnavailable
        )
    }
}

/// Decides whether an externally referenced title may be surfaced.
///
/// Gates run cheapest-first: local lookup, then one metadata fetch, then
/// the availability check. An existing row answers without any network
/// traffic, and the availability source is never contacted for a title
/// that already failed the release or status gate.
pub struct ContentResolver {
    store: Store,
    metadata: Arc<dyn MetadataProvider>,
    availability: Arc<AvailabilityService>,
    clock: Arc<dyn Clock>,
    auto_add: bool,
    importer: Option<Arc<dyn ImportService>>,
}

impl ContentResolver {
    #[must_use]
    pub fn new(
        store: Store,
        metadata: Arc<dyn MetadataProvider>,
        availability: Arc<AvailabilityService>,
        clock: Arc<dyn Clock>,
        auto_add: bool,
    ) -> Self {
        Self {
            store,
            metadata,
            availability,
            clock,
            auto_add,
            importer: None,
        }
    }

    /// Wires the import service used when auto-add is on. Without it the
    /// toggle is inert and eligible titles stay out until imported.
    #[must_use]
    pub fn with_importer(mut self, importer: Arc<dyn ImportService>) -> Self {
        self.importer = Some(importer);
        self
    }

    /// Maps an external id onto an internal row id, if the title may be
    /// surfaced. Infrastructure failures along the way are logged and
    /// answered as `None`; callers never see an error.
    pub async fn resolve(&self, tmdb_id: TmdbId, kind: MediaKind) -> Option<String> {
        self.resolve_detailed(tmdb_id, kind).await.into_internal_id()
    }

    /// Like [`Self::resolve`] but keeps the reason a title was turned
    /// away, for operator-facing output.
    pub async fn resolve_detailed(&self, tmdb_id: TmdbId, kind: MediaKind) -> Resolution {
        match self.try_resolve(tmdb_id, kind).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(tmdb_id = %tmdb_id, kind = %kind, error = %e, "Resolution failed");
                Resolution::NotFound
            }
        }
    }

    async fn try_resolve(&self, tmdb_id: TmdbId, kind: MediaKind) -> Result<Resolution> {
        if let Some(existing) = self.store.get_title_by_tmdb_id(tmdb_id, kind).await? {
            debug!("Resolved {} {} to existing row {}", kind, tmdb_id, existing.id);
            return Ok(Resolution::FoundExisting {
                internal_id: existing.id,
            });
        }

        let Some(details) = self.metadata.title_details(tmdb_id, kind).await? else {
            debug!("Metadata provider knows no {} with id {}", kind, tmdb_id);
            return Ok(Resolution::NotFound);
        };

        if let Some(rejection) = self.release_gate(details.release_date()) {
            debug!("Rejected {} {}: {:?}", kind, tmdb_id, rejection);
            return Ok(rejection);
        }

        if let Some(status) = details.status()
            && !RELEASABLE_STATUSES.contains(&status)
        {
            debug!("Rejected {} {}: status '{}'", kind, tmdb_id, status);
            return Ok(Resolution::RejectedUnreleased {
                reason: format!("status '{status}' is not releasable"),
            });
        }

        if !self.availability.is_available(tmdb_id, kind).await {
            debug!("Rejected {} {}: not available upstream", kind, tmdb_id);
            return Ok(Resolution::RejectedUnavailable);
        }

        if self.auto_add
            && let Some(importer) = &self.importer
        {
            match importer.import_title(tmdb_id, kind).await {
                Ok(imported) => {
                    info!(
                        "Auto-added {} {} as {} on resolve",
                        kind, tmdb_id, imported.internal_id
                    );
                    return Ok(Resolution::Added {
                        internal_id: imported.internal_id,
                    });
                }
                Err(e) => {
                    warn!(tmdb_id = %tmdb_id, kind = %kind, error = %e, "Auto-add failed");
                }
            }
        }

        // Eligible, but insertion is an operator action. An admin import
        // may have landed while the gates ran, so look once more.
        let requeried = self.store.get_title_by_tmdb_id(tmdb_id, kind).await?;
        Ok(requeried.map_or(Resolution::NotFound, |row| Resolution::FoundExisting {
            internal_id: row.id,
        }))
    }

    /// Rejects anything not provably released by today. No date and a
    /// date that does not parse both count as unreleased.
    fn release_gate(&self, release_date: Option<&str>) -> Option<Resolution> {
        let Some(date_str) = release_date.filter(|d| !d.is_empty()) else {
            return Some(Resolution::RejectedUnreleased {
                reason: "no release date".to_string(),
            });
        };

        match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
            Ok(date) if date <= self.clock.now().date_naive() => None,
            Ok(_) => Some(Resolution::RejectedUnreleased {
                reason: format!("not released until {date_str}"),
            }),
            Err(_) => Some(Resolution::RejectedUnreleased {
                reason: format!("release date '{date_str}' is not a date"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::tmdb::{MovieDetails, TitleDetails};
    use crate::models::CatalogTitle;
    use crate::services::availability::AvailabilitySource;
    use crate::services::import_service::{
        CollectionImportReport, CollectionItem, ImportError, ImportedTitle, LibrarySyncReport,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
        }
    }

    struct StubMetadata {
        details: Option<TitleDetails>,
        detail_calls: AtomicUsize,
    }

    impl StubMetadata {
        fn new(details: Option<TitleDetails>) -> Self {
            Self {
                details,
                detail_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl MetadataProvider for StubMetadata {
        async fn title_details(
            &self,
            _id: TmdbId,
            _kind: MediaKind,
        ) -> Result<Option<TitleDetails>> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.details.clone())
        }

        async fn logo_url(&self, _id: TmdbId, _kind: MediaKind) -> Result<Option<String>> {
            Ok(None)
        }

        async fn season_details(
            &self,
            _series_id: TmdbId,
            _season: i32,
        ) -> Result<Option<crate::clients::tmdb::SeasonDetails>> {
            Ok(None)
        }
    }

    struct CountingSource {
        ids: Vec<&'static str>,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn new(ids: Vec<&'static str>) -> Self {
            Self {
                ids,
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AvailabilitySource for CountingSource {
        async fn list_catalog_ids(&self, _kind: MediaKind) -> Result<HashSet<String>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.ids.iter().map(ToString::to_string).collect())
        }

        async fn available_episode_numbers(
            &self,
            _series_id: TmdbId,
            _season: i32,
        ) -> Result<HashSet<i32>> {
            Ok(HashSet::new())
        }
    }

    struct StubImporter;

    #[async_trait::async_trait]
    impl ImportService for StubImporter {
        async fn import_title(
            &self,
            tmdb_id: TmdbId,
            kind: MediaKind,
        ) -> Result<ImportedTitle, ImportError> {
            Ok(ImportedTitle {
                internal_id: "auto-added-row".to_string(),
                tmdb_id,
                kind,
                title: "The Matrix".to_string(),
            })
        }

        async fn import_collection(&self, _items: Vec<CollectionItem>) -> CollectionImportReport {
            CollectionImportReport::default()
        }

        async fn sync_title(
            &self,
            _internal_id: String,
            _tmdb_id: TmdbId,
            _kind: MediaKind,
        ) -> Result<(), ImportError> {
            Ok(())
        }

        async fn sync_library(&self) -> LibrarySyncReport {
            LibrarySyncReport::default()
        }
    }

    fn movie(id: i64, release_date: Option<&str>, status: Option<&str>) -> TitleDetails {
        TitleDetails::Movie(MovieDetails {
            id,
            title: "The Matrix".to_string(),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: release_date.map(ToString::to_string),
            status: status.map(ToString::to_string),
            vote_average: Some(8.2),
            runtime: Some(136),
            genres: vec![],
            belongs_to_collection: None,
        })
    }

    fn catalog_row(tmdb_id: i64) -> CatalogTitle {
        CatalogTitle {
            id: uuid::Uuid::new_v4().to_string(),
            tmdb_id: TmdbId::new(tmdb_id),
            kind: MediaKind::Movie,
            title: "The Matrix".to_string(),
            description: None,
            poster_url: None,
            backdrop_url: None,
            logo_url: None,
            release_year: Some(1999),
            rating: Some(8.2),
            genre: None,
            runtime_minutes: Some(136),
            video_url: Some("https://superflixapi.buzz/filme/603".to_string()),
            added_at: "2025-06-01T12:00:00+00:00".to_string(),
        }
    }

    async fn temp_store() -> Store {
        let db_path = std::env::temp_dir().join(format!(
            "vodarr-resolver-test-{}.db",
            uuid::Uuid::new_v4()
        ));
        Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .expect("failed to open test store")
    }

    struct Harness {
        store: Store,
        metadata: Arc<StubMetadata>,
        source: Arc<CountingSource>,
        resolver: ContentResolver,
    }

    async fn harness(
        details: Option<TitleDetails>,
        available_ids: Vec<&'static str>,
        auto_add: bool,
    ) -> Harness {
        let store = temp_store().await;
        let metadata = Arc::new(StubMetadata::new(details));
        let source = Arc::new(CountingSource::new(available_ids));
        let clock = Arc::new(FixedClock);
        let availability = Arc::new(AvailabilityService::new(source.clone(), clock.clone(), 60));

        let mut resolver = ContentResolver::new(
            store.clone(),
            metadata.clone(),
            availability,
            clock,
            auto_add,
        );
        if auto_add {
            resolver = resolver.with_importer(Arc::new(StubImporter));
        }

        Harness {
            store,
            metadata,
            source,
            resolver,
        }
    }

    #[tokio::test]
    async fn existing_row_short_circuits_without_network() {
        let h = harness(Some(movie(603, Some("1999-03-31"), None)), vec!["603"], false).await;
        let row = catalog_row(603);
        h.store.upsert_movie(&row).await.unwrap();

        let resolved = h.resolver.resolve(TmdbId::new(603), MediaKind::Movie).await;

        assert_eq!(resolved.as_deref(), Some(row.id.as_str()));
        assert_eq!(h.metadata.detail_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn future_release_rejects_before_availability_is_asked() {
        let h = harness(Some(movie(603, Some("2199-01-01"), None)), vec!["603"], false).await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        assert!(matches!(outcome, Resolution::RejectedUnreleased { .. }));
        assert_eq!(h.source.fetch_count(), 0);
        assert_eq!(
            h.resolver.resolve(TmdbId::new(603), MediaKind::Movie).await,
            None
        );
    }

    #[tokio::test]
    async fn missing_release_date_rejects() {
        let h = harness(Some(movie(603, None, Some("Released"))), vec!["603"], false).await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        assert_eq!(
            outcome,
            Resolution::RejectedUnreleased {
                reason: "no release date".to_string()
            }
        );
        assert_eq!(h.source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn unparseable_release_date_rejects() {
        let h = harness(Some(movie(603, Some("TBA"), None)), vec!["603"], false).await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        assert!(matches!(outcome, Resolution::RejectedUnreleased { .. }));
        assert_eq!(h.source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn non_releasable_status_rejects() {
        let h = harness(
            Some(movie(603, Some("1999-03-31"), Some("In Production"))),
            vec!["603"],
            false,
        )
        .await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        assert!(matches!(outcome, Resolution::RejectedUnreleased { .. }));
        assert_eq!(h.source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn unavailable_title_rejects_after_gates() {
        let h = harness(
            Some(movie(603, Some("1999-03-31"), Some("Released"))),
            vec![],
            false,
        )
        .await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        assert_eq!(outcome, Resolution::RejectedUnavailable);
        assert!(outcome.is_rejection());
        assert_eq!(h.source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn eligible_title_stays_out_while_auto_add_is_off() {
        let h = harness(
            Some(movie(603, Some("1999-03-31"), Some("Released"))),
            vec!["603"],
            false,
        )
        .await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        assert_eq!(outcome, Resolution::NotFound);
        assert!(!outcome.is_rejection());
        assert!(h
            .store
            .get_movie_by_tmdb_id(TmdbId::new(603))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn absent_status_passes_the_status_gate() {
        let h = harness(Some(movie(603, Some("1999-03-31"), None)), vec!["603"], false).await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        // Past the gates; only the missing row keeps it out.
        assert_eq!(outcome, Resolution::NotFound);
        assert_eq!(h.source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn auto_add_imports_an_eligible_title() {
        let h = harness(
            Some(movie(603, Some("1999-03-31"), Some("Released"))),
            vec!["603"],
            true,
        )
        .await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(603), MediaKind::Movie)
            .await;

        assert_eq!(
            outcome,
            Resolution::Added {
                internal_id: "auto-added-row".to_string()
            }
        );
        assert_eq!(outcome.internal_id(), Some("auto-added-row"));
    }

    #[tokio::test]
    async fn unknown_provider_id_resolves_to_nothing() {
        let h = harness(None, vec!["603"], false).await;

        let outcome = h
            .resolver
            .resolve_detailed(TmdbId::new(999_999), MediaKind::Movie)
            .await;

        assert_eq!(outcome, Resolution::NotFound);
        assert_eq!(h.source.fetch_count(), 0);
    }
}
