//! Integration tests for the import pipeline against a real sqlite store.
//!
//! Covers availability gating, idempotent re-import, season/episode
//! persistence, collection batches and metadata re-sync.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vodarr::clients::tmdb::{
    EpisodeDetails, Genre, MovieDetails, SeasonDetails, SeasonSummary, SeriesDetails, TitleDetails,
};
use vodarr::constants::config_keys;
use vodarr::db::Store;
use vodarr::domain::{MediaKind, TmdbId};
use vodarr::services::import_service::{CollectionItem, ImportError};
use vodarr::services::{
    AvailabilityService, AvailabilitySource, DefaultImportService, ImportService,
    MetadataProvider, SystemClock,
};

/// Scriptable metadata provider: tests insert and remove titles between
/// calls to model upstream drift.
#[derive(Default)]
struct ScriptedMetadata {
    titles: Mutex<HashMap<i64, TitleDetails>>,
    seasons: Mutex<HashMap<(i64, i32), SeasonDetails>>,
    detail_calls: AtomicUsize,
}

impl ScriptedMetadata {
    fn put_title(&self, details: TitleDetails) {
        self.titles
            .lock()
            .unwrap()
            .insert(details.tmdb_id().value(), details);
    }

    fn forget_title(&self, id: i64) {
        self.titles.lock().unwrap().remove(&id);
    }

    fn put_season(&self, series_id: i64, details: SeasonDetails) {
        self.seasons
            .lock()
            .unwrap()
            .insert((series_id, details.season_number), details);
    }
}

#[async_trait::async_trait]
impl MetadataProvider for ScriptedMetadata {
    async fn title_details(
        &self,
        id: TmdbId,
        _kind: MediaKind,
    ) -> anyhow::Result<Option<TitleDetails>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.titles.lock().unwrap().get(&id.value()).cloned())
    }

    async fn logo_url(&self, _id: TmdbId, _kind: MediaKind) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    async fn season_details(
        &self,
        series_id: TmdbId,
        season: i32,
    ) -> anyhow::Result<Option<SeasonDetails>> {
        Ok(self
            .seasons
            .lock()
            .unwrap()
            .get(&(series_id.value(), season))
            .cloned())
    }
}

struct CannedAvailability {
    ids: HashSet<String>,
}

#[async_trait::async_trait]
impl AvailabilitySource for CannedAvailability {
    async fn list_catalog_ids(&self, _kind: MediaKind) -> anyhow::Result<HashSet<String>> {
        Ok(self.ids.clone())
    }

    async fn available_episode_numbers(
        &self,
        _series_id: TmdbId,
        _season: i32,
    ) -> anyhow::Result<HashSet<i32>> {
        Ok(HashSet::new())
    }
}

struct TestHarness {
    store: Store,
    metadata: Arc<ScriptedMetadata>,
    service: DefaultImportService,
}

async fn harness(available: &[i64]) -> TestHarness {
    let db_path =
        std::env::temp_dir().join(format!("vodarr-import-test-{}.db", uuid::Uuid::new_v4()));
    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store");

    let metadata = Arc::new(ScriptedMetadata::default());
    let source = Arc::new(CannedAvailability {
        ids: available.iter().map(ToString::to_string).collect(),
    });
    let clock = Arc::new(SystemClock);
    let availability = Arc::new(AvailabilityService::new(source, clock.clone(), 60));

    let service = DefaultImportService::new(
        store.clone(),
        metadata.clone(),
        availability,
        clock,
        0,
        50,
    );

    TestHarness {
        store,
        metadata,
        service,
    }
}

fn movie(id: i64, title: &str) -> TitleDetails {
    TitleDetails::Movie(MovieDetails {
        id,
        title: title.to_string(),
        overview: Some("A thief who steals corporate secrets.".to_string()),
        poster_path: Some("/poster.jpg".to_string()),
        backdrop_path: None,
        release_date: Some("2010-07-15".to_string()),
        status: Some("Released".to_string()),
        vote_average: Some(8.4),
        runtime: Some(148),
        genres: vec![Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        }],
        belongs_to_collection: None,
    })
}

fn series(id: i64, name: &str, season_numbers: &[i32]) -> TitleDetails {
    TitleDetails::Series(SeriesDetails {
        id,
        name: name.to_string(),
        overview: Some("A chemistry teacher turns to crime.".to_string()),
        poster_path: None,
        backdrop_path: None,
        first_air_date: Some("2008-01-20".to_string()),
        status: Some("Ended".to_string()),
        vote_average: Some(8.9),
        genres: vec![],
        seasons: season_numbers
            .iter()
            .map(|&n| SeasonSummary {
                id: id * 100 + i64::from(n),
                season_number: n,
                name: Some(format!("Season {n}")),
                overview: None,
                poster_path: None,
                air_date: None,
                episode_count: Some(2),
            })
            .collect(),
    })
}

fn season(series_id: i64, number: i32, episode_numbers: &[i32]) -> SeasonDetails {
    SeasonDetails {
        id: series_id * 100 + i64::from(number),
        season_number: number,
        name: Some(format!("Season {number}")),
        overview: None,
        poster_path: None,
        air_date: None,
        episodes: episode_numbers
            .iter()
            .map(|&n| EpisodeDetails {
                id: series_id * 1000 + i64::from(n),
                episode_number: n,
                name: Some(format!("Episode {n}")),
                overview: None,
                still_path: None,
                runtime: Some(45),
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_import_persists_movie_with_default_playback_link() {
    let h = harness(&[27205]).await;
    h.metadata.put_title(movie(27205, "Inception"));

    let imported = h
        .service
        .import_title(TmdbId::new(27205), MediaKind::Movie)
        .await
        .expect("import should succeed");

    assert_eq!(imported.title, "Inception");
    assert_eq!(imported.kind, MediaKind::Movie);

    let stored = h
        .store
        .get_movie_by_tmdb_id(TmdbId::new(27205))
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(stored.id, imported.internal_id);
    assert_eq!(
        stored.video_url.as_deref(),
        Some("https://superflixapi.buzz/filme/27205")
    );
    assert_eq!(stored.genre.as_deref(), Some("Science Fiction"));
    assert_eq!(stored.release_year, Some(2010));
}

#[tokio::test]
async fn test_custom_playback_base_applies_to_new_imports() {
    let h = harness(&[27205]).await;
    h.metadata.put_title(movie(27205, "Inception"));
    h.store
        .set_config_value(config_keys::BASE_PLAYBACK_URL, "https://player.example")
        .await
        .unwrap();

    h.service
        .import_title(TmdbId::new(27205), MediaKind::Movie)
        .await
        .expect("import should succeed");

    let stored = h
        .store
        .get_movie_by_tmdb_id(TmdbId::new(27205))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.video_url.as_deref(),
        Some("https://player.example/filme/27205")
    );
}

#[tokio::test]
async fn test_unavailable_title_never_reaches_the_store() {
    let h = harness(&[]).await;
    h.metadata.put_title(movie(27205, "Inception"));

    let err = h
        .service
        .import_title(TmdbId::new(27205), MediaKind::Movie)
        .await
        .expect_err("unavailable title should be rejected");

    assert!(matches!(err, ImportError::NotAvailable { .. }));
    // The availability gate runs first; no metadata was ever fetched.
    assert_eq!(h.metadata.detail_calls.load(Ordering::SeqCst), 0);
    assert!(h.store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reimport_updates_in_place() {
    let h = harness(&[27205]).await;
    h.metadata.put_title(movie(27205, "Inception"));

    let first = h
        .service
        .import_title(TmdbId::new(27205), MediaKind::Movie)
        .await
        .unwrap();
    let before = h
        .store
        .get_movie(&first.internal_id)
        .await
        .unwrap()
        .unwrap();

    // Upstream retitles the movie and the operator repoints the player;
    // a re-import must refresh text without minting a second row or
    // touching first-import identity fields.
    h.metadata.put_title(movie(27205, "Inception (Remastered)"));
    h.store
        .set_config_value(config_keys::BASE_PLAYBACK_URL, "https://player.example")
        .await
        .unwrap();

    let second = h
        .service
        .import_title(TmdbId::new(27205), MediaKind::Movie)
        .await
        .unwrap();

    assert_eq!(second.internal_id, first.internal_id);

    let rows = h.store.list_movies().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Inception (Remastered)");
    assert_eq!(rows[0].video_url, before.video_url);
    assert_eq!(rows[0].added_at, before.added_at);
}

#[tokio::test]
async fn test_series_import_skips_specials() {
    let h = harness(&[1396]).await;
    h.metadata.put_title(series(1396, "Breaking Bad", &[0, 1, 2]));
    h.metadata.put_season(1396, season(1396, 0, &[1]));
    h.metadata.put_season(1396, season(1396, 1, &[1, 2]));
    h.metadata.put_season(1396, season(1396, 2, &[1]));

    let imported = h
        .service
        .import_title(TmdbId::new(1396), MediaKind::Series)
        .await
        .expect("import should succeed");

    let seasons = h
        .store
        .seasons_for_series(&imported.internal_id)
        .await
        .unwrap();
    let numbers: Vec<i32> = seasons.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let episodes = h
        .store
        .episodes_for_season(TmdbId::new(1396 * 100 + 1))
        .await
        .unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].number, 1);
    assert_eq!(episodes[0].title.as_deref(), Some("Episode 1"));
}

#[tokio::test]
async fn test_collection_import_continues_past_failures() {
    let h = harness(&[100, 300]).await;
    h.metadata.put_title(movie(100, "Part One"));
    h.metadata.put_title(movie(200, "Part Two"));
    h.metadata.put_title(movie(300, "Part Three"));

    let items = vec![
        CollectionItem {
            tmdb_id: TmdbId::new(100),
            kind: MediaKind::Movie,
        },
        CollectionItem {
            tmdb_id: TmdbId::new(200),
            kind: MediaKind::Movie,
        },
        CollectionItem {
            tmdb_id: TmdbId::new(300),
            kind: MediaKind::Movie,
        },
    ];

    let report = h.service.import_collection(items).await;

    assert_eq!(report.imported, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failed_items.len(), 1);
    assert_eq!(report.failed_items[0].tmdb_id.value(), 200);

    // The failure in the middle did not stop the last item.
    assert!(h
        .store
        .get_movie_by_tmdb_id(TmdbId::new(300))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_sync_rewrites_descriptive_fields_only() {
    let h = harness(&[27205]).await;
    h.metadata.put_title(movie(27205, "Inception"));

    let imported = h
        .service
        .import_title(TmdbId::new(27205), MediaKind::Movie)
        .await
        .unwrap();
    let before = h
        .store
        .get_movie(&imported.internal_id)
        .await
        .unwrap()
        .unwrap();

    h.metadata.put_title(TitleDetails::Movie(MovieDetails {
        id: 27205,
        title: "Inception".to_string(),
        overview: Some("New overview text.".to_string()),
        poster_path: None,
        backdrop_path: None,
        release_date: Some("2010-07-15".to_string()),
        status: Some("Released".to_string()),
        vote_average: Some(9.0),
        runtime: Some(148),
        genres: vec![],
        belongs_to_collection: None,
    }));

    h.service
        .sync_title(imported.internal_id.clone(), TmdbId::new(27205), MediaKind::Movie)
        .await
        .expect("sync should succeed");

    let after = h
        .store
        .get_movie(&imported.internal_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(after.description.as_deref(), Some("New overview text."));
    assert_eq!(after.rating, Some(9.0));
    // Fields the provider omitted keep their stored values.
    assert_eq!(after.poster_url, before.poster_url);
    assert_eq!(after.genre, before.genre);
    // Identity and playback are never rewritten by a sync.
    assert_eq!(after.video_url, before.video_url);
    assert_eq!(after.added_at, before.added_at);
}

#[tokio::test]
async fn test_sync_library_counts_vanished_titles_as_skipped() {
    let h = harness(&[100, 200]).await;
    h.metadata.put_title(movie(100, "Kept"));
    h.metadata.put_title(movie(200, "Dropped"));

    h.service
        .import_title(TmdbId::new(100), MediaKind::Movie)
        .await
        .unwrap();
    h.service
        .import_title(TmdbId::new(200), MediaKind::Movie)
        .await
        .unwrap();

    h.metadata.forget_title(200);

    let report = h.service.sync_library().await;

    assert_eq!(report.synced, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
}
