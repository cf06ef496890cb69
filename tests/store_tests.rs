//! Integration tests for the sqlite catalog store.
//!
//! Exercises upsert conflict handling, list ordering, the series
//! delete cascade and the key/value config table.

use vodarr::db::Store;
use vodarr::domain::{MediaKind, TmdbId};
use vodarr::models::{CatalogTitle, Episode, Season};

async fn temp_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("vodarr-store-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store")
}

fn title(tmdb_id: i64, kind: MediaKind, name: &str, added_at: &str) -> CatalogTitle {
    CatalogTitle {
        id: format!("row-{}-{}", kind, tmdb_id),
        tmdb_id: TmdbId::new(tmdb_id),
        kind,
        title: name.to_string(),
        description: Some("Stored description".to_string()),
        poster_url: Some("https://image.tmdb.org/t/p/w500/poster.jpg".to_string()),
        backdrop_url: None,
        logo_url: None,
        release_year: Some(2010),
        rating: Some(7.5),
        genre: Some("Drama".to_string()),
        runtime_minutes: None,
        video_url: Some(format!("https://player.example/filme/{tmdb_id}")),
        added_at: added_at.to_string(),
    }
}

fn season(tmdb_id: i64, number: i32) -> Season {
    Season {
        tmdb_id: TmdbId::new(tmdb_id),
        number,
        name: Some(format!("Season {number}")),
        overview: None,
        poster_url: None,
        air_date: None,
        episode_count: Some(2),
    }
}

fn episode(tmdb_id: i64, number: i32) -> Episode {
    Episode {
        tmdb_id: TmdbId::new(tmdb_id),
        number,
        title: Some(format!("Episode {number}")),
        overview: None,
        still_url: None,
        runtime_minutes: Some(45),
    }
}

#[tokio::test]
async fn test_movie_roundtrip_by_both_ids() {
    let store = temp_store().await;
    let row = title(27205, MediaKind::Movie, "Inception", "2025-01-01T12:00:00Z");

    store.upsert_movie(&row).await.unwrap();

    let by_internal = store.get_movie(&row.id).await.unwrap().expect("by id");
    let by_tmdb = store
        .get_movie_by_tmdb_id(TmdbId::new(27205))
        .await
        .unwrap()
        .expect("by tmdb id");

    assert_eq!(by_internal.id, by_tmdb.id);
    assert_eq!(by_tmdb.title, "Inception");
    assert_eq!(by_tmdb.kind, MediaKind::Movie);
    assert_eq!(by_tmdb.genre.as_deref(), Some("Drama"));
    assert_eq!(by_tmdb.added_at, "2025-01-01T12:00:00Z");
}

#[tokio::test]
async fn test_upsert_conflict_keeps_first_import_identity() {
    let store = temp_store().await;

    let first = title(100, MediaKind::Movie, "Original Title", "2025-01-01T00:00:00Z");
    store.upsert_movie(&first).await.unwrap();

    let mut second = title(100, MediaKind::Movie, "Corrected Title", "2025-06-01T00:00:00Z");
    second.id = "some-other-id".to_string();
    second.video_url = Some("https://elsewhere.example/filme/100".to_string());
    let stored = store.upsert_movie(&second).await.unwrap();

    // Descriptive text follows the newest write; internal id, playback
    // link and added-at stay from the first import.
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.title, "Corrected Title");
    assert_eq!(stored.video_url, first.video_url);
    assert_eq!(stored.added_at, "2025-01-01T00:00:00Z");

    assert_eq!(store.list_movies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lists_are_newest_first_and_batches_oldest_first() {
    let store = temp_store().await;

    for (tmdb_id, day) in [(1, "01"), (2, "02"), (3, "03")] {
        let row = title(
            tmdb_id,
            MediaKind::Movie,
            &format!("Movie {tmdb_id}"),
            &format!("2025-03-{day}T00:00:00Z"),
        );
        store.upsert_movie(&row).await.unwrap();
    }

    let listed: Vec<i64> = store
        .list_movies()
        .await
        .unwrap()
        .iter()
        .map(|t| t.tmdb_id.value())
        .collect();
    assert_eq!(listed, vec![3, 2, 1]);

    let batch: Vec<i64> = store
        .list_movies_batch(2)
        .await
        .unwrap()
        .iter()
        .map(|t| t.tmdb_id.value())
        .collect();
    assert_eq!(batch, vec![1, 2]);
}

#[tokio::test]
async fn test_remove_series_cascades_to_seasons_and_episodes() {
    let store = temp_store().await;
    let row = title(1396, MediaKind::Series, "Breaking Bad", "2025-01-01T00:00:00Z");
    store.upsert_series(&row).await.unwrap();

    store.upsert_season(&row.id, &season(3572, 1)).await.unwrap();
    store.upsert_season(&row.id, &season(3573, 2)).await.unwrap();
    store
        .upsert_episodes(TmdbId::new(3572), &[episode(62085, 1), episode(62086, 2)])
        .await
        .unwrap();
    store
        .upsert_episodes(TmdbId::new(3573), &[episode(62087, 1)])
        .await
        .unwrap();

    let removed = store.remove_series(&row.id).await.unwrap();
    assert!(removed);

    assert!(store.get_series(&row.id).await.unwrap().is_none());
    assert!(store.seasons_for_series(&row.id).await.unwrap().is_empty());
    assert!(store
        .episodes_for_season(TmdbId::new(3572))
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .episodes_for_season(TmdbId::new(3573))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_get_title_by_tmdb_id_distinguishes_kind() {
    let store = temp_store().await;

    // A movie and a series can share the same upstream id value.
    store
        .upsert_movie(&title(500, MediaKind::Movie, "The Movie", "2025-01-01T00:00:00Z"))
        .await
        .unwrap();
    store
        .upsert_series(&title(500, MediaKind::Series, "The Series", "2025-01-02T00:00:00Z"))
        .await
        .unwrap();

    let movie_row = store
        .get_title_by_tmdb_id(TmdbId::new(500), MediaKind::Movie)
        .await
        .unwrap()
        .expect("movie row");
    let series_row = store
        .get_title_by_tmdb_id(TmdbId::new(500), MediaKind::Series)
        .await
        .unwrap()
        .expect("series row");

    assert_eq!(movie_row.title, "The Movie");
    assert_eq!(series_row.title, "The Series");
}

#[tokio::test]
async fn test_episode_upsert_is_idempotent() {
    let store = temp_store().await;
    let row = title(1396, MediaKind::Series, "Breaking Bad", "2025-01-01T00:00:00Z");
    store.upsert_series(&row).await.unwrap();
    store.upsert_season(&row.id, &season(3572, 1)).await.unwrap();

    store
        .upsert_episodes(TmdbId::new(3572), &[episode(62085, 1)])
        .await
        .unwrap();

    // Re-sync delivers the same episode with a corrected title.
    let mut updated = episode(62085, 1);
    updated.title = Some("Pilot".to_string());
    store
        .upsert_episodes(TmdbId::new(3572), &[updated])
        .await
        .unwrap();

    let episodes = store.episodes_for_season(TmdbId::new(3572)).await.unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].title.as_deref(), Some("Pilot"));
}

#[tokio::test]
async fn test_config_roundtrip_and_fallback() {
    let store = temp_store().await;

    assert!(store
        .get_config_value("base_playback_url")
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        store
            .get_config_or("base_playback_url", "https://fallback.example")
            .await
            .unwrap(),
        "https://fallback.example"
    );

    store
        .set_config_value("base_playback_url", "https://player.example")
        .await
        .unwrap();
    assert_eq!(
        store
            .get_config_value("base_playback_url")
            .await
            .unwrap()
            .as_deref(),
        Some("https://player.example")
    );

    store
        .set_config_value("base_playback_url", "https://second.example")
        .await
        .unwrap();
    assert_eq!(
        store
            .get_config_or("base_playback_url", "unused")
            .await
            .unwrap(),
        "https://second.example"
    );
}
