use crate::clients::superflix::SuperflixClient;
use crate::domain::{MediaKind, TmdbId};
use crate::services::clock::Clock;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// Where playability facts come from.
///
/// The production source scrapes and lists the upstream provider; tests
/// swap in canned sets.
#[async_trait::async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Every playable identifier for a kind, fetched in one request.
    async fn list_catalog_ids(&self, kind: MediaKind) -> Result<HashSet<String>>;

    /// Episode numbers of a season that currently have a working link.
    async fn available_episode_numbers(
        &self,
        series_id: TmdbId,
        season: i32,
    ) -> Result<HashSet<i32>>;
}

#[async_trait::async_trait]
impl AvailabilitySource for SuperflixClient {
    async fn list_catalog_ids(&self, kind: MediaKind) -> Result<HashSet<String>> {
        self.list_catalog_ids(kind).await
    }

    async fn available_episode_numbers(
        &self,
        series_id: TmdbId,
        season: i32,
    ) -> Result<HashSet<i32>> {
        self.available_episode_numbers(series_id, season).await
    }
}

struct CacheEntry {
    ids: HashSet<String>,
    fetched_at: DateTime<Utc>,
}

/// Answers "is this title playable upstream right now?" without a network
/// round trip per title.
///
/// One identifier-set cache slot per kind; a slot is refreshed in bulk
/// when a lookup finds it missing or older than the TTL. Per-title checks
/// against the upstream would not survive discovery-page fan-outs of
/// dozens of titles, so cost is amortized across the TTL window instead.
pub struct AvailabilityService {
    source: Arc<dyn AvailabilitySource>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    movie_slot: RwLock<Option<CacheEntry>>,
    series_slot: RwLock<Option<CacheEntry>>,
}

impl AvailabilityService {
    #[must_use]
    pub fn new(source: Arc<dyn AvailabilitySource>, clock: Arc<dyn Clock>, ttl_minutes: i64) -> Self {
        Self {
            source,
            clock,
            ttl: chrono::Duration::minutes(ttl_minutes),
            movie_slot: RwLock::new(None),
            series_slot: RwLock::new(None),
        }
    }

    const fn slot(&self, kind: MediaKind) -> &RwLock<Option<CacheEntry>> {
        match kind {
            MediaKind::Movie => &self.movie_slot,
            MediaKind::Series => &self.series_slot,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.clock.now() - entry.fetched_at < self.ttl
    }

    /// Membership test against the cached identifier set for `kind`.
    ///
    /// Never errors: an upstream failure during refresh logs a warning and
    /// answers `false` for this call, leaving whatever entry was cached in
    /// place. Unknown means not shown, never accidentally exposed.
    pub async fn is_available(&self, id: TmdbId, kind: MediaKind) -> bool {
        let key = id.to_string();
        let slot = self.slot(kind);

        {
            let guard = slot.read().await;
            if let Some(entry) = guard.as_ref()
                && self.is_fresh(entry)
            {
                return entry.ids.contains(&key);
            }
        }

        let mut guard = slot.write().await;

        // Another task may have refreshed while we waited for the lock.
        if let Some(entry) = guard.as_ref()
            && self.is_fresh(entry)
        {
            return entry.ids.contains(&key);
        }

        match self.source.list_catalog_ids(kind).await {
            Ok(ids) => {
                let entry = CacheEntry {
                    ids,
                    fetched_at: self.clock.now(),
                };
                let available = entry.ids.contains(&key);
                *guard = Some(entry);
                available
            }
            Err(e) => {
                warn!("Availability refresh failed for {}: {}", kind, e);
                false
            }
        }
    }

    /// Which episodes of a season are actually linkable upstream.
    ///
    /// Season pages are fetched on demand and not cached; a scrape failure
    /// degrades to an empty set.
    pub async fn available_episodes(&self, series_id: TmdbId, season: i32) -> HashSet<i32> {
        match self
            .source
            .available_episode_numbers(series_id, season)
            .await
        {
            Ok(numbers) => numbers,
            Err(e) => {
                warn!(
                    "Episode availability check failed for series {} season {}: {}",
                    series_id, season, e
                );
                HashSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
            }
        }

        fn advance_minutes(&self, minutes: i64) {
            *self.now.lock().unwrap() += chrono::Duration::minutes(minutes);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    struct StubSource {
        movie_ids: Vec<&'static str>,
        series_ids: Vec<&'static str>,
        episodes: Vec<i32>,
        fail: AtomicBool,
        fetches: AtomicUsize,
    }

    impl StubSource {
        fn new(movie_ids: Vec<&'static str>, series_ids: Vec<&'static str>) -> Self {
            Self {
                movie_ids,
                series_ids,
                episodes: vec![1, 2, 3],
                fail: AtomicBool::new(false),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AvailabilitySource for StubSource {
        async fn list_catalog_ids(&self, kind: MediaKind) -> Result<HashSet<String>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("upstream down");
            }
            let ids = match kind {
                MediaKind::Movie => &self.movie_ids,
                MediaKind::Series => &self.series_ids,
            };
            Ok(ids.iter().map(ToString::to_string).collect())
        }

        async fn available_episode_numbers(
            &self,
            _series_id: TmdbId,
            _season: i32,
        ) -> Result<HashSet<i32>> {
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("upstream down");
            }
            Ok(self.episodes.iter().copied().collect())
        }
    }

    fn service(
        source: Arc<StubSource>,
        clock: Arc<ManualClock>,
    ) -> AvailabilityService {
        AvailabilityService::new(source, clock, 60)
    }

    #[tokio::test]
    async fn repeated_checks_within_ttl_fetch_once() {
        let source = Arc::new(StubSource::new(vec!["27205"], vec![]));
        let clock = Arc::new(ManualClock::new());
        let svc = service(source.clone(), clock);

        assert!(svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);
        assert!(svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);
        assert!(!svc.is_available(TmdbId::new(550), MediaKind::Movie).await);

        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn expired_entry_forces_refetch() {
        let source = Arc::new(StubSource::new(vec!["27205"], vec![]));
        let clock = Arc::new(ManualClock::new());
        let svc = service(source.clone(), clock.clone());

        assert!(svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);
        clock.advance_minutes(61);
        assert!(svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);

        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn each_kind_has_its_own_slot() {
        let source = Arc::new(StubSource::new(vec!["27205"], vec!["1396"]));
        let clock = Arc::new(ManualClock::new());
        let svc = service(source.clone(), clock);

        assert!(svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);
        // The movie fetch must not satisfy series lookups.
        assert!(!svc.is_available(TmdbId::new(27205), MediaKind::Series).await);
        assert!(svc.is_available(TmdbId::new(1396), MediaKind::Series).await);

        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_answers_false() {
        let source = Arc::new(StubSource::new(vec!["27205"], vec![]));
        source.fail.store(true, Ordering::SeqCst);
        let clock = Arc::new(ManualClock::new());
        let svc = service(source.clone(), clock);

        assert!(!svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);
    }

    #[tokio::test]
    async fn failure_leaves_previous_entry_in_place() {
        let source = Arc::new(StubSource::new(vec!["27205"], vec![]));
        let clock = Arc::new(ManualClock::new());
        let svc = service(source.clone(), clock.clone());

        assert!(svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);

        clock.advance_minutes(61);
        source.fail.store(true, Ordering::SeqCst);
        assert!(!svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);

        // Recovery refetches rather than trusting the stale entry.
        source.fail.store(false, Ordering::SeqCst);
        assert!(svc.is_available(TmdbId::new(27205), MediaKind::Movie).await);
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn episode_scrape_failure_degrades_to_empty() {
        let source = Arc::new(StubSource::new(vec![], vec!["1396"]));
        let clock = Arc::new(ManualClock::new());
        let svc = service(source.clone(), clock);

        assert_eq!(
            svc.available_episodes(TmdbId::new(1396), 1).await,
            HashSet::from([1, 2, 3])
        );

        source.fail.store(true, Ordering::SeqCst);
        assert!(svc.available_episodes(TmdbId::new(1396), 1).await.is_empty());
    }
}
