use crate::clients::tmdb::{SeasonDetails, TitleDetails, TmdbClient};
use crate::domain::{MediaKind, TmdbId};
use anyhow::Result;

/// Read-only metadata lookups the import and resolution paths depend on.
///
/// Kept narrow on purpose: discovery endpoints talk to the client
/// directly, while everything that writes to the catalog goes through
/// this trait so tests can script provider responses.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Full details for a title, `None` when the provider has no such id.
    async fn title_details(&self, id: TmdbId, kind: MediaKind) -> Result<Option<TitleDetails>>;

    /// Best display logo for a title, already resolved to a full URL.
    async fn logo_url(&self, id: TmdbId, kind: MediaKind) -> Result<Option<String>>;

    /// Episode listing for one season of a series.
    async fn season_details(
        &self,
        series_id: TmdbId,
        season: i32,
    ) -> Result<Option<SeasonDetails>>;
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    async fn title_details(&self, id: TmdbId, kind: MediaKind) -> Result<Option<TitleDetails>> {
        self.title_details(id, kind).await
    }

    async fn logo_url(&self, id: TmdbId, kind: MediaKind) -> Result<Option<String>> {
        self.logo_url(id, kind).await
    }

    async fn season_details(
        &self,
        series_id: TmdbId,
        season: i32,
    ) -> Result<Option<SeasonDetails>> {
        self.season_details(series_id, season).await
    }
}
