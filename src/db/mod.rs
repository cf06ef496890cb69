use crate::domain::{MediaKind, TmdbId};
use crate::models::{CatalogTitle, DescriptiveFields, Episode, Season};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::MovieRepository {
        repositories::MovieRepository::new(self.conn.clone())
    }

    fn series_repo(&self) -> repositories::SeriesRepository {
        repositories::SeriesRepository::new(self.conn.clone())
    }

    fn config_repo(&self) -> repositories::ConfigRepository {
        repositories::ConfigRepository::new(self.conn.clone())
    }

    pub async fn upsert_movie(&self, title: &CatalogTitle) -> Result<CatalogTitle> {
        self.movie_repo().upsert(title).await
    }

    pub async fn update_movie_descriptive(
        &self,
        tmdb_id: TmdbId,
        fields: &DescriptiveFields,
    ) -> Result<bool> {
        self.movie_repo().update_descriptive(tmdb_id, fields).await
    }

    pub async fn get_movie(&self, id: &str) -> Result<Option<CatalogTitle>> {
        self.movie_repo().get(id).await
    }

    pub async fn get_movie_by_tmdb_id(&self, tmdb_id: TmdbId) -> Result<Option<CatalogTitle>> {
        self.movie_repo().get_by_tmdb_id(tmdb_id).await
    }

    pub async fn list_movies(&self) -> Result<Vec<CatalogTitle>> {
        self.movie_repo().list().await
    }

    pub async fn list_movies_batch(&self, limit: u64) -> Result<Vec<CatalogTitle>> {
        self.movie_repo().list_batch(limit).await
    }

    pub async fn remove_movie(&self, id: &str) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    pub async fn upsert_series(&self, title: &CatalogTitle) -> Result<CatalogTitle> {
        self.series_repo().upsert(title).await
    }

    pub async fn update_series_descriptive(
        &self,
        tmdb_id: TmdbId,
        fields: &DescriptiveFields,
    ) -> Result<bool> {
        self.series_repo().update_descriptive(tmdb_id, fields).await
    }

    pub async fn get_series(&self, id: &str) -> Result<Option<CatalogTitle>> {
        self.series_repo().get(id).await
    }

    pub async fn get_series_by_tmdb_id(&self, tmdb_id: TmdbId) -> Result<Option<CatalogTitle>> {
        self.series_repo().get_by_tmdb_id(tmdb_id).await
    }

    pub async fn list_series(&self) -> Result<Vec<CatalogTitle>> {
        self.series_repo().list().await
    }

    pub async fn list_series_batch(&self, limit: u64) -> Result<Vec<CatalogTitle>> {
        self.series_repo().list_batch(limit).await
    }

    pub async fn remove_series(&self, id: &str) -> Result<bool> {
        self.series_repo().remove(id).await
    }

    pub async fn upsert_season(&self, series_id: &str, season: &Season) -> Result<()> {
        self.series_repo().upsert_season(series_id, season).await
    }

    pub async fn upsert_episodes(&self, season_id: TmdbId, episodes: &[Episode]) -> Result<()> {
        self.series_repo().upsert_episodes(season_id, episodes).await
    }

    pub async fn seasons_for_series(&self, series_id: &str) -> Result<Vec<Season>> {
        self.series_repo().seasons_for(series_id).await
    }

    pub async fn season_by_number(&self, series_id: &str, number: i32) -> Result<Option<Season>> {
        self.series_repo().season_by_number(series_id, number).await
    }

    pub async fn episodes_for_season(&self, season_id: TmdbId) -> Result<Vec<Episode>> {
        self.series_repo().episodes_for_season(season_id).await
    }

    /// Looks the id up in whichever table matches the kind.
    pub async fn get_title_by_tmdb_id(
        &self,
        tmdb_id: TmdbId,
        kind: MediaKind,
    ) -> Result<Option<CatalogTitle>> {
        match kind {
            MediaKind::Movie => self.get_movie_by_tmdb_id(tmdb_id).await,
            MediaKind::Series => self.get_series_by_tmdb_id(tmdb_id).await,
        }
    }

    pub async fn get_config_value(&self, key: &str) -> Result<Option<String>> {
        self.config_repo().get_value(key).await
    }

    pub async fn get_config_or(&self, key: &str, fallback: &str) -> Result<String> {
        Ok(self
            .config_repo()
            .get_value(key)
            .await?
            .unwrap_or_else(|| fallback.to_string()))
    }

    pub async fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
        self.config_repo().set_value(key, value).await
    }
}
