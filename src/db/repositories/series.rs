use crate::domain::{MediaKind, TmdbId};
use crate::entities::{episodes, prelude::*, seasons, series};
use crate::models::{CatalogTitle, DescriptiveFields, Episode, Season};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

pub struct SeriesRepository {
    conn: DatabaseConnection,
}

impl SeriesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: series::Model) -> CatalogTitle {
        CatalogTitle {
            id: model.id,
            tmdb_id: TmdbId::new(model.tmdb_id),
            kind: MediaKind::Series,
            title: model.title,
            description: model.description,
            poster_url: model.poster_url,
            backdrop_url: model.backdrop_url,
            logo_url: model.logo_url,
            release_year: model.release_year,
            rating: model.rating,
            genre: model.genre,
            runtime_minutes: None,
            video_url: model.video_url,
            added_at: model.created_at,
        }
    }

    fn map_season(model: seasons::Model) -> Season {
        Season {
            tmdb_id: TmdbId::new(model.tmdb_id),
            number: model.number,
            name: model.name,
            overview: model.overview,
            poster_url: model.poster_url,
            air_date: model.air_date,
            episode_count: model.episode_count,
        }
    }

    fn map_episode(model: episodes::Model) -> Episode {
        Episode {
            tmdb_id: TmdbId::new(model.tmdb_id),
            number: model.number,
            title: model.title,
            overview: model.overview,
            still_url: model.still_url,
            runtime_minutes: model.runtime_minutes,
        }
    }

    /// Insert-or-update keyed on the upstream id; same protection rules as
    /// the movie table (internal id, playback link and added-at survive
    /// conflicts).
    pub async fn upsert(&self, title: &CatalogTitle) -> anyhow::Result<CatalogTitle> {
        let active = series::ActiveModel {
            id: Set(title.id.clone()),
            tmdb_id: Set(title.tmdb_id.value()),
            title: Set(title.title.clone()),
            description: Set(title.description.clone()),
            poster_url: Set(title.poster_url.clone()),
            backdrop_url: Set(title.backdrop_url.clone()),
            logo_url: Set(title.logo_url.clone()),
            release_year: Set(title.release_year),
            rating: Set(title.rating),
            genre: Set(title.genre.clone()),
            video_url: Set(title.video_url.clone()),
            created_at: Set(title.added_at.clone()),
        };

        Series::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(series::Column::TmdbId)
                    .update_columns([
                        series::Column::Title,
                        series::Column::Description,
                        series::Column::PosterUrl,
                        series::Column::BackdropUrl,
                        series::Column::LogoUrl,
                        series::Column::ReleaseYear,
                        series::Column::Rating,
                        series::Column::Genre,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        let stored = self
            .get_by_tmdb_id(title.tmdb_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Series {} missing after upsert", title.tmdb_id))?;

        info!("Upserted series: {} (tmdb {})", stored.title, stored.tmdb_id);
        Ok(stored)
    }

    pub async fn update_descriptive(
        &self,
        tmdb_id: TmdbId,
        fields: &DescriptiveFields,
    ) -> anyhow::Result<bool> {
        let update = series::ActiveModel {
            title: Set(fields.title.clone()),
            description: Set(fields.description.clone()),
            poster_url: Set(fields.poster_url.clone()),
            backdrop_url: Set(fields.backdrop_url.clone()),
            logo_url: Set(fields.logo_url.clone()),
            release_year: Set(fields.release_year),
            rating: Set(fields.rating),
            genre: Set(fields.genre.clone()),
            ..Default::default()
        };

        let result = Series::update_many()
            .set(update)
            .filter(series::Column::TmdbId.eq(tmdb_id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<CatalogTitle>> {
        let model = Series::find_by_id(id.to_string()).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    pub async fn get_by_tmdb_id(&self, tmdb_id: TmdbId) -> anyhow::Result<Option<CatalogTitle>> {
        let model = Series::find()
            .filter(series::Column::TmdbId.eq(tmdb_id.value()))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    pub async fn list(&self) -> anyhow::Result<Vec<CatalogTitle>> {
        let rows = Series::find()
            .order_by_desc(series::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_batch(&self, limit: u64) -> anyhow::Result<Vec<CatalogTitle>> {
        use sea_orm::QuerySelect;

        let rows = Series::find()
            .order_by_asc(series::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Removes the series and everything under it in one transaction.
    pub async fn remove(&self, id: &str) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;

        let season_ids: Vec<i64> = Seasons::find()
            .filter(seasons::Column::SeriesId.eq(id.to_string()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.tmdb_id)
            .collect();

        if !season_ids.is_empty() {
            episodes::Entity::delete_many()
                .filter(episodes::Column::SeasonId.is_in(season_ids))
                .exec(&txn)
                .await?;
        }

        seasons::Entity::delete_many()
            .filter(seasons::Column::SeriesId.eq(id.to_string()))
            .exec(&txn)
            .await?;

        let result = Series::delete_by_id(id.to_string()).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed series with id: {}", id);
        }
        Ok(removed)
    }

    pub async fn upsert_season(&self, series_id: &str, season: &Season) -> anyhow::Result<()> {
        let active = seasons::ActiveModel {
            tmdb_id: Set(season.tmdb_id.value()),
            series_id: Set(series_id.to_string()),
            number: Set(season.number),
            name: Set(season.name.clone()),
            overview: Set(season.overview.clone()),
            poster_url: Set(season.poster_url.clone()),
            air_date: Set(season.air_date.clone()),
            episode_count: Set(season.episode_count),
        };

        Seasons::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(seasons::Column::TmdbId)
                    .update_columns([
                        seasons::Column::SeriesId,
                        seasons::Column::Number,
                        seasons::Column::Name,
                        seasons::Column::Overview,
                        seasons::Column::PosterUrl,
                        seasons::Column::AirDate,
                        seasons::Column::EpisodeCount,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn upsert_episodes(
        &self,
        season_id: TmdbId,
        episode_list: &[Episode],
    ) -> anyhow::Result<()> {
        if episode_list.is_empty() {
            return Ok(());
        }

        let rows: Vec<episodes::ActiveModel> = episode_list
            .iter()
            .map(|ep| episodes::ActiveModel {
                tmdb_id: Set(ep.tmdb_id.value()),
                season_id: Set(season_id.value()),
                number: Set(ep.number),
                title: Set(ep.title.clone()),
                overview: Set(ep.overview.clone()),
                still_url: Set(ep.still_url.clone()),
                runtime_minutes: Set(ep.runtime_minutes),
            })
            .collect();

        episodes::Entity::insert_many(rows)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(episodes::Column::TmdbId)
                    .update_columns([
                        episodes::Column::SeasonId,
                        episodes::Column::Number,
                        episodes::Column::Title,
                        episodes::Column::Overview,
                        episodes::Column::StillUrl,
                        episodes::Column::RuntimeMinutes,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn seasons_for(&self, series_id: &str) -> anyhow::Result<Vec<Season>> {
        let rows = Seasons::find()
            .filter(seasons::Column::SeriesId.eq(series_id.to_string()))
            .order_by_asc(seasons::Column::Number)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_season).collect())
    }

    pub async fn season_by_number(
        &self,
        series_id: &str,
        number: i32,
    ) -> anyhow::Result<Option<Season>> {
        let model = Seasons::find()
            .filter(seasons::Column::SeriesId.eq(series_id.to_string()))
            .filter(seasons::Column::Number.eq(number))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_season))
    }

    pub async fn episodes_for_season(&self, season_id: TmdbId) -> anyhow::Result<Vec<Episode>> {
        let rows = episodes::Entity::find()
            .filter(episodes::Column::SeasonId.eq(season_id.value()))
            .order_by_asc(episodes::Column::Number)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_episode).collect())
    }
}
