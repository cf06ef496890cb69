use crate::domain::{MediaKind, TmdbId};
use crate::entities::{movies, prelude::*};
use crate::models::{CatalogTitle, DescriptiveFields};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: movies::Model) -> CatalogTitle {
        CatalogTitle {
            id: model.id,
            tmdb_id: TmdbId::new(model.tmdb_id),
            kind: MediaKind::Movie,
            title: model.title,
            description: model.description,
            poster_url: model.poster_url,
            backdrop_url: model.backdrop_url,
            logo_url: model.logo_url,
            release_year: model.release_year,
            rating: model.rating,
            genre: model.genre,
            runtime_minutes: model.runtime_minutes,
            video_url: model.video_url,
            added_at: model.created_at,
        }
    }

    /// Insert-or-update keyed on the upstream id. On conflict the internal
    /// id, playback link and added-at keep their first-import values.
    /// Returns the stored row, whichever id it ended up with.
    pub async fn upsert(&self, title: &CatalogTitle) -> anyhow::Result<CatalogTitle> {
        let active = movies::ActiveModel {
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
            runtime_minutes: Set(title.runtime_minutes),
            video_url: Set(title.video_url.clone()),
            created_at: Set(title.added_at.clone()),
        };

        Movies::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(movies::Column::TmdbId)
                    .update_columns([
                        movies::Column::Title,
                        movies::Column::Description,
                        movies::Column::PosterUrl,
                        movies::Column::BackdropUrl,
                        movies::Column::LogoUrl,
                        movies::Column::ReleaseYear,
                        movies::Column::Rating,
                        movies::Column::Genre,
                        movies::Column::RuntimeMinutes,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        let stored = self
            .get_by_tmdb_id(title.tmdb_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Movie {} missing after upsert", title.tmdb_id))?;

        info!("Upserted movie: {} (tmdb {})", stored.title, stored.tmdb_id);
        Ok(stored)
    }

    /// Rewrites descriptive columns only; the playback link is deliberately
    /// not in the set clause.
    pub async fn update_descriptive(
        &self,
        tmdb_id: TmdbId,
        fields: &DescriptiveFields,
    ) -> anyhow::Result<bool> {
        let update = movies::ActiveModel {
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

        let result = Movies::update_many()
            .set(update)
            .filter(movies::Column::TmdbId.eq(tmdb_id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<CatalogTitle>> {
        let model = Movies::find_by_id(id.to_string()).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    pub async fn get_by_tmdb_id(&self, tmdb_id: TmdbId) -> anyhow::Result<Option<CatalogTitle>> {
        let model = Movies::find()
            .filter(movies::Column::TmdbId.eq(tmdb_id.value()))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    pub async fn list(&self) -> anyhow::Result<Vec<CatalogTitle>> {
        let rows = Movies::find()
            .order_by_desc(movies::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Oldest-first slice for sync passes, so repeatedly interrupted runs
    /// still reach every row eventually.
    pub async fn list_batch(&self, limit: u64) -> anyhow::Result<Vec<CatalogTitle>> {
        use sea_orm::QuerySelect;

        let rows = Movies::find()
            .order_by_asc(movies::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn remove(&self, id: &str) -> anyhow::Result<bool> {
        let result = Movies::delete_by_id(id.to_string()).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed movie with id: {}", id);
        }
        Ok(removed)
    }
}
