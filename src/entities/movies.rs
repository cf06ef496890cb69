use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    /// Internal identifier, a uuid assigned on first import.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub tmdb_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub logo_url: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f32>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    /// Player link composed at import time. Operator-editable afterwards;
    /// metadata syncs must not rewrite it.
    pub video_url: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
