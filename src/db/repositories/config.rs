use crate::entities::{app_config, prelude::*};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Operator-tunable settings persisted alongside the catalog, so a value
/// changed at runtime survives restarts without a config file edit.
pub struct ConfigRepository {
    conn: DatabaseConnection,
}

impl ConfigRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row = AppConfig::find_by_id(key.to_string()).one(&self.conn).await?;
        Ok(row.map(|m| m.value))
    }

    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let active = app_config::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        AppConfig::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(app_config::Column::Key)
                    .update_columns([app_config::Column::Value, app_config::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}
