use sea_orm_migration::prelude::*;

mod m20250601_initial;
mod m20250714_add_app_config;
mod m20250802_add_created_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_initial::Migration),
            Box::new(m20250714_add_app_config::Migration),
            Box::new(m20250802_add_created_indexes::Migration),
        ]
    }
}
