pub use super::app_config::Entity as AppConfig;
pub use super::episodes::Entity as Episodes;
pub use super::movies::Entity as Movies;
pub use super::seasons::Entity as Seasons;
pub use super::series::Entity as Series;
