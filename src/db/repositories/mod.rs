pub mod config;
pub mod movie;
pub mod series;

pub use config::ConfigRepository;
pub use movie::MovieRepository;
pub use series::SeriesRepository;
