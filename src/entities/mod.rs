pub mod prelude;

pub mod app_config;
pub mod episodes;
pub mod movies;
pub mod seasons;
pub mod series;
