pub mod superflix;
pub mod tmdb;
