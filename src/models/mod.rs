pub mod listing;
pub mod season;
pub mod title;

pub use listing::{EnrichedResult, EpisodeAvailability};
pub use season::{Episode, Season};
pub use title::{CatalogTitle, DescriptiveFields};
