pub mod availability;
pub use availability::{AvailabilityService, AvailabilitySource};

pub mod clock;
pub use clock::{Clock, SystemClock};

pub mod metadata;
pub use metadata::MetadataProvider;

pub mod pacing;
pub use pacing::Pacer;

pub mod resolver;
pub use resolver::{ContentResolver, Resolution};

pub mod discovery;
pub use discovery::DiscoveryService;

pub mod import_service;
pub mod import_service_impl;
pub use import_service::{ImportError, ImportService};
pub use import_service_impl::DefaultImportService;
