//! Domain service for bringing external titles into the local catalog.
//!
//! This module defines the import boundary: single-title import,
//! collection (franchise) import, and metadata re-sync for rows that
//! already exist. Implementations own the ordering of availability
//! gates, provider fetches and catalog writes.

use crate::domain::{MediaKind, TmdbId};
use thiserror::Error;

/// Errors specific to the import process.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Title {tmdb_id} ({kind}) is not available on the playback provider")]
    NotAvailable { tmdb_id: TmdbId, kind: MediaKind },

    #[error("Title {tmdb_id} ({kind}) not found at the metadata provider")]
    UnknownTitle { tmdb_id: TmdbId, kind: MediaKind },

    #[error("No catalog entry with id {0}")]
    TitleNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("External API error: {service} - {message}")]
    ExternalApi { service: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImportError {
    /// Creates an external API error for the metadata provider.
    pub fn metadata_error(msg: impl Into<String>) -> Self {
        Self::ExternalApi {
            service: "TMDB".to_string(),
            message: msg.into(),
        }
    }
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Outcome of a successful single-title import.
#[derive(Debug, Clone)]
pub struct ImportedTitle {
    pub internal_id: String,
    pub tmdb_id: TmdbId,
    pub kind: MediaKind,
    pub title: String,
}

/// One entry of a batch import request.
#[derive(Debug, Clone, Copy)]
pub struct CollectionItem {
    pub tmdb_id: TmdbId,
    pub kind: MediaKind,
}

/// A batch entry that could not be imported, with the reason.
#[derive(Debug, Clone)]
pub struct FailedImport {
    pub tmdb_id: TmdbId,
    pub error: String,
}

/// Tally of a collection import run.
#[derive(Debug, Default)]
pub struct CollectionImportReport {
    pub imported: usize,
    pub failed: usize,
    pub failed_items: Vec<FailedImport>,
}

/// Tally of a library-wide metadata refresh.
#[derive(Debug, Default)]
pub struct LibrarySyncReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Domain service trait for catalog import and sync operations.
#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// Imports one title into the catalog.
    ///
    /// Availability is re-validated first even if a listing already showed
    /// the title as available, since listings go stale between render and
    /// click. For series, every season above ordinal zero is imported with
    /// its episodes; one bad season is logged and skipped rather than
    /// failing the whole import.
    ///
    /// # Errors
    ///
    /// - [`ImportError::NotAvailable`] when the playback provider does not
    ///   carry the title
    /// - [`ImportError::UnknownTitle`] when the metadata provider has no
    ///   such id
    /// - [`ImportError::ExternalApi`] when a required provider fetch fails
    /// - [`ImportError::Database`] on catalog write failures
    async fn import_title(
        &self,
        tmdb_id: TmdbId,
        kind: MediaKind,
    ) -> Result<ImportedTitle, ImportError>;

    /// Imports a batch of titles sequentially, pacing requests to stay
    /// friendly to the providers.
    ///
    /// Individual failures are collected in the report and never abort
    /// the remainder of the batch.
    async fn import_collection(&self, items: Vec<CollectionItem>) -> CollectionImportReport;

    /// Re-fetches metadata for an existing row and overwrites its
    /// descriptive fields.
    ///
    /// The playback URL is never touched: operators may have customized
    /// it after import and a metadata refresh must not undo that.
    ///
    /// # Errors
    ///
    /// - [`ImportError::UnknownTitle`] when the metadata provider no
    ///   longer knows the id
    /// - [`ImportError::TitleNotFound`] when the catalog row is gone
    /// - [`ImportError::ExternalApi`] when the provider fetch fails
    async fn sync_title(
        &self,
        internal_id: String,
        tmdb_id: TmdbId,
        kind: MediaKind,
    ) -> Result<(), ImportError>;

    /// Refreshes descriptive metadata across the library in batches,
    /// oldest rows first. Per-title failures are tallied, not raised.
    async fn sync_library(&self) -> LibrarySyncReport;
}
