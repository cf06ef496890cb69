//! CLI module - Command-line interface for Vodarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Vodarr - Streaming Catalog Manager
/// Curates a playable movie/series catalog from upstream providers
#[derive(Parser)]
#[command(name = "vodarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as background daemon with scheduler
    #[command(alias = "-d", alias = "--daemon")]
    Daemon,

    /// Check store and upstream provider connectivity
    #[command(alias = "-c", alias = "--check")]
    Check,

    /// Search the metadata provider for titles
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show trending, popular or top-rated charts
    #[command(alias = "d")]
    Discover {
        /// Chart to show: trending, popular or top-rated
        #[arg(default_value = "trending")]
        chart: String,
        /// Media kind for popular/top-rated charts (movie or series)
        #[arg(default_value = "movie")]
        kind: String,
    },

    /// Show titles similar to a given one
    Similar {
        /// TMDB id of the reference title
        id: i64,
        /// Media kind (movie or series)
        kind: String,
    },

    /// Show details and cast for a title
    #[command(alias = "i")]
    Info {
        /// TMDB id
        id: i64,
        /// Media kind (movie or series)
        kind: String,
    },

    /// Import a title into the catalog
    Import {
        /// TMDB id
        id: i64,
        /// Media kind (movie or series)
        kind: String,
    },

    /// Preview a movie collection, optionally importing its parts
    Collection {
        /// TMDB collection id
        id: i64,
        /// Import every available part that is not yet in the catalog
        #[arg(long)]
        import: bool,
    },

    /// List the catalog, newest first
    #[command(alias = "ls", alias = "l")]
    List,

    /// Remove a catalog entry
    #[command(alias = "rm", alias = "r")]
    Remove {
        /// Internal catalog id
        id: String,
    },

    /// Resolve an external reference against the catalog
    Resolve {
        /// TMDB id
        id: i64,
        /// Media kind (movie or series)
        kind: String,
    },

    /// Refresh metadata for one title or the whole library
    Sync {
        /// TMDB id of a single title to refresh
        id: Option<i64>,
        /// Media kind (movie or series), required with an id
        kind: Option<String>,
    },

    /// Show episode availability for one season of a series
    Episodes {
        /// TMDB id of the series
        id: i64,
        /// Season number
        season: i32,
    },

    /// Read or write catalog-wide configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show a config value
    Get {
        /// Config key (e.g. base_playback_url)
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
}

pub use commands::*;
