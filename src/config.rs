use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable that overrides `tmdb.api_key` when set. Loaded from
/// the process environment or a `.env` file so the key stays out of
/// `config.toml`.
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub tmdb: TmdbConfig,

    pub availability: AvailabilityConfig,

    pub sync: SyncConfig,

    pub scheduler: SchedulerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            tmdb: TmdbConfig::default(),
            availability: AvailabilityConfig::default(),
            sync: SyncConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/vodarr.db".to_string(),
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,

    /// API key sent with every request. Usually supplied via the
    /// `TMDB_API_KEY` environment variable instead of the file.
    pub api_key: String,

    /// Locale sent as `language=` on metadata requests.
    pub language: String,

    /// Logo pick order by language tag; earlier wins.
    pub logo_languages: Vec<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            language: crate::constants::locale::METADATA_LANGUAGE.to_string(),
            logo_languages: crate::constants::locale::LOGO_LANGUAGE_PRIORITY
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    pub base_url: String,

    /// How long a fetched identifier set stays trusted before the next
    /// check refetches it.
    pub cache_ttl_minutes: i64,

    /// Request timeout in seconds applied to the shared HTTP client
    /// (default: 10)
    pub request_timeout_seconds: u32,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            base_url: crate::constants::playback::DEFAULT_BASE_URL.to_string(),
            cache_ttl_minutes: crate::constants::cache::AVAILABILITY_TTL_MINUTES,
            request_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Pause between items in batch imports and library syncs. Protects the
    /// upstreams from burst load; batches scale linearly with this.
    pub import_delay_ms: u64,

    /// Titles per kind refreshed in one library sync pass.
    pub batch_limit: u64,

    /// When true, an eligible title reached through `resolve` is imported
    /// on the spot instead of waiting for an operator import.
    pub auto_add_on_resolve: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            import_delay_ms: 750,
            batch_limit: crate::constants::limits::SYNC_BATCH_LIMIT,
            auto_add_on_resolve: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,

    /// Library metadata refresh interval in hours (default: 12)
    pub sync_interval_hours: u32,

    pub cron_expression: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sync_interval_hours: 12,
            cron_expression: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                let mut config = Self::load_from_path(path)?;
                config.apply_env_overrides();
                return Ok(config);
            }
        }

        info!("No config file found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(TMDB_API_KEY_ENV)
            && !key.is_empty()
        {
            self.tmdb.api_key = key;
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("vodarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".vodarr").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.tmdb.base_url).context("Invalid tmdb.base_url")?;
        url::Url::parse(&self.availability.base_url).context("Invalid availability.base_url")?;

        if self.availability.cache_ttl_minutes <= 0 {
            anyhow::bail!("availability.cache_ttl_minutes must be > 0");
        }

        if self.availability.request_timeout_seconds == 0 {
            anyhow::bail!("availability.request_timeout_seconds must be > 0");
        }

        if self.sync.batch_limit == 0 {
            anyhow::bail!("sync.batch_limit must be > 0");
        }

        if self.scheduler.enabled
            && self.scheduler.sync_interval_hours == 0
            && self.scheduler.cron_expression.is_none()
        {
            anyhow::bail!("Scheduler interval must be > 0 or cron expression must be set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.availability.cache_ttl_minutes, 60);
        assert_eq!(config.sync.import_delay_ms, 750);
        assert!(!config.sync.auto_add_on_resolve);
        assert_eq!(config.tmdb.language, "pt-BR");
        assert_eq!(config.tmdb.logo_languages, vec!["pt", "en"]);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[tmdb]"));
        assert!(toml_str.contains("[availability]"));
        assert!(toml_str.contains("[sync]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [availability]
            cache_ttl_minutes = 15
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.availability.cache_ttl_minutes, 15);

        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.sync.batch_limit, 50);
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.tmdb.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
