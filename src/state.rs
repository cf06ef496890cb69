use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::superflix::SuperflixClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AvailabilityService, Clock, ContentResolver, DefaultImportService, DiscoveryService,
    ImportService, MetadataProvider, SystemClock,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Vodarr/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Everything a command handler or the daemon loop needs, wired once.
///
/// Both upstream clients ride the same pooled HTTP client, and every
/// service shares the one store and availability cache.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub tmdb: TmdbClient,

    pub superflix: SuperflixClient,

    pub availability: Arc<AvailabilityService>,

    pub import_service: Arc<dyn ImportService>,

    pub resolver: Arc<ContentResolver>,

    pub discovery: Arc<DiscoveryService>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client =
            build_shared_http_client(config.availability.request_timeout_seconds.into())?;

        let tmdb = TmdbClient::with_shared_client(http_client.clone(), &config.tmdb);
        let superflix =
            SuperflixClient::with_shared_client(http_client, &config.availability.base_url);

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let availability = Arc::new(AvailabilityService::new(
            Arc::new(superflix.clone()),
            clock.clone(),
            config.availability.cache_ttl_minutes,
        ));

        let metadata: Arc<dyn MetadataProvider> = Arc::new(tmdb.clone());

        let import_service: Arc<dyn ImportService> = Arc::new(DefaultImportService::new(
            store.clone(),
            metadata.clone(),
            availability.clone(),
            clock.clone(),
            config.sync.import_delay_ms,
            config.sync.batch_limit,
        ));

        let resolver = Arc::new(
            ContentResolver::new(
                store.clone(),
                metadata,
                availability.clone(),
                clock,
                config.sync.auto_add_on_resolve,
            )
            .with_importer(import_service.clone()),
        );

        let discovery = Arc::new(DiscoveryService::new(
            store.clone(),
            tmdb.clone(),
            availability.clone(),
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            tmdb,
            superflix,
            availability,
            import_service,
            resolver,
            discovery,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
