use crate::domain::error::HqError;
use crate::domain::model::{DashboardSnapshot, Notices};
use crate::infrastructure::cache::{KitchenCache, RequestCache, ScanCache};
use crate::infrastructure::config::Config;
use crate::infrastructure::network::{create_client, ApiClient};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub api: Arc<ApiClient>,
    pub dashboard: RequestCache<Arc<DashboardSnapshot>>,
    pub notices: RequestCache<Arc<Notices>>,
    pub kitchens: KitchenCache,
    pub scan_cache: ScanCache,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, HqError> {
        let http_client = create_client(config.api.timeout_secs)?;
        let api = Arc::new(ApiClient::new(
            http_client,
            config.api.base_url.clone(),
            config.api.token.clone(),
        ));
        let scan_cache = ScanCache::with_ttl(config.cache.scan_ttl());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            api,
            dashboard: RequestCache::new(),
            notices: RequestCache::new(),
            kitchens: KitchenCache::new(),
            scan_cache,
        })
    }
}
