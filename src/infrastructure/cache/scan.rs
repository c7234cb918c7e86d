// In-memory scan cache (normalized code → asset)
use crate::domain::model::Asset;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// 扫码结果缓存有效期
pub const SCAN_CACHE_TTL: Duration = Duration::from_secs(60);

/// Short-lived map from scanned code to asset, shared between the scan
/// session and the asset mutation commands. Negative lookups are never
/// stored here.
#[derive(Clone)]
pub struct ScanCache {
    map: Arc<DashMap<String, (Arc<Asset>, Instant)>>,
    ttl: Duration,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::with_ttl(SCAN_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, code: &str) -> Option<Arc<Asset>> {
        let entry = self.map.get(code)?;
        let (asset, stored_at) = entry.value();
        if stored_at.elapsed() < self.ttl {
            Some(Arc::clone(asset))
        } else {
            None
        }
    }

    pub fn insert(&self, code: String, asset: Arc<Asset>) {
        self.map.insert(code, (asset, Instant::now()));
    }

    pub fn remove(&self, code: &str) {
        self.map.remove(code);
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl Default for ScanCache {
    fn default() -> Self {
        Self::new()
    }
}
