// Per-kitchen bundle cache layered on the request cache
use crate::domain::error::HqError;
use crate::domain::model::{FoodSupply, KitchenBundle};
use crate::infrastructure::cache::request::{Cached, RequestCache};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Cache of one bundle (food supplies + recipes) per kitchen id.
///
/// Both sub-resources are fetched together and share one timestamp, so a
/// bundle is fresh or stale as a whole. Keying and TTL selection live
/// here; staleness, deduplication and write-through are the request
/// cache's job.
#[derive(Clone)]
pub struct KitchenCache {
    inner: RequestCache<Arc<KitchenBundle>>,
}

impl KitchenCache {
    pub fn new() -> Self {
        Self {
            inner: RequestCache::new(),
        }
    }

    /// Resolve the bundle for `kitchen_id`. `force` bypasses the
    /// freshness check (but still joins a pending fetch for the key).
    pub async fn bundle<F, Fut>(
        &self,
        kitchen_id: &str,
        ttl: Duration,
        force: bool,
        fetcher: F,
    ) -> Result<Cached<Arc<KitchenBundle>>, HqError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<KitchenBundle>, HqError>> + Send + 'static,
    {
        let ttl = if force { Duration::ZERO } else { ttl };
        self.inner.get_with(kitchen_id, ttl, fetcher).await
    }

    /// Write a refilled supply through the cached bundle, if one exists.
    ///
    /// Replaces the matching supply (or appends an unknown one) and
    /// restamps the bundle, so the view right after a refill reflects the
    /// mutation without a refetch.
    pub fn apply_refill(&self, kitchen_id: &str, updated: &FoodSupply) {
        if let Some(bundle) = self.inner.peek(kitchen_id) {
            let mut next = (*bundle).clone();
            match next.food_supplies.iter_mut().find(|s| s.id == updated.id) {
                Some(slot) => *slot = updated.clone(),
                None => next.food_supplies.push(updated.clone()),
            }
            next.fetched_at = chrono::Utc::now();
            self.inner.insert(kitchen_id.to_string(), Arc::new(next));
        }
    }

    pub fn invalidate(&self, kitchen_id: &str) {
        self.inner.invalidate(kitchen_id);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl Default for KitchenCache {
    fn default() -> Self {
        Self::new()
    }
}
