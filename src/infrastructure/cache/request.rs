// TTL request cache with in-flight deduplication
use crate::domain::error::HqError;
use crate::domain::model::FetchSource;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A cached value together with where it came from.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub value: T,
    pub source: FetchSource,
}

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, Arc<HqError>>>>;

/// Keyed TTL cache that performs at most one fetch per key at a time.
///
/// A read within `ttl` of the last successful store resolves from the
/// cache. A read past that joins the pending fetch for the key if one
/// exists, otherwise it starts the fetch itself; every concurrent caller
/// for the same key observes a single network round-trip. A failed fetch
/// is never stored, so the next read naturally retries.
///
/// A `ttl` of zero skips the freshness check (the forced-refresh path)
/// but still joins a pending fetch.
///
/// Values are stored as-is and handed out as clones; callers keep
/// payloads behind `Arc` so no consumer can mutate another's view.
#[derive(Clone)]
pub struct RequestCache<T: Clone + Send + Sync + 'static> {
    entries: Arc<DashMap<String, Entry<T>>>,
    in_flight: Arc<DashMap<String, SharedFetch<T>>>,
}

impl<T: Clone + Send + Sync + 'static> RequestCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Resolve `key`, fetching with `fetcher` when no fresh entry exists.
    ///
    /// `fetcher` is invoked at most once per cache miss across all
    /// concurrent callers; its failure is propagated to every waiter as
    /// [`HqError::Upstream`] and nothing is cached.
    pub async fn get_with<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetcher: F,
    ) -> Result<Cached<T>, HqError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, HqError>> + Send + 'static,
    {
        if !ttl.is_zero() {
            if let Some(entry) = self.entries.get(key) {
                if entry.stored_at.elapsed() < ttl {
                    return Ok(Cached {
                        value: entry.value.clone(),
                        source: FetchSource::LocalCache,
                    });
                }
            }
        }

        let (shared, source) = self.join_or_start(key, fetcher);
        let value = shared.await.map_err(HqError::Upstream)?;
        Ok(Cached { value, source })
    }

    /// Look at the stored value for `key` regardless of freshness.
    pub fn peek(&self, key: &str) -> Option<T> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Seed or overwrite the entry for `key`, stamping the current time.
    ///
    /// Lets a caller that performed its own mutation write the result
    /// through instead of refetching right after the write.
    pub fn insert(&self, key: String, value: T) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop the entry and any pending fetch for `key`; the next read refetches.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
        self.in_flight.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.in_flight.clear();
    }

    fn join_or_start<F, Fut>(&self, key: &str, fetcher: F) -> (SharedFetch<T>, FetchSource)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, HqError>> + Send + 'static,
    {
        match self.in_flight.entry(key.to_string()) {
            MapEntry::Occupied(pending) => {
                debug!(key, "joining in-flight request");
                (pending.get().clone(), FetchSource::InFlight)
            }
            MapEntry::Vacant(slot) => {
                let entries = Arc::clone(&self.entries);
                let in_flight = Arc::clone(&self.in_flight);
                let owned_key = key.to_string();
                let fut = fetcher();
                let shared = async move {
                    match fut.await {
                        Ok(value) => {
                            entries.insert(
                                owned_key.clone(),
                                Entry {
                                    value: value.clone(),
                                    stored_at: Instant::now(),
                                },
                            );
                            in_flight.remove(&owned_key);
                            Ok(value)
                        }
                        Err(e) => {
                            // 失败不写入缓存,下一次读取重新请求
                            in_flight.remove(&owned_key);
                            Err(Arc::new(e))
                        }
                    }
                }
                .boxed()
                .shared();
                slot.insert(shared.clone());
                (shared, FetchSource::Network)
            }
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for RequestCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
