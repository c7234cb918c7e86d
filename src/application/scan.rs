use crate::domain::error::HqError;
use crate::domain::model::Asset;
use crate::domain::traits::AssetLookup;
use crate::infrastructure::cache::scan::ScanCache;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// States of one scan session.
///
/// `Found` and `NotFound` both offer "scan again" back to `Idle`; the
/// asset mutations available from `Found` write their result back through
/// [`ScanSession::absorb_update`] and stay on `Found`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    Searching,
    Found(Arc<Asset>),
    NotFound(String),
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Found(Arc<Asset>),
    NotFound,
    /// A newer submission took over; no state transition happened
    Superseded,
    /// Same code re-submitted within the debounce window; ignored
    Debounced,
}

/// Maps a scanned or typed code to an asset.
///
/// Lookups go cache-then-network; the previous in-flight lookup is
/// cancelled before a new one starts, so a fast second scan always wins
/// over a slower stale first one. Not-found results are never cached.
pub struct ScanSession {
    lookup: Arc<dyn AssetLookup>,
    cache: ScanCache,
    state: Mutex<ScanState>,
    current: Mutex<Option<CancellationToken>>,
    last_submit: Mutex<Option<(String, Instant)>>,
    debounce: Duration,
}

impl ScanSession {
    pub fn new(lookup: Arc<dyn AssetLookup>, cache: ScanCache, debounce: Duration) -> Self {
        Self {
            lookup,
            cache,
            state: Mutex::new(ScanState::Idle),
            current: Mutex::new(None),
            last_submit: Mutex::new(None),
            debounce,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state.lock().unwrap().clone()
    }

    pub fn found_asset(&self) -> Option<Arc<Asset>> {
        match &*self.state.lock().unwrap() {
            ScanState::Found(asset) => Some(Arc::clone(asset)),
            _ => None,
        }
    }

    /// "Scan again": back to idle, ready for the next code.
    pub fn scan_again(&self) {
        self.set_state(ScanState::Idle);
    }

    /// Resolve a scanned or typed code.
    ///
    /// `no_cache` skips the scan cache for this submission (the result is
    /// still written back on success).
    pub async fn submit(&self, raw: &str, no_cache: bool) -> Result<ScanOutcome, HqError> {
        let code = raw.trim().to_string();
        if code.is_empty() {
            return Err(HqError::Input("Empty scan code".to_string()));
        }

        // 同一编码在防抖窗口内的重复提交直接忽略
        if self.debounced(&code) {
            debug!(code = %code, "duplicate submission debounced");
            return Ok(ScanOutcome::Debounced);
        }

        if !no_cache {
            if let Some(asset) = self.cache.get(&code) {
                debug!(code = %code, "scan cache hit");
                self.set_state(ScanState::Found(Arc::clone(&asset)));
                return Ok(ScanOutcome::Found(asset));
            }
        }

        // 取消上一个进行中的查询,最新请求获胜
        let token = CancellationToken::new();
        {
            let mut current = self.current.lock().unwrap();
            if let Some(prev) = current.replace(token.clone()) {
                prev.cancel();
            }
        }

        self.set_state(ScanState::Searching);

        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!(code = %code, "lookup superseded before completion");
                return Ok(ScanOutcome::Superseded);
            }
            result = self.resolve(&code) => result,
        };

        // The lookup may settle in the same poll as a cancellation; a
        // superseded lookup must not touch session state.
        if token.is_cancelled() {
            debug!(code = %code, "late result discarded");
            return Ok(ScanOutcome::Superseded);
        }

        match result {
            Ok(Some(asset)) => {
                let asset = Arc::new(asset);
                self.cache.insert(code, Arc::clone(&asset));
                self.set_state(ScanState::Found(Arc::clone(&asset)));
                Ok(ScanOutcome::Found(asset))
            }
            Ok(None) => {
                // 未找到的结果不进缓存
                self.set_state(ScanState::NotFound(code));
                Ok(ScanOutcome::NotFound)
            }
            Err(e) => {
                self.set_state(ScanState::Idle);
                Err(e)
            }
        }
    }

    /// Write a mutated asset back through the cache and the found panel.
    pub fn absorb_update(&self, updated: Arc<Asset>) -> Arc<Asset> {
        let asset = updated;
        self.cache.insert(asset.id.clone(), Arc::clone(&asset));
        if let Some(code) = &asset.code {
            self.cache.insert(code.clone(), Arc::clone(&asset));
        }
        self.set_state(ScanState::Found(Arc::clone(&asset)));
        asset
    }

    /// Fast path first; the broad search runs only when the fast path
    /// fails with something other than a clean not-found.
    async fn resolve(&self, code: &str) -> Result<Option<Asset>, HqError> {
        match self.lookup.scan(code).await {
            Ok(found) => Ok(found),
            Err(primary_err) => {
                debug!(error = %primary_err, "fast-path lookup failed, trying broad search");
                match self.lookup.search(code).await {
                    Ok(mut assets) if !assets.is_empty() => Ok(Some(assets.remove(0))),
                    Ok(_) => Ok(None),
                    // 两个端点都失败时报告第一个错误
                    Err(_) => Err(primary_err),
                }
            }
        }
    }

    fn debounced(&self, code: &str) -> bool {
        let mut last = self.last_submit.lock().unwrap();
        if let Some((prev_code, at)) = last.as_ref() {
            if prev_code == code && at.elapsed() < self.debounce {
                return true;
            }
        }
        *last = Some((code.to_string(), Instant::now()));
        false
    }

    fn set_state(&self, next: ScanState) {
        *self.state.lock().unwrap() = next;
    }
}
