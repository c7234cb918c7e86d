//! 扫码查询功能测试

use async_trait::async_trait;
use hq::application::scan::{ScanOutcome, ScanSession, ScanState};
use hq::domain::error::HqError;
use hq::domain::model::{Asset, AssetStatus};
use hq::domain::traits::AssetLookup;
use hq::infrastructure::cache::scan::ScanCache;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEBOUNCE: Duration = Duration::from_millis(1500);

fn sample_asset(id: &str, code: &str) -> Asset {
    Asset {
        id: id.to_string(),
        name: format!("Asset {}", id),
        code: Some(code.to_string()),
        category: Some("appliance".to_string()),
        status: AssetStatus::InUse,
        floor: Some("3F".to_string()),
        room: Some("305".to_string()),
        purchase_cost: Some(1200.0),
        updated_at: None,
    }
}

struct StubLookup {
    assets: HashMap<String, Asset>,
    delays_ms: HashMap<String, u64>,
    scan_calls: AtomicUsize,
    search_calls: AtomicUsize,
    fail_scan: bool,
    fail_search: bool,
}

impl StubLookup {
    fn new(assets: Vec<Asset>) -> Self {
        let assets = assets
            .into_iter()
            .map(|asset| (asset.code.clone().unwrap(), asset))
            .collect();
        Self {
            assets,
            delays_ms: HashMap::new(),
            scan_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            fail_scan: false,
            fail_search: false,
        }
    }
}

#[async_trait]
impl AssetLookup for StubLookup {
    async fn scan(&self, code: &str) -> Result<Option<Asset>, HqError> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ms) = self.delays_ms.get(code) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.fail_scan {
            return Err(HqError::Api("HTTP 500: Server-side exception".to_string()));
        }
        Ok(self.assets.get(code).cloned())
    }

    async fn search(&self, code: &str) -> Result<Vec<Asset>, HqError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(HqError::Api("HTTP 503: Backend temporarily unavailable".to_string()));
        }
        Ok(self.assets.get(code).cloned().into_iter().collect())
    }
}

#[tokio::test(start_paused = true)]
async fn test_second_scan_hits_cache() {
    let stub = Arc::new(StubLookup::new(vec![sample_asset("a-1", "A1")]));
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    // 输入会被修剪后查询
    let first = session.submit("  A1  ", false).await.unwrap();
    match first {
        ScanOutcome::Found(asset) => assert_eq!(asset.id, "a-1"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 1);

    // 防抖窗口之后、60 秒缓存内的再次扫描不发请求
    tokio::time::advance(Duration::from_secs(2)).await;
    let second = session.submit("A1", false).await.unwrap();
    match second {
        ScanOutcome::Found(asset) => assert_eq!(asset.id, "a-1"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scan_cache_expires() {
    let stub = Arc::new(StubLookup::new(vec![sample_asset("a-1", "A1")]));
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    session.submit("A1", false).await.unwrap();
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 1);

    // 过了 60 秒缓存失效,重新请求
    tokio::time::advance(Duration::from_secs(61)).await;
    session.submit("A1", false).await.unwrap();
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_no_cache_flag_bypasses_cache() {
    let stub = Arc::new(StubLookup::new(vec![sample_asset("a-1", "A1")]));
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    session.submit("A1", false).await.unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;
    session.submit("A1", true).await.unwrap();
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_is_not_cached() {
    let stub = Arc::new(StubLookup::new(vec![sample_asset("a-1", "A1")]));
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    let outcome = session.submit("NOPE", false).await.unwrap();
    assert_eq!(outcome, ScanOutcome::NotFound);
    assert_eq!(session.state(), ScanState::NotFound("NOPE".to_string()));
    // 干净的未找到不会触发兜底搜索
    assert_eq!(stub.search_calls.load(Ordering::SeqCst), 0);

    // 未找到的结果不进缓存,再次提交重新请求
    tokio::time::advance(Duration::from_secs(2)).await;
    session.submit("NOPE", false).await.unwrap();
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_search_on_primary_failure() {
    let mut stub = StubLookup::new(vec![sample_asset("b-2", "B2")]);
    stub.fail_scan = true;
    let stub = Arc::new(stub);
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    // 快速通道失败(非 404)时走兜底搜索
    let outcome = session.submit("B2", false).await.unwrap();
    match outcome {
        ScanOutcome::Found(asset) => assert_eq!(asset.id, "b-2"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(stub.search_calls.load(Ordering::SeqCst), 1);

    // 兜底命中的结果同样写入缓存
    tokio::time::advance(Duration::from_secs(2)).await;
    session.submit("B2", false).await.unwrap();
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_empty_means_not_found() {
    let mut stub = StubLookup::new(Vec::new());
    stub.fail_scan = true;
    let stub = Arc::new(stub);
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    let outcome = session.submit("GONE", false).await.unwrap();
    assert_eq!(outcome, ScanOutcome::NotFound);
}

#[tokio::test(start_paused = true)]
async fn test_error_when_both_endpoints_fail() {
    let mut stub = StubLookup::new(Vec::new());
    stub.fail_scan = true;
    stub.fail_search = true;
    let stub = Arc::new(stub);
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    let err = session.submit("B2", false).await.unwrap_err();
    assert!(matches!(err, HqError::Api(_)));
    // 出错后回到待扫状态
    assert_eq!(session.state(), ScanState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_submission_is_debounced() {
    let stub = Arc::new(StubLookup::new(vec![sample_asset("a-1", "A1")]));
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    session.submit("A1", false).await.unwrap();
    let repeat = session.submit("A1", false).await.unwrap();
    assert_eq!(repeat, ScanOutcome::Debounced);
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_code_is_rejected() {
    let stub = Arc::new(StubLookup::new(Vec::new()));
    let session = ScanSession::new(stub, ScanCache::new(), DEBOUNCE);

    let err = session.submit("   ", false).await.unwrap_err();
    assert!(matches!(err, HqError::Input(_)));
}

#[tokio::test(start_paused = true)]
async fn test_newer_scan_supersedes_older() {
    let mut stub = StubLookup::new(vec![
        sample_asset("slow-1", "SLOW"),
        sample_asset("fast-1", "FAST"),
    ]);
    stub.delays_ms.insert("SLOW".to_string(), 100);
    stub.delays_ms.insert("FAST".to_string(), 10);
    let stub = Arc::new(stub);
    let session = Arc::new(ScanSession::new(
        stub.clone(),
        ScanCache::new(),
        DEBOUNCE,
    ));

    // 慢查询先挂起
    let older = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit("SLOW", false).await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    // 新扫描取消旧查询,最新请求获胜
    let newer = session.submit("FAST", false).await.unwrap();
    match newer {
        ScanOutcome::Found(asset) => assert_eq!(asset.id, "fast-1"),
        other => panic!("unexpected outcome: {:?}", other),
    }

    // 旧查询被取代,不改变会话状态
    let older = older.await.unwrap().unwrap();
    assert_eq!(older, ScanOutcome::Superseded);
    match session.state() {
        ScanState::Found(asset) => assert_eq!(asset.id, "fast-1"),
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_mutation_writes_through_cache() {
    let stub = Arc::new(StubLookup::new(vec![sample_asset("a-1", "A1")]));
    let session = ScanSession::new(stub.clone(), ScanCache::new(), DEBOUNCE);

    session.submit("A1", false).await.unwrap();

    // 变更后的资产写回缓存和已找到面板
    let mut updated = sample_asset("a-1", "A1");
    updated.status = AssetStatus::UnderRepair;
    session.absorb_update(Arc::new(updated));

    tokio::time::advance(Duration::from_secs(2)).await;
    let outcome = session.submit("A1", false).await.unwrap();
    match outcome {
        ScanOutcome::Found(asset) => assert_eq!(asset.status, AssetStatus::UnderRepair),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(stub.scan_calls.load(Ordering::SeqCst), 1);
}
