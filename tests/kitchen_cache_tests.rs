//! 厨房缓存功能测试

use chrono::{NaiveDate, Utc};
use hq::domain::model::{FetchSource, FoodSupply, KitchenBundle};
use hq::infrastructure::cache::bundle::KitchenCache;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// 厨房页面使用的 5 分钟有效期
const TTL: Duration = Duration::from_secs(300);

fn sample_supply(id: &str, kitchen: &str, quantity: f64) -> FoodSupply {
    FoodSupply {
        id: id.to_string(),
        kitchen_id: kitchen.to_string(),
        name: format!("Supply {}", id),
        quantity,
        unit: "kg".to_string(),
        minimum_quantity: Some(5.0),
        expiry_date: None,
        unit_cost: Some(3.5),
    }
}

fn sample_bundle(kitchen: &str, quantity: f64) -> Arc<KitchenBundle> {
    Arc::new(KitchenBundle {
        kitchen_id: kitchen.to_string(),
        food_supplies: vec![sample_supply("s-1", kitchen, quantity)],
        recipes: Vec::new(),
        fetched_at: Utc::now(),
    })
}

#[tokio::test(start_paused = true)]
async fn test_switching_kitchens_and_returning() {
    let cache = KitchenCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    // 首次进入厨房 1 需要拉取
    let c = Arc::clone(&calls);
    let first = cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 10.0))
        })
        .await
        .unwrap();
    assert_eq!(first.source, FetchSource::Network);

    // 切到厨房 2 是另一个键,单独拉取
    let c = Arc::clone(&calls);
    cache
        .bundle("kitchen-2", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-2", 20.0))
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // 有效期内切回厨房 1 直接命中缓存
    tokio::time::advance(Duration::from_secs(1)).await;
    let c = Arc::clone(&calls);
    let back = cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 99.0))
        })
        .await
        .unwrap();
    assert_eq!(back.source, FetchSource::LocalCache);
    assert_eq!(back.value.food_supplies[0].quantity, 10.0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_bundle_expires_as_a_whole() {
    let cache = KitchenCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&calls);
    cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 10.0))
        })
        .await
        .unwrap();

    // 食材和菜谱共用一个时间戳,过期就整体重新拉取
    tokio::time::advance(Duration::from_secs(301)).await;
    let c = Arc::clone(&calls);
    let refreshed = cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 8.0))
        })
        .await
        .unwrap();
    assert_eq!(refreshed.source, FetchSource::Network);
    assert_eq!(refreshed.value.food_supplies[0].quantity, 8.0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_forced_refresh_overwrites_fresh_bundle() {
    let cache = KitchenCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&calls);
    cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 10.0))
        })
        .await
        .unwrap();

    // 手动刷新无视剩余有效期
    let c = Arc::clone(&calls);
    let forced = cache
        .bundle("kitchen-1", TTL, true, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 7.0))
        })
        .await
        .unwrap();
    assert_eq!(forced.source, FetchSource::Network);
    assert_eq!(forced.value.food_supplies[0].quantity, 7.0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refill_writes_through_cached_bundle() {
    let cache = KitchenCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&calls);
    cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 2.0))
        })
        .await
        .unwrap();

    // 补货成功后直接写穿缓存里的套餐
    let refilled = sample_supply("s-1", "kitchen-1", 25.0);
    cache.apply_refill("kitchen-1", &refilled);

    let c = Arc::clone(&calls);
    let cached = cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 0.0))
        })
        .await
        .unwrap();
    assert_eq!(cached.source, FetchSource::LocalCache);
    assert_eq!(cached.value.food_supplies[0].quantity, 25.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // 缓存里没见过的食材会被追加
    let extra = sample_supply("s-2", "kitchen-1", 12.0);
    cache.apply_refill("kitchen-1", &extra);
    let c = Arc::clone(&calls);
    let cached = cache
        .bundle("kitchen-1", TTL, false, move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(sample_bundle("kitchen-1", 0.0))
        })
        .await
        .unwrap();
    assert_eq!(cached.value.food_supplies.len(), 2);
}

#[test]
fn test_supply_stock_and_expiry_flags() {
    let mut supply = sample_supply("s-1", "kitchen-1", 4.0);
    // 低于阈值算低库存
    assert!(supply.is_low_stock());
    supply.quantity = 6.0;
    assert!(!supply.is_low_stock());

    let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
    supply.expiry_date = Some(NaiveDate::from_ymd_opt(2026, 8, 8).unwrap());
    assert!(supply.expires_within(3, today));
    supply.expiry_date = Some(NaiveDate::from_ymd_opt(2026, 8, 20).unwrap());
    assert!(!supply.expires_within(3, today));
    // 没有保质期的食材不算临期
    supply.expiry_date = None;
    assert!(!supply.expires_within(3, today));
}
