use crate::domain::error::HqError;
use crate::domain::model::{Disposal, FoodSupply, KitchenBundle};
use crate::infrastructure::cache::request::Cached;
use crate::state::AppState;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// Load one kitchen's bundle (supplies + recipes), cache first.
///
/// `force` is the explicit-refresh path: it bypasses the freshness check
/// for this kitchen and overwrites the bundle on success.
pub async fn load_kitchen(
    state: &AppState,
    kitchen_id: &str,
    force: bool,
) -> Result<Cached<Arc<KitchenBundle>>, HqError> {
    let kitchen_id = kitchen_id.trim();
    if kitchen_id.is_empty() {
        return Err(HqError::Input("Empty kitchen id".to_string()));
    }

    let ttl = { state.config.read().await.cache.kitchen_ttl() };
    let api = Arc::clone(&state.api);
    let owned_id = kitchen_id.to_string();

    state
        .kitchens
        .bundle(kitchen_id, ttl, force, move || async move {
            // 两个子资源一起拉取,共享同一个时间戳
            let (food_supplies, recipes) =
                tokio::try_join!(api.food_supplies(&owned_id), api.recipes(&owned_id))?;
            Ok(Arc::new(KitchenBundle {
                kitchen_id: owned_id,
                food_supplies,
                recipes,
                fetched_at: Utc::now(),
            }))
        })
        .await
}

/// Record a restock and write the updated supply through the cached bundle.
pub async fn refill_supply(
    state: &AppState,
    kitchen_id: &str,
    supply_id: &str,
    quantity: f64,
    expired_quantity: Option<f64>,
) -> Result<FoodSupply, HqError> {
    if quantity <= 0.0 {
        return Err(HqError::Input("Refill quantity must be positive".to_string()));
    }
    if expired_quantity.is_some_and(|q| q < 0.0) {
        return Err(HqError::Input(
            "Expired quantity cannot be negative".to_string(),
        ));
    }

    let updated = state
        .api
        .refill_supply(supply_id, quantity, expired_quantity)
        .await?;
    state.kitchens.apply_refill(kitchen_id, &updated);
    Ok(updated)
}

/// Disposal history, optionally filtered by kitchen and date range.
pub async fn waste_history(
    state: &AppState,
    kitchen_id: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Disposal>, HqError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(HqError::Input(format!(
                "Start date {} is after end date {}",
                from, to
            )));
        }
    }
    state.api.disposals(kitchen_id, from, to).await
}
