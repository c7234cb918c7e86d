use crate::domain::error::HqError;
use crate::domain::model::Notices;
use crate::infrastructure::cache::request::Cached;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

pub const NOTICES_KEY: &str = "food-supply-notices";

/// Load the expiring-soon and low-stock notices, cache first.
///
/// Fetch failures surface as errors; there is deliberately no synthetic
/// fallback data here.
pub async fn load_notices(state: &AppState, force: bool) -> Result<Cached<Arc<Notices>>, HqError> {
    let ttl = if force {
        Duration::ZERO
    } else {
        state.config.read().await.cache.notice_ttl()
    };
    let api = Arc::clone(&state.api);

    state
        .notices
        .get_with(NOTICES_KEY, ttl, move || async move {
            let (expiring, low_stock) =
                tokio::try_join!(api.expiring_supplies(), api.low_stock_supplies())?;
            Ok(Arc::new(Notices {
                expiring,
                low_stock,
                fetched_at: Utc::now(),
            }))
        })
        .await
}
