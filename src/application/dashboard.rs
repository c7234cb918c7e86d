use crate::domain::error::HqError;
use crate::domain::model::DashboardSnapshot;
use crate::infrastructure::cache::request::Cached;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

pub const DASHBOARD_KEY: &str = "dashboard";

/// Load the financial dashboard snapshot, cache first.
pub async fn load_dashboard(
    state: &AppState,
    force: bool,
) -> Result<Cached<Arc<DashboardSnapshot>>, HqError> {
    let ttl = if force {
        Duration::ZERO
    } else {
        state.config.read().await.cache.dashboard_ttl()
    };
    let api = Arc::clone(&state.api);

    state
        .dashboard
        .get_with(DASHBOARD_KEY, ttl, move || async move {
            let (stats, total_spent) =
                tokio::try_join!(api.dashboard_stats(), api.total_spent())?;
            Ok(Arc::new(DashboardSnapshot {
                stats,
                total_spent,
                fetched_at: Utc::now(),
            }))
        })
        .await
}
