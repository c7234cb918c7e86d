use crate::domain::error::HqError;
use crate::domain::model::{Asset, AssetStatus};
use crate::state::AppState;
use std::sync::Arc;

/// Resolve an asset by id or code, scan cache first.
pub async fn resolve_asset(state: &AppState, ident: &str) -> Result<Arc<Asset>, HqError> {
    let ident = ident.trim();
    if ident.is_empty() {
        return Err(HqError::Input("Empty asset id or code".to_string()));
    }

    if let Some(asset) = state.scan_cache.get(ident) {
        return Ok(asset);
    }

    match state.api.scan_asset(ident).await? {
        Some(asset) => {
            let asset = Arc::new(asset);
            state.scan_cache.insert(ident.to_string(), Arc::clone(&asset));
            Ok(asset)
        }
        None => Err(HqError::Api(format!("Asset not found: {}", ident))),
    }
}

pub async fn move_asset(
    state: &AppState,
    ident: &str,
    floor: Option<&str>,
    room: Option<&str>,
) -> Result<Arc<Asset>, HqError> {
    if floor.is_none() && room.is_none() {
        return Err(HqError::Input(
            "Nothing to move: provide --floor and/or --room".to_string(),
        ));
    }
    let asset = resolve_asset(state, ident).await?;
    let updated = state.api.move_asset(&asset.id, floor, room).await?;
    Ok(write_through(state, updated))
}

pub async fn set_status(
    state: &AppState,
    ident: &str,
    status: AssetStatus,
) -> Result<Arc<Asset>, HqError> {
    let asset = resolve_asset(state, ident).await?;
    let updated = state.api.update_asset_status(&asset.id, status).await?;
    Ok(write_through(state, updated))
}

pub async fn dispose(
    state: &AppState,
    ident: &str,
    reason: Option<&str>,
) -> Result<Arc<Asset>, HqError> {
    let asset = resolve_asset(state, ident).await?;
    let updated = state.api.dispose_asset(&asset.id, reason).await?;
    Ok(write_through(state, updated))
}

// 变更成功后写穿扫码缓存,避免紧随其后的重新查询
fn write_through(state: &AppState, updated: Asset) -> Arc<Asset> {
    let asset = Arc::new(updated);
    state.scan_cache.insert(asset.id.clone(), Arc::clone(&asset));
    if let Some(code) = &asset.code {
        state.scan_cache.insert(code.clone(), Arc::clone(&asset));
    }
    asset
}
