use crate::domain::error::HqError;
use crate::domain::model::{GeoPoint, Trip};
use crate::state::AppState;

// 行程接口不做缓存,里程由服务端计算

pub async fn start(state: &AppState, vehicle_id: &str) -> Result<Trip, HqError> {
    let vehicle_id = require_vehicle(vehicle_id)?;
    state.api.start_trip(vehicle_id).await
}

pub async fn end(state: &AppState, vehicle_id: &str) -> Result<Trip, HqError> {
    let vehicle_id = require_vehicle(vehicle_id)?;
    state.api.end_trip(vehicle_id).await
}

pub async fn active(state: &AppState, vehicle_id: &str) -> Result<Option<Trip>, HqError> {
    let vehicle_id = require_vehicle(vehicle_id)?;
    state.api.active_trip(vehicle_id).await
}

pub async fn set_endpoint(
    state: &AppState,
    vehicle_id: &str,
    lat: f64,
    lon: f64,
) -> Result<Trip, HqError> {
    let vehicle_id = require_vehicle(vehicle_id)?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(HqError::Input(format!("Latitude out of range: {}", lat)));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(HqError::Input(format!("Longitude out of range: {}", lon)));
    }
    state
        .api
        .set_trip_endpoint(vehicle_id, GeoPoint { lat, lon })
        .await
}

fn require_vehicle(vehicle_id: &str) -> Result<&str, HqError> {
    let vehicle_id = vehicle_id.trim();
    if vehicle_id.is_empty() {
        return Err(HqError::Input("Empty vehicle id".to_string()));
    }
    Ok(vehicle_id)
}
