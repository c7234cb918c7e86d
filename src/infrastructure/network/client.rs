use crate::domain::error::HqError;
use crate::domain::model::{
    Asset, AssetStatus, DashboardStats, Disposal, FoodSupply, GeoPoint, Recipe, Trip,
};
use crate::domain::traits::AssetLookup;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request payloads
// 变更请求都带一个客户端引用号,便于服务端去重
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MoveAssetRequest<'a> {
    floor: Option<&'a str>,
    room: Option<&'a str>,
    client_ref: Uuid,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AssetStatusPatch {
    status: AssetStatus,
    client_ref: Uuid,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DisposeAssetRequest<'a> {
    reason: Option<&'a str>,
    client_ref: Uuid,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RefillRequest<'a> {
    supply_id: &'a str,
    quantity: f64,
    expired_quantity: Option<f64>,
    client_ref: Uuid,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TripRequest<'a> {
    vehicle_id: &'a str,
    client_ref: Uuid,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TripEndpointRequest<'a> {
    vehicle_id: &'a str,
    lat: f64,
    lon: f64,
    client_ref: Uuid,
}

#[derive(Deserialize, Debug)]
struct TotalSpentResponse {
    total: f64,
}

/// Typed client for the HouQin backend REST API.
///
/// The backend is an opaque collaborator; this client only shapes
/// requests, maps failure statuses to readable messages, and decodes the
/// JSON payloads into domain models.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn expect_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HqError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(response.json::<T>().await?)
    }

    // --- assets ---

    /// Fast single-field lookup. A 404 is a clean miss, not a failure.
    pub async fn scan_asset(&self, code: &str) -> Result<Option<Asset>, HqError> {
        let response = self
            .request(Method::GET, "/api/assets/scan")
            .query(&[("q", code)])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let asset: Asset = Self::expect_json(response).await?;
        Ok(Some(asset))
    }

    pub async fn search_assets(&self, term: &str) -> Result<Vec<Asset>, HqError> {
        let response = self
            .request(Method::GET, "/api/assets")
            .query(&[("search", term)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn move_asset(
        &self,
        id: &str,
        floor: Option<&str>,
        room: Option<&str>,
    ) -> Result<Asset, HqError> {
        let response = self
            .request(Method::POST, &format!("/api/assets/{}/move", id))
            .json(&MoveAssetRequest {
                floor,
                room,
                client_ref: Uuid::new_v4(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn update_asset_status(
        &self,
        id: &str,
        status: AssetStatus,
    ) -> Result<Asset, HqError> {
        let response = self
            .request(Method::PATCH, &format!("/api/assets/{}", id))
            .json(&AssetStatusPatch {
                status,
                client_ref: Uuid::new_v4(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn dispose_asset(&self, id: &str, reason: Option<&str>) -> Result<Asset, HqError> {
        let response = self
            .request(Method::POST, &format!("/api/assets/{}/dispose", id))
            .json(&DisposeAssetRequest {
                reason,
                client_ref: Uuid::new_v4(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    // --- food supply ---

    pub async fn food_supplies(&self, kitchen_id: &str) -> Result<Vec<FoodSupply>, HqError> {
        let response = self
            .request(Method::GET, "/api/food-supply")
            .query(&[("kitchenId", kitchen_id)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn expiring_supplies(&self) -> Result<Vec<FoodSupply>, HqError> {
        let response = self
            .request(Method::GET, "/api/food-supply")
            .query(&[("expiringSoon", "true")])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn low_stock_supplies(&self) -> Result<Vec<FoodSupply>, HqError> {
        let response = self
            .request(Method::GET, "/api/food-supply")
            .query(&[("lowStock", "true")])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn disposals(
        &self,
        kitchen_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Disposal>, HqError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(kitchen_id) = kitchen_id {
            query.push(("kitchenId", kitchen_id.to_string()));
        }
        if let Some(from) = from {
            query.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = to {
            query.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        let response = self
            .request(Method::GET, "/api/food-supply/disposals")
            .query(&query)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    /// Record a restock; the backend disposes the expired remainder in the
    /// same operation and returns the updated supply.
    pub async fn refill_supply(
        &self,
        supply_id: &str,
        quantity: f64,
        expired_quantity: Option<f64>,
    ) -> Result<FoodSupply, HqError> {
        let response = self
            .request(Method::POST, "/api/food-supply/refill")
            .json(&RefillRequest {
                supply_id,
                quantity,
                expired_quantity,
                client_ref: Uuid::new_v4(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn recipes(&self, kitchen_id: &str) -> Result<Vec<Recipe>, HqError> {
        let response = self
            .request(Method::GET, "/api/recipes")
            .query(&[("kitchenId", kitchen_id)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    // --- dashboard ---

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, HqError> {
        let response = self
            .request(Method::GET, "/api/dashboard/stats")
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn total_spent(&self) -> Result<f64, HqError> {
        let response = self
            .request(Method::GET, "/api/dashboard/total-spent")
            .send()
            .await?;
        let body: TotalSpentResponse = Self::expect_json(response).await?;
        Ok(body.total)
    }

    // --- trips ---

    pub async fn start_trip(&self, vehicle_id: &str) -> Result<Trip, HqError> {
        let response = self
            .request(Method::POST, "/api/vehicles/start-trip")
            .json(&TripRequest {
                vehicle_id,
                client_ref: Uuid::new_v4(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn end_trip(&self, vehicle_id: &str) -> Result<Trip, HqError> {
        let response = self
            .request(Method::POST, "/api/vehicles/end-trip")
            .json(&TripRequest {
                vehicle_id,
                client_ref: Uuid::new_v4(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    /// Current trip for a vehicle; a 404 means no trip is active.
    pub async fn active_trip(&self, vehicle_id: &str) -> Result<Option<Trip>, HqError> {
        let response = self
            .request(Method::GET, "/api/vehicles/active-trip")
            .query(&[("vehicleId", vehicle_id)])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let trip: Trip = Self::expect_json(response).await?;
        Ok(Some(trip))
    }

    pub async fn set_trip_endpoint(
        &self,
        vehicle_id: &str,
        point: GeoPoint,
    ) -> Result<Trip, HqError> {
        let response = self
            .request(Method::POST, "/api/vehicles/set-trip-endpoint")
            .json(&TripEndpointRequest {
                vehicle_id,
                lat: point.lat,
                lon: point.lon,
                client_ref: Uuid::new_v4(),
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }
}

#[async_trait]
impl AssetLookup for ApiClient {
    async fn scan(&self, code: &str) -> Result<Option<Asset>, HqError> {
        self.scan_asset(code).await
    }

    async fn search(&self, code: &str) -> Result<Vec<Asset>, HqError> {
        self.search_assets(code).await
    }
}

fn api_error(status: StatusCode, body: &str) -> HqError {
    let hint = status_hint(status);
    let body = body.trim();
    if body.is_empty() {
        HqError::Api(format!("HTTP {}: {}", status.as_u16(), hint))
    } else {
        HqError::Api(format!("HTTP {}: {} ({})", status.as_u16(), hint, body))
    }
}

fn status_hint(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Malformed request",
        401 => "Not authenticated (check api token)",
        403 => "No permission for this tenant",
        404 => "Resource not found",
        409 => "Conflicting update, refetch and retry",
        410 => "Resource no longer available",
        422 => "Backend rejected the payload",
        429 => "Request frequency limited",
        500 => "Server-side exception",
        502 | 503 => "Backend temporarily unavailable",
        504 => "Backend timed out",
        _ => "Unknown error",
    }
}
