use crate::domain::error::HqError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// 资产记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub code: Option<String>, // 条码/二维码
    pub category: Option<String>,
    pub status: AssetStatus,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub purchase_cost: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

// 资产状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    InUse,
    InStorage,
    UnderRepair,
    Disposed,
}

impl AssetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AssetStatus::InUse => "in_use",
            AssetStatus::InStorage => "in_storage",
            AssetStatus::UnderRepair => "under_repair",
            AssetStatus::Disposed => "disposed",
        }
    }
}

impl std::str::FromStr for AssetStatus {
    type Err = HqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in_use" | "in-use" => Ok(AssetStatus::InUse),
            "in_storage" | "in-storage" => Ok(AssetStatus::InStorage),
            "under_repair" | "under-repair" => Ok(AssetStatus::UnderRepair),
            "disposed" => Ok(AssetStatus::Disposed),
            other => Err(HqError::Input(format!(
                "Unknown asset status: {} (expected in_use/in_storage/under_repair/disposed)",
                other
            ))),
        }
    }
}

// 厨房食材
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodSupply {
    pub id: String,
    pub kitchen_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub minimum_quantity: Option<f64>, // 低库存阈值
    pub expiry_date: Option<NaiveDate>,
    pub unit_cost: Option<f64>,
}

impl FoodSupply {
    pub fn is_low_stock(&self) -> bool {
        match self.minimum_quantity {
            Some(min) => self.quantity <= min,
            None => false,
        }
    }

    /// Whether the supply expires within `days` of `today` (already-expired counts)
    pub fn expires_within(&self, days: i64, today: NaiveDate) -> bool {
        match self.expiry_date {
            Some(expiry) => (expiry - today).num_days() <= days,
            None => false,
        }
    }
}

// 菜谱
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub kitchen_id: String,
    pub name: String,
    pub servings: Option<u32>,
    pub cost_per_serving: Option<f64>,
}

/// One kitchen's cached resources, fetched together and expiring together
/// on the single `fetched_at` stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenBundle {
    pub kitchen_id: String,
    pub food_supplies: Vec<FoodSupply>,
    pub recipes: Vec<Recipe>,
    pub fetched_at: DateTime<Utc>,
}

// 废弃/报损记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Disposal {
    pub id: String,
    pub kitchen_id: String,
    pub supply_name: String,
    pub quantity: f64,
    pub unit: String,
    pub reason: Option<String>,
    pub cost: Option<f64>,
    pub disposed_at: DateTime<Utc>,
}

// 仪表盘汇总指标
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub asset_count: u64,
    pub assets_under_repair: u64,
    pub kitchen_count: u64,
    pub active_trips: u64,
    pub low_stock_count: u64,
    pub expiring_soon_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub total_spent: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Expiring-soon and low-stock supplies, fetched together for the notices view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notices {
    pub expiring: Vec<FoodSupply>,
    pub low_stock: Vec<FoodSupply>,
    pub fetched_at: DateTime<Utc>,
}

// 车辆行程
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub vehicle_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub end_point: Option<GeoPoint>,
    pub distance_km: Option<f64>, // 距离由服务端计算
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

// 数据来源枚举
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchSource {
    /// 命中本地缓存
    LocalCache,
    /// 合并进了一个进行中的请求
    InFlight,
    /// 在线请求
    Network,
}
