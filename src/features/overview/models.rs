use serde::{Deserialize, Serialize};

/// 上游探活结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Healthy,
    Degraded,
}

/// `/overview/stats` 的 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OverviewStats {
    pub total_routes: u32,
    pub total_stops: u32,
    /// 需要重点关注的区域数
    pub critical_areas: u32,
    pub model_accuracy: f64,
    pub data_completeness: f64,
    pub api_status: ApiStatus,
    pub last_updated: String,
}
