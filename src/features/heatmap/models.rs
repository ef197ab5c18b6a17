use serde::{Deserialize, Serialize};

/// 地图视窗边界
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// 首尔市域
pub const SEOUL_BOUNDS: Bounds = Bounds {
    north: 37.7,
    south: 37.4,
    east: 127.2,
    west: 126.7,
};

/// 图例（强度 ×100 后取整）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Legend {
    pub min_value: i64,
    pub max_value: i64,
    #[schema(example = "명/시간")]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HeatmapMetadata {
    pub total_points: usize,
    pub data_source: String,
    /// success | fallback
    pub api_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// 热力点 `[lat, lng, intensity]`，强度已归一化到 (0, 1]
pub type HeatmapPoint = [f64; 3];

/// `/realtime/heatmap-data` 的 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HeatmapData {
    #[schema(value_type = Vec<Vec<f64>>, example = json!([[37.5665, 126.978, 0.42]]))]
    pub heatmap_points: Vec<HeatmapPoint>,
    pub bounds: Bounds,
    pub legend: Legend,
    pub updated_at: String,
    pub metadata: HeatmapMetadata,
}
