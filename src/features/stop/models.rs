use serde::{Deserialize, Serialize};

use crate::startup::stop_coordinates::Coordinate;

/// 单个小时的上下车与拥挤度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HourlyBucket {
    #[schema(example = "08")]
    pub hour: String,
    pub boarding: u64,
    pub alighting: u64,
    /// 0..=100
    pub congestion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StopInfo {
    pub stop_id: String,
    pub stop_name: String,
    #[schema(example = "강남구")]
    pub district: String,
    pub coordinates: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurrentStatus {
    pub boarding_total: u64,
    pub alighting_total: u64,
    /// 양호 | 보통 | 혼잡 | 매우혼잡
    pub congestion_level: String,
    pub congestion_score: u32,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NearbyInfo {
    /// 经停该站的线路（去重，保持上游顺序）
    pub routes: Vec<String>,
    pub poi_nearby: Vec<String>,
    /// 到最近地铁站的步行距离（米）
    pub walking_distance_to_subway: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StopMetadata {
    pub data_source: String,
    pub target_date: String,
    pub daily_total: f64,
    pub route_type: String,
}

/// `/realtime/stop-detail` 的 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StopDetailData {
    pub stop_info: StopInfo,
    pub current_status: CurrentStatus,
    pub hourly_data: Vec<HourlyBucket>,
    pub nearby_info: NearbyInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StopMetadata>,
}
