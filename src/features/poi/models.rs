use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AgeDistribution {
    pub teens: f64,
    pub twenties: f64,
    pub thirties: f64,
    pub forties: f64,
    pub fifties: f64,
    pub sixties_above: f64,
}

/// 人口结构（百分比）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Demographics {
    pub male_ratio: f64,
    pub female_ratio: f64,
    pub age_distribution: AgeDistribution,
}

/// 单个 POI 当前时段的拥挤度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PoiCongestion {
    #[schema(example = "POI001")]
    pub poi_code: String,
    #[schema(example = "강남역 일대")]
    pub poi_name: String,
    pub current_population: u64,
    #[schema(example = "붐빔")]
    pub congestion_level: String,
    pub congestion_message: String,
    /// 0..=100
    pub congestion_score: u32,
    pub demographics: Demographics,
    /// 上游基准日期
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CongestionDistribution {
    /// score ≤ 30
    pub relaxed: usize,
    /// 30 < score ≤ 60
    pub normal: usize,
    /// 60 < score ≤ 80
    pub crowded: usize,
    /// score > 80
    pub very_crowded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PoiSummary {
    pub total_pois: usize,
    pub total_population: u64,
    pub avg_congestion_score: u32,
    pub congestion_distribution: CongestionDistribution,
    /// 拥挤度 ≥ 70 的前 5 个区域
    pub peak_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PoiMetadata {
    pub data_source: String,
    pub target_date: String,
    pub data_timestamp: String,
    #[schema(example = "3 minutes")]
    pub cache_duration: String,
}

/// `/realtime/poi-population` 的 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PoiPopulationData {
    pub poi_data: Vec<PoiCongestion>,
    pub summary: PoiSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PoiMetadata>,
}
