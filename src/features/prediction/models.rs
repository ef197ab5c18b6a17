use serde::{Deserialize, Serialize};

/// 单区域的需求与建议车辆数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AreaForecast {
    #[schema(example = "gangnam")]
    pub area: String,
    pub demand: u64,
    pub recommended_vehicles: u64,
}

/// 未来某小时的需求预测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HourlyForecast {
    /// 距现在的小时数（1 起）
    pub hour_offset: u32,
    pub timestamp: String,
    pub predicted_demand: u64,
    /// `[下界, 上界]`
    #[schema(value_type = Vec<i64>)]
    pub confidence_interval: [i64; 2],
    pub area_breakdown: Vec<AreaForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelPerformance {
    #[schema(example = "MST-GCN")]
    pub model_name: String,
    pub accuracy: f64,
    pub data_quality: f64,
    pub last_training: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Recommendation {
    pub area: String,
    #[schema(example = "DRT도입")]
    pub action: String,
    /// 预期改善（%）
    pub expected_improvement: f64,
    pub roi: f64,
}

/// `/prediction/demand-forecast` 的 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DemandForecastData {
    pub time_horizon: u32,
    pub target_area: String,
    pub model_type: String,
    pub forecasts: Vec<HourlyForecast>,
    pub model_performance: ModelPerformance,
    pub recommendations: Vec<Recommendation>,
}
