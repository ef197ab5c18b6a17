use serde::{Deserialize, Serialize};

/// 乘客数在 [`super::aggregator`] 中切分后的 24 小时序列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlySeries {
    pub boarding: Vec<u64>,
    pub alighting: Vec<u64>,
}

/// 一条 Chart.js 数据集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChartDataset {
    #[schema(example = "승차인원")]
    pub label: String,
    pub data: Vec<u64>,
    #[schema(example = "#3b82f6")]
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
}

/// 图表数据：24 个小时标签 + 上下车两个数据集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DailyTotal {
    pub boarding: u64,
    pub alighting: u64,
}

/// 由小时序列推导的高峰/低谷洞察
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Insight {
    pub peak_hours: Vec<String>,
    pub off_peak_hours: Vec<String>,
    pub daily_total: DailyTotal,
    /// 高峰与低谷平均上车人数之比（保留一位小数）
    pub peak_vs_offpeak_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HourlyMetadata {
    pub data_source: String,
    pub target_date: String,
    pub area_type: String,
    pub area_id: Option<String>,
    /// 参与聚合的上游行数
    pub data_points: usize,
    pub chart_type: String,
}

/// `/analytics/hourly-patterns` 的 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HourlyPatternData {
    #[schema(example = "서울시 전체 평균")]
    pub area_name: String,
    pub chart_data: ChartData,
    pub insights: Insight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HourlyMetadata>,
}
