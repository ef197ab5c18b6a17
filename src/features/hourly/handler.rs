use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};

use crate::error::{AppError, UpstreamError};
use crate::features::common::{DashboardQuery, QueryFilter, ResponseEnvelope, with_fallback};
use crate::features::upstream::{Dataset, UpstreamRecord};
use crate::state::AppState;

use super::aggregator::{average_positive, derive_insight, select, split};
use super::formatter::chart_data;
use super::mock::mock_hourly_pattern;
use super::models::{HourlyMetadata, HourlyPatternData};

/// 上游结果缓存周期
pub const CACHE_TTL: Duration = Duration::from_secs(300);

const DATA_SOURCE: &str = "Seoul Open API";

/// 选行 → 正值平均 → 0.55/0.45 切分 → 图表 + 洞察
pub fn build_hourly_pattern(records: &[UpstreamRecord], filter: &QueryFilter) -> HourlyPatternData {
    let selection = select(records, &filter.area_type, filter.area_id.as_deref());
    let series = split(&average_positive(&selection.records));

    HourlyPatternData {
        area_name: selection.area_name,
        chart_data: chart_data(&series),
        insights: derive_insight(&series),
        metadata: Some(HourlyMetadata {
            data_source: DATA_SOURCE.to_string(),
            target_date: filter.target_date.clone(),
            area_type: filter.area_type.clone(),
            area_id: filter.area_id.clone(),
            data_points: selection.records.len(),
            chart_type: filter.chart_type.clone(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/analytics/hourly-patterns",
    summary = "时段上下车模式",
    description = "按站点/行政区/全市采样聚合 24 小时上下车人数，并给出高峰与低谷时段。上游失败时返回模拟数据（HTTP 200，`meta.data_source` 标记为 Mock）。",
    params(
        ("area_type" = Option<String>, Query, description = "stop（默认）| district | 其他值表示全市采样"),
        ("area_id" = Option<String>, Query, description = "站点 ID 或区代码（如 gangnam）"),
        ("target_date" = Option<String>, Query, description = "YYYY-MM-DD，默认今天"),
        ("chart_type" = Option<String>, Query, description = "图表类型，默认 line，原样回显")
    ),
    responses(
        (status = 200, description = "真实或模拟的时段模式", body = ResponseEnvelope<HourlyPatternData>),
        (status = 500, description = "未配置 API Key", body = crate::error::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_hourly_patterns(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ResponseEnvelope<HourlyPatternData>>, AppError> {
    let api_key = state.upstream.require_api_key()?;
    let filter = query.resolve(state.timezone);

    let outcome: Result<HourlyPatternData, UpstreamError> = state
        .upstream
        .fetch_rows(api_key, Dataset::StopBoarding, &filter.target_date, CACHE_TTL)
        .await
        .map(|rows| build_hourly_pattern(&UpstreamRecord::from_rows(&rows), &filter));

    Ok(Json(with_fallback("hourly-patterns", outcome, || {
        mock_hourly_pattern(&mut rand::thread_rng(), filter.area_id.as_deref())
    })))
}

pub fn create_hourly_router() -> Router<AppState> {
    Router::new().route("/analytics/hourly-patterns", get(get_hourly_patterns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::common::DashboardQuery;
    use crate::features::upstream::HOURS;

    fn row(stop_id: &str, name: &str, h08: f64) -> UpstreamRecord {
        let mut hourly = [0.0; HOURS];
        hourly[8] = h08;
        hourly[3] = 1.0;
        UpstreamRecord {
            stop_id: stop_id.into(),
            stop_name: name.into(),
            route_id: "r".into(),
            route_name: "101".into(),
            route_type: "간선".into(),
            daily_total: h08 + 1.0,
            hourly,
        }
    }

    fn filter(area_type: &str, area_id: Option<&str>) -> QueryFilter {
        DashboardQuery {
            area_type: Some(area_type.into()),
            area_id: area_id.map(str::to_string),
            target_date: Some("2025-08-01".into()),
            ..Default::default()
        }
        .resolve(chrono_tz::Asia::Seoul)
    }

    #[test]
    fn build_reports_metadata_and_area_name() {
        let rows = vec![row("A", "시청앞", 100.0), row("B", "광화문", 40.0)];
        let data = build_hourly_pattern(&rows, &filter("stop", Some("A")));
        assert_eq!(data.area_name, "시청앞");
        assert_eq!(data.chart_data.datasets[0].data[8], 55);
        assert_eq!(data.chart_data.datasets[1].data[8], 45);
        let meta = data.metadata.expect("metadata");
        assert_eq!(meta.data_points, 1);
        assert_eq!(meta.area_id.as_deref(), Some("A"));
        assert_eq!(meta.chart_type, "line");
        assert_eq!(meta.target_date, "2025-08-01");
    }

    #[test]
    fn build_is_byte_identical_for_identical_input() {
        let rows = vec![row("A", "x", 77.0), row("B", "y", 31.0)];
        let f = filter("all", None);
        let a = serde_json::to_vec(&build_hourly_pattern(&rows, &f)).expect("serialize");
        let b = serde_json::to_vec(&build_hourly_pattern(&rows, &f)).expect("serialize");
        assert_eq!(a, b);
    }

    #[test]
    fn huge_upstream_value_does_not_overflow() {
        let rows = UpstreamRecord::from_rows(&[serde_json::json!({
            "staId": "A",
            "staNm": "시청앞",
            "a05Num08h": "1e20"
        })]);
        let data = build_hourly_pattern(&rows, &filter("stop", Some("A")));
        assert_eq!(data.chart_data.datasets[0].data[8], u64::MAX);
        assert_eq!(data.insights.daily_total.boarding, u64::MAX);
        assert_eq!(data.insights.peak_hours, vec!["08"]);
        assert!(data.insights.peak_vs_offpeak_ratio.is_finite());
    }
}
