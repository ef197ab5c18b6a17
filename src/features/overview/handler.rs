use axum::{Router, extract::State, response::Json, routing::get};

use crate::error::AppError;
use crate::features::common::{ResponseEnvelope, clock};
use crate::features::heatmap::handler::CACHE_TTL as CHECK_TTL;
use crate::features::upstream::Dataset;
use crate::state::AppState;

use super::models::{ApiStatus, OverviewStats};

// 看板首页的固定指标，等统计管线接入后替换
const TOTAL_ROUTES: u32 = 1660;
const TOTAL_STOPS: u32 = 100_415;
const CRITICAL_AREAS: u32 = 10;
const MODEL_ACCURACY: f64 = 92.1;
const DATA_COMPLETENESS: f64 = 99.1;

pub fn overview_stats(api_status: ApiStatus, last_updated: String) -> OverviewStats {
    OverviewStats {
        total_routes: TOTAL_ROUTES,
        total_stops: TOTAL_STOPS,
        critical_areas: CRITICAL_AREAS,
        model_accuracy: MODEL_ACCURACY,
        data_completeness: DATA_COMPLETENESS,
        api_status,
        last_updated,
    }
}

#[utoipa::path(
    get,
    path = "/overview/stats",
    summary = "看板概览",
    description = "固定的概览指标，外加一次上游探活：校验通过为 healthy，否则为 degraded。",
    responses(
        (status = 200, description = "概览指标", body = ResponseEnvelope<OverviewStats>),
        (status = 500, description = "未配置 API Key", body = crate::error::ErrorResponse)
    ),
    tag = "Overview"
)]
pub async fn get_overview_stats(
    State(state): State<AppState>,
) -> Result<Json<ResponseEnvelope<OverviewStats>>, AppError> {
    let api_key = state.upstream.require_api_key()?;
    let today = clock::today(state.timezone);

    let api_status = match state
        .upstream
        .fetch_rows(api_key, Dataset::StopBoarding, &today, CHECK_TTL)
        .await
    {
        Ok(_) => ApiStatus::Healthy,
        Err(e) => {
            tracing::warn!(route = "overview-stats", error = %e, "上游探活失败");
            ApiStatus::Degraded
        }
    };

    Ok(Json(ResponseEnvelope::real(overview_stats(
        api_status,
        clock::timestamp(),
    ))))
}

pub fn create_overview_router() -> Router<AppState> {
    Router::new().route("/overview/stats", get(get_overview_stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_serializes_lowercase() {
        let v = serde_json::to_value(overview_stats(ApiStatus::Degraded, "t".into()))
            .expect("serialize");
        assert_eq!(v["api_status"], "degraded");
        assert_eq!(v["total_stops"], 100415);
    }
}
