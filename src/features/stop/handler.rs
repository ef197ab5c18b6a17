use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};

use crate::error::AppError;
use crate::features::common::{DashboardQuery, ResponseEnvelope, clock, with_fallback};
use crate::features::upstream::{Dataset, UpstreamRecord};
use crate::state::AppState;

use super::models::StopDetailData;
use super::service::{build_stop_detail, mock_stop_detail};

/// 上游结果缓存周期
pub const CACHE_TTL: Duration = Duration::from_secs(60);

#[utoipa::path(
    get,
    path = "/realtime/stop-detail",
    summary = "站点详情",
    description = "单站 24 小时上下车（0.6/0.4 切分）、当前拥挤度与经停线路。缺少 `stop_id` 返回 400（先于 API Key 检查）；上游失败或站点不存在时返回模拟数据（HTTP 200）。",
    params(
        ("stop_id" = String, Query, description = "站点 ID（必填）"),
        ("target_date" = Option<String>, Query, description = "YYYY-MM-DD，默认今天"),
        ("include_hourly" = Option<String>, Query, description = "仅字面量 false 关闭小时明细")
    ),
    responses(
        (status = 200, description = "真实或模拟的站点详情", body = ResponseEnvelope<StopDetailData>),
        (status = 400, description = "缺少 stop_id", body = crate::error::ErrorResponse),
        (status = 500, description = "未配置 API Key", body = crate::error::ErrorResponse)
    ),
    tag = "Realtime"
)]
pub async fn get_stop_detail(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ResponseEnvelope<StopDetailData>>, AppError> {
    let filter = query.resolve(state.timezone);
    let stop_id = filter
        .stop_id
        .clone()
        .ok_or(AppError::MissingParameter("stop_id"))?;
    let api_key = state.upstream.require_api_key()?;
    let hour = clock::current_hour(state.timezone);

    let fetched = state
        .upstream
        .fetch_rows(api_key, Dataset::StopBoarding, &filter.target_date, CACHE_TTL)
        .await;

    let now = clock::timestamp();
    let mut rng = rand::thread_rng();
    let outcome = fetched.and_then(|rows| {
        build_stop_detail(
            &mut rng,
            &UpstreamRecord::from_rows(&rows),
            &stop_id,
            &filter,
            hour,
            &state.stop_coordinates,
            &now,
        )
    });

    Ok(Json(with_fallback("stop-detail", outcome, || {
        mock_stop_detail(&mut rng, &stop_id, filter.include_hourly, hour, &now)
    })))
}

pub fn create_stop_router() -> Router<AppState> {
    Router::new().route("/realtime/stop-detail", get(get_stop_detail))
}
