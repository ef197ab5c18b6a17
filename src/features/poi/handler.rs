use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};

use crate::error::AppError;
use crate::features::common::{DashboardQuery, ResponseEnvelope, clock, with_fallback};
use crate::features::upstream::{Dataset, PoiPopulationRow};
use crate::state::AppState;

use super::models::PoiPopulationData;
use super::service::{build_poi_population, mock_poi_population};

/// 上游结果缓存周期
pub const CACHE_TTL: Duration = Duration::from_secs(180);

#[utoipa::path(
    get,
    path = "/realtime/poi-population",
    summary = "POI 实时人口拥挤度",
    description = "取各 POI 当前时段的人口快照并汇总拥挤度分布。上游失败时返回五个固定 POI 的模拟数据（HTTP 200，`meta.data_source` 标记为 Mock）。",
    params(
        ("poi_codes" = Option<String>, Query, description = "逗号分隔的 POI 代码，缺省为全部"),
        ("target_date" = Option<String>, Query, description = "YYYY-MM-DD，默认今天")
    ),
    responses(
        (status = 200, description = "真实或模拟的 POI 人口数据", body = ResponseEnvelope<PoiPopulationData>),
        (status = 500, description = "未配置 API Key", body = crate::error::ErrorResponse)
    ),
    tag = "Realtime"
)]
pub async fn get_poi_population(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ResponseEnvelope<PoiPopulationData>>, AppError> {
    let api_key = state.upstream.require_api_key()?;
    let filter = query.resolve(state.timezone);
    let hour = clock::current_hour(state.timezone);

    let outcome = state
        .upstream
        .fetch_rows(api_key, Dataset::PoiPopulation, &filter.target_date, CACHE_TTL)
        .await
        .map(|rows| {
            build_poi_population(
                &PoiPopulationRow::from_rows(&rows),
                &filter,
                hour,
                clock::timestamp(),
            )
        });

    Ok(Json(with_fallback("poi-population", outcome, || {
        mock_poi_population(
            &mut rand::thread_rng(),
            filter.poi_codes.as_deref(),
            hour,
            &clock::today(state.timezone),
        )
    })))
}

pub fn create_poi_router() -> Router<AppState> {
    Router::new().route("/realtime/poi-population", get(get_poi_population))
}
