use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};

use crate::error::AppError;
use crate::features::common::envelope::Features;
use crate::features::common::{DashboardQuery, ResponseEnvelope, clock};
use crate::features::upstream::{Dataset, UpstreamRecord};
use crate::state::AppState;

use super::models::HeatmapData;
use super::service::{build_heatmap, mock_heatmap};

/// 上游结果缓存周期，也是建议的前端刷新周期
pub const CACHE_TTL: Duration = Duration::from_secs(30);

fn features() -> Features {
    Features {
        poi_data_available: false,
        real_time_updates: true,
        cache_duration: CACHE_TTL.as_secs(),
    }
}

#[utoipa::path(
    get,
    path = "/realtime/heatmap-data",
    summary = "实时交通热力图",
    description = "按站点上下车量生成热力点（强度按 100 人归一化）。上游失败时在几个热点附近随机撒点（HTTP 200，`meta.data_source` 标记为 Mock）。",
    params(
        ("target_date" = Option<String>, Query, description = "YYYY-MM-DD，默认今天"),
        ("time_range" = Option<String>, Query, description = "1h（默认，取当前小时）| 其他值取日合计"),
        ("intensity_type" = Option<String>, Query, description = "强度类型，默认 total，原样回显"),
        ("include_poi" = Option<String>, Query, description = "仅字面量 true 开启；POI 叠加暂未提供")
    ),
    responses(
        (status = 200, description = "真实或模拟的热力数据", body = ResponseEnvelope<HeatmapData>),
        (status = 500, description = "未配置 API Key", body = crate::error::ErrorResponse)
    ),
    tag = "Realtime"
)]
pub async fn get_heatmap_data(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ResponseEnvelope<HeatmapData>>, AppError> {
    let api_key = state.upstream.require_api_key()?;
    let filter = query.resolve(state.timezone);

    let fetched = state
        .upstream
        .fetch_rows(api_key, Dataset::StopBoarding, &filter.target_date, CACHE_TTL)
        .await;

    let envelope = match fetched {
        Ok(rows) => {
            if filter.include_poi {
                tracing::debug!("请求了 POI 叠加，当前仅返回站点热力点");
            }
            let data = build_heatmap(
                &UpstreamRecord::from_rows(&rows),
                &filter,
                clock::current_hour(state.timezone),
                &state.stop_coordinates,
                clock::timestamp(),
            );
            ResponseEnvelope::real(data).with_features(features())
        }
        Err(err) => {
            tracing::warn!(route = "heatmap-data", error = %err, "上游数据不可用，返回模拟数据");
            let data = mock_heatmap(&mut rand::thread_rng(), &err, clock::timestamp());
            ResponseEnvelope::fallback(data, &err)
        }
    };

    Ok(Json(envelope))
}

pub fn create_heatmap_router() -> Router<AppState> {
    Router::new().route("/realtime/heatmap-data", get(get_heatmap_data))
}
