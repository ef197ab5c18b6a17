use axum::{
    Router,
    extract::Query,
    response::Json,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;

use crate::features::common::{Meta, ResponseEnvelope};
use crate::state::AppState;

use super::models::DemandForecastData;
use super::service::{forecast, parse_horizon};

/// 预测路由的数据来源标记
pub const PLACEHOLDER_SOURCE: &str = "Placeholder (model not deployed)";

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub time_horizon: Option<String>,
    pub target_area: Option<String>,
    pub model_type: Option<String>,
}

#[utoipa::path(
    get,
    path = "/prediction/demand-forecast",
    summary = "DRT 需求预测（占位）",
    description = "模型尚未部署，返回按日周期生成的占位预测、固定的模型指标与区域建议。不访问上游。",
    params(
        ("time_horizon" = Option<String>, Query, description = "预测小时数，默认 24，范围 1..=168"),
        ("target_area" = Option<String>, Query, description = "all（默认）| gangnam | mapo | songpa"),
        ("model_type" = Option<String>, Query, description = "模型标识，默认 mst-gcn，原样回显")
    ),
    responses(
        (status = 200, description = "占位预测", body = ResponseEnvelope<DemandForecastData>)
    ),
    tag = "Prediction"
)]
pub async fn get_demand_forecast(
    Query(query): Query<ForecastQuery>,
) -> Json<ResponseEnvelope<DemandForecastData>> {
    let horizon = parse_horizon(query.time_horizon.as_deref());
    let target_area = query
        .target_area
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "all".to_string());
    let model_type = query
        .model_type
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "mst-gcn".to_string());

    let data = forecast(
        &mut rand::thread_rng(),
        horizon,
        &target_area,
        &model_type,
        Utc::now(),
    );

    Json(ResponseEnvelope::real(data).with_meta(Meta {
        data_source: PLACEHOLDER_SOURCE.to_string(),
        error_message: None,
    }))
}

pub fn create_prediction_router() -> Router<AppState> {
    Router::new().route("/prediction/demand-forecast", get(get_demand_forecast))
}
