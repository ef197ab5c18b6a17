//! 看板功能模块。每个路由都遵循同一条流水线：
//! 参数解析 → 上游拉取 → 结果校验 → 聚合 → 展示格式化，任何一步失败都改走模拟数据。

/// 共用流水线部件
pub mod common;
/// 上游开放数据 API
pub mod upstream;

/// 时段上下车模式
pub mod hourly;
/// 实时热力图
pub mod heatmap;
/// POI 实时人口
pub mod poi;
/// 站点详情
pub mod stop;
/// 需求预测（占位）
pub mod prediction;
/// 看板概览
pub mod overview;
/// 健康检查
pub mod health;

use axum::Router;

use crate::state::AppState;

/// 合并所有看板路由（不含前缀，由调用方 nest 到 `config.api.prefix`）
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .merge(hourly::create_hourly_router())
        .merge(heatmap::create_heatmap_router())
        .merge(poi::create_poi_router())
        .merge(stop::create_stop_router())
        .merge(prediction::create_prediction_router())
        .merge(overview::create_overview_router())
}
