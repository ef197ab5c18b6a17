use utoipa::openapi::server::{ServerBuilder, ServerVariableBuilder};
use utoipa::{Modify, OpenApi};

/// 为 Swagger UI 提供正确的“看板接口前缀”Servers 配置。
///
/// - 看板接口默认前缀为 `/api/v1/dashboard`（对应 `config.api.prefix` / `APP_API__PREFIX`）。
/// - `/health` 不带前缀，因此额外提供 `/` 作为备用 server 以便在 Swagger UI 中切换测试。
struct ApiServers;

impl Modify for ApiServers {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let api = ServerBuilder::new()
            .url("{api_prefix}")
            .description(Some("看板接口（默认 /api/v1/dashboard）"))
            .parameter(
                "api_prefix",
                ServerVariableBuilder::new()
                    .default_value("/api/v1/dashboard")
                    .description(Some(
                        "看板接口前缀：对应 config.api.prefix（可通过 APP_API__PREFIX 覆盖）",
                    )),
            )
            .build();

        let root = ServerBuilder::new()
            .url("/")
            .description(Some("根路径（用于 /health 等不带前缀接口）"))
            .build();

        openapi.servers = Some(vec![api, root]);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::health_check,
        crate::features::hourly::handler::get_hourly_patterns,
        crate::features::heatmap::handler::get_heatmap_data,
        crate::features::poi::handler::get_poi_population,
        crate::features::stop::handler::get_stop_detail,
        crate::features::prediction::handler::get_demand_forecast,
        crate::features::overview::handler::get_overview_stats,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        crate::features::common::Meta,
        crate::features::common::envelope::Features,
    )),
    modifiers(&ApiServers),
    tags(
        (name = "Analytics", description = "时段分析"),
        (name = "Realtime", description = "实时数据"),
        (name = "Prediction", description = "需求预测"),
        (name = "Overview", description = "看板概览"),
        (name = "Health", description = "健康检查"),
    ),
    info(
        title = "DRT Dashboard Backend API",
        version = "0.1.0",
        description = "需求响应式公交（DRT）可行性看板后端（Axum）"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn openapi_lists_dashboard_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/analytics/hourly-patterns",
            "/realtime/heatmap-data",
            "/realtime/poi-population",
            "/realtime/stop-detail",
            "/prediction/demand-forecast",
            "/overview/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
