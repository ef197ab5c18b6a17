use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
    routing::get,
};
use tower::ServiceExt;

use drt_backend::config::CorsConfig;
use drt_backend::cors::build_cors_layer;

const DASHBOARD_ORIGIN: &str = "http://localhost:5173";

fn dashboard_cors() -> CorsConfig {
    CorsConfig {
        enabled: true,
        allowed_origins: vec![DASHBOARD_ORIGIN.to_string()],
        allowed_headers: vec!["Content-Type".to_string(), "X-Request-Id".to_string()],
        max_age_secs: Some(600),
        ..CorsConfig::default()
    }
}

fn app(cors: &CorsConfig) -> Router {
    let layer = build_cors_layer(cors).expect("cors layer");
    Router::new()
        .route("/realtime/heatmap-data", get(|| async { "ok" }))
        .layer(layer)
}

async fn preflight(cors: &CorsConfig, origin: &str) -> Response<Body> {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/realtime/heatmap-data")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-request-id")
        .body(Body::empty())
        .expect("build request");
    app(cors).oneshot(req).await.expect("call app")
}

fn header_str<'a>(resp: &'a Response<Body>, name: header::HeaderName) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn empty_method_list_allows_get_only() {
    let resp = preflight(&dashboard_cors(), DASHBOARD_ORIGIN).await;

    assert_eq!(
        header_str(&resp, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(DASHBOARD_ORIGIN)
    );
    assert_eq!(
        header_str(&resp, header::ACCESS_CONTROL_ALLOW_METHODS),
        Some("GET")
    );
}

#[tokio::test]
async fn preflight_allows_request_id_header_and_is_cached() {
    let resp = preflight(&dashboard_cors(), DASHBOARD_ORIGIN).await;

    let allow_headers = header_str(&resp, header::ACCESS_CONTROL_ALLOW_HEADERS)
        .expect("missing allow headers")
        .to_ascii_lowercase();
    assert!(allow_headers.contains("x-request-id"), "{allow_headers}");
    assert_eq!(
        header_str(&resp, header::ACCESS_CONTROL_MAX_AGE),
        Some("600")
    );
}

#[tokio::test]
async fn unknown_origin_gets_no_allow_origin() {
    let req = Request::builder()
        .uri("/realtime/heatmap-data")
        .header(header::ORIGIN, "https://elsewhere.example")
        .body(Body::empty())
        .expect("build request");
    let resp = app(&dashboard_cors()).oneshot(req).await.expect("call app");

    assert!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
