use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

/// 前置条件错误统一为 `{ success: false, error: { code, message, details } }`。
#[tokio::test]
async fn missing_api_key_is_500_with_stable_code() {
    let resp = drt_backend::AppError::MissingApiKey.into_response();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("missing Content-Type")
        .to_str()
        .expect("invalid Content-Type");
    assert_eq!(content_type, "application/json");

    let v = body_json(resp).await;
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], "MISSING_API_KEY");
    assert_eq!(
        v["error"]["message"],
        "Seoul Traffic API key is not configured"
    );
    assert!(v["error"]["details"].is_string());
    // 不在请求上下文中时不输出 request_id
    assert!(v["error"].get("request_id").is_none());
}

#[tokio::test]
async fn missing_stop_id_is_400() {
    let resp = drt_backend::AppError::MissingParameter("stop_id").into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "MISSING_STOP_ID");
    assert_eq!(v["error"]["message"], "stop_id parameter is required");
}

/// 上游错误只进入回退 `meta.error_message`，其文本即为对外契约。
#[test]
fn upstream_error_messages_are_stable() {
    use drt_backend::UpstreamError;

    assert_eq!(
        UpstreamError::Unavailable(500).to_string(),
        "Seoul API returned 500"
    );
    assert_eq!(
        UpstreamError::Api {
            code: "INFO-200".into(),
            message: "해당하는 데이터가 없습니다.".into(),
        }
        .to_string(),
        "Seoul API Error: 해당하는 데이터가 없습니다. (INFO-200)"
    );
    assert_eq!(
        UpstreamError::NotFound("Stop".into()).to_string(),
        "Stop not found"
    );
}
