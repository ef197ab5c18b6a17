use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用统一错误类型
///
/// 只有“前置条件”类错误会以非 200 返回给调用方；上游相关错误由 [`UpstreamError`]
/// 表达，并在各路由中被回退逻辑吸收。
#[derive(Error, Debug)]
pub enum AppError {
    /// 未配置上游 API Key
    #[error("Seoul Traffic API key is not configured")]
    MissingApiKey,

    /// 缺少必需的请求参数
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    /// 内部服务器错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 上游开放数据 API 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// 非 2xx 响应
    #[error("Seoul API returned {0}")]
    Unavailable(u16),

    /// 响应体不是预期结构
    #[error("上游响应格式错误: {0}")]
    Malformed(String),

    /// 上游业务错误（RESULT.CODE 不是成功码）
    #[error("Seoul API Error: {message} ({code})")]
    Api { code: String, message: String },

    /// 网络请求错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 超时
    #[error("上游请求超时")]
    Timeout,

    /// 上游数据中没有请求的实体
    #[error("{0} not found")]
    NotFound(String),
}

/// 错误响应体：`{ success: false, error: { code, message, details?, request_id? } }`
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// 稳定的错误码，用于程序化处理。
    #[schema(example = "MISSING_STOP_ID")]
    pub code: String,
    /// 人类可读的错误信息。
    pub message: String,
    /// 可选：修复提示。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// 可选：请求追踪 ID。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn stable_code(&self) -> String {
        match self {
            AppError::MissingApiKey => "MISSING_API_KEY".to_string(),
            AppError::MissingParameter(name) => format!("MISSING_{}", name.to_ascii_uppercase()),
            AppError::Internal(_) => "INTERNAL_ERROR".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::MissingApiKey => Some(
                "Please set SEOUL_TRAFFIC_API_KEY (or APP_UPSTREAM__API_KEY) in environment variables"
                    .to_string(),
            ),
            AppError::MissingParameter(name) => Some(format!("Please provide a valid {name}")),
            AppError::Internal(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("请求失败: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.stable_code(),
                message: self.to_string(),
                details: self.details(),
                request_id: crate::request_id::current_request_id(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if let Some(status) = err.status() {
            UpstreamError::Unavailable(status.as_u16())
        } else if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}
