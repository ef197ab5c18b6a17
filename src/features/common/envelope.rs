use serde::{Deserialize, Serialize};

use super::clock;
use crate::error::UpstreamError;

/// 回退响应的数据来源标记
pub const MOCK_DATA_SOURCE: &str = "Mock Data (API Error)";

/// 回退时附带的数据来源与错误说明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Meta {
    #[schema(example = "Mock Data (API Error)")]
    pub data_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Meta {
    pub fn mock(err: &UpstreamError) -> Self {
        Self {
            data_source: MOCK_DATA_SOURCE.to_string(),
            error_message: Some(err.to_string()),
        }
    }
}

/// 客户端能力提示（热力图使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Features {
    pub poi_data_available: bool,
    pub real_time_updates: bool,
    /// 建议的刷新周期（秒）
    pub cache_duration: u64,
}

/// 所有看板路由的统一响应包络；上游失败时同样以 200 返回
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    /// RFC 3339 时间戳
    pub timestamp: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
}

impl<T> ResponseEnvelope<T> {
    /// 真实数据响应
    pub fn real(data: T) -> Self {
        Self {
            success: true,
            timestamp: clock::timestamp(),
            data,
            meta: None,
            features: None,
        }
    }

    /// 回退响应：`success` 仍为 true，错误写入 `meta`
    pub fn fallback(data: T, err: &UpstreamError) -> Self {
        Self {
            meta: Some(Meta::mock(err)),
            ..Self::real(data)
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = Some(features);
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.meta
            .as_ref()
            .is_some_and(|m| m.data_source.contains("Mock"))
    }
}

/// 聚合-回退契约：成功则包装真实数据，任何上游失败都记录告警并改用 `mock` 生成的数据。
pub fn with_fallback<T>(
    label: &str,
    outcome: Result<T, UpstreamError>,
    mock: impl FnOnce() -> T,
) -> ResponseEnvelope<T> {
    match outcome {
        Ok(data) => ResponseEnvelope::real(data),
        Err(err) => {
            tracing::warn!(route = label, error = %err, "上游数据不可用，返回模拟数据");
            ResponseEnvelope::fallback(mock(), &err)
        }
    }
}
