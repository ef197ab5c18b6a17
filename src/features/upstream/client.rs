use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::error::{AppError, UpstreamError};

/// 上游业务成功码
pub const SUCCESS_CODE: &str = "INFO-000";

/// 上游数据集（决定接口路径与响应包装键）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// 站点分线路分时段上下车人数
    StopBoarding,
    /// POI 实时人口
    PoiPopulation,
}

impl Dataset {
    /// 响应体中包裹 `RESULT`/`row` 的顶层键
    pub fn wrapper(self) -> &'static str {
        match self {
            Dataset::StopBoarding => "TaimsTpssStaRouteInfoH",
            Dataset::PoiPopulation => "citydata_ppltn",
        }
    }

    fn endpoint(self, cfg: &UpstreamConfig) -> &str {
        match self {
            Dataset::StopBoarding => &cfg.stop_boarding_endpoint,
            Dataset::PoiPopulation => &cfg.poi_population_endpoint,
        }
    }
}

/// 已校验的行集合及其缓存寿命
#[derive(Clone)]
struct CachedRows {
    rows: Arc<Vec<Value>>,
    ttl: Duration,
}

/// 每个条目按写入时携带的路由缓存周期过期
struct RouteLifetime;

impl Expiry<String, CachedRows> for RouteLifetime {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedRows,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// 开放数据 API 客户端：一次请求只发一次 GET，不重试。
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
    cache: Option<Cache<String, CachedRows>>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| AppError::Internal(format!("初始化 HTTP Client 失败: {e}")))?;

        let cache = config.cache_enabled.then(|| {
            Cache::builder()
                .max_capacity(256)
                .expire_after(RouteLifetime)
                .build()
        });

        Ok(Self {
            http,
            config: config.clone(),
            cache,
        })
    }

    /// 前置条件：必须配置 API Key，否则在发起任何网络请求前直接失败
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.config.api_key().ok_or(AppError::MissingApiKey)
    }

    /// `{base}/{key}{endpoint}/{start}/{size}/{YYYYMMDD}`
    pub fn build_url(&self, api_key: &str, dataset: Dataset, target_date: &str) -> String {
        format!(
            "{}/{}{}/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            api_key,
            dataset.endpoint(&self.config),
            self.config.page_start,
            self.config.page_size,
            compact_date(target_date)
        )
    }

    /// 拉取并校验上游行数据；`ttl` 为调用路由的缓存周期
    pub async fn fetch_rows(
        &self,
        api_key: &str,
        dataset: Dataset,
        target_date: &str,
        ttl: Duration,
    ) -> Result<Arc<Vec<Value>>, UpstreamError> {
        let url = self.build_url(api_key, dataset, target_date);
        let cache_key = format!("{}|{}", ttl.as_secs(), url);

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(&cache_key).await
        {
            tracing::debug!(dataset = ?dataset, "命中上游缓存");
            return Ok(hit.rows);
        }

        tracing::debug!("调用上游: {}", url.replacen(api_key, "***", 1));

        let resp = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Unavailable(status.as_u16()));
        }

        let body: Value = resp.json().await?;
        let rows = Arc::new(extract_rows(body, dataset.wrapper())?);

        if let Some(cache) = &self.cache {
            cache
                .insert(
                    cache_key,
                    CachedRows {
                        rows: rows.clone(),
                        ttl,
                    },
                )
                .await;
        }

        Ok(rows)
    }
}

/// `2025-08-01` -> `20250801`
pub fn compact_date(target_date: &str) -> String {
    target_date.replace('-', "")
}

fn result_of(obj: &Value) -> (String, String) {
    let result = obj.get("RESULT");
    let field = |name: &str| {
        result
            .and_then(|r| r.get(name))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    (field("CODE"), field("MESSAGE"))
}

/// 校验 `{wrapper}.RESULT.CODE` 并取出 `{wrapper}.row`。
///
/// 上游出错时常直接返回顶层 `RESULT`（没有包装键），同样视为业务错误；
/// 两者都缺失才算格式错误。
pub fn extract_rows(mut body: Value, wrapper: &str) -> Result<Vec<Value>, UpstreamError> {
    let Some(wrapped) = body.get_mut(wrapper) else {
        if body.get("RESULT").is_some() {
            let (code, message) = result_of(&body);
            return Err(UpstreamError::Api { code, message });
        }
        return Err(UpstreamError::Malformed(format!("缺少 {wrapper} 包装")));
    };

    let (code, message) = result_of(wrapped);
    if code != SUCCESS_CODE {
        return Err(UpstreamError::Api { code, message });
    }

    match wrapped.get_mut("row").map(Value::take) {
        Some(Value::Array(rows)) => Ok(rows),
        _ => Err(UpstreamError::Malformed(format!("{wrapper}.row 不是数组"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(cfg: UpstreamConfig) -> UpstreamClient {
        UpstreamClient::new(&cfg).expect("client")
    }

    #[test]
    fn url_follows_open_api_template() {
        let c = client(UpstreamConfig {
            base_url: "http://openapi.seoul.go.kr:8088/".into(),
            api_key: Some("KEY".into()),
            ..UpstreamConfig::default()
        });
        assert_eq!(
            c.build_url("KEY", Dataset::StopBoarding, "2025-08-01"),
            "http://openapi.seoul.go.kr:8088/KEY/json/TaimsTpssStaRouteInfoH/1/1000/20250801"
        );
        assert_eq!(
            c.build_url("KEY", Dataset::PoiPopulation, "2025-08-01"),
            "http://openapi.seoul.go.kr:8088/KEY/json/citydata_ppltn/1/1000/20250801"
        );
    }

    #[test]
    fn missing_key_is_a_precondition_failure() {
        let c = client(UpstreamConfig::default());
        assert!(matches!(c.require_api_key(), Err(AppError::MissingApiKey)));
    }

    #[test]
    fn extract_rows_accepts_success_code_only() {
        let ok = json!({
            "TaimsTpssStaRouteInfoH": {
                "list_total_count": 1,
                "RESULT": {"CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다"},
                "row": [{"staId": "1"}]
            }
        });
        assert_eq!(extract_rows(ok, "TaimsTpssStaRouteInfoH").unwrap().len(), 1);

        let err = json!({
            "TaimsTpssStaRouteInfoH": {
                "RESULT": {"CODE": "INFO-200", "MESSAGE": "해당하는 데이터가 없습니다."}
            }
        });
        assert_eq!(
            extract_rows(err, "TaimsTpssStaRouteInfoH"),
            Err(UpstreamError::Api {
                code: "INFO-200".into(),
                message: "해당하는 데이터가 없습니다.".into()
            })
        );
    }

    #[test]
    fn top_level_result_without_wrapper_is_api_error() {
        let body = json!({"RESULT": {"CODE": "ERROR-500", "MESSAGE": "서버 오류입니다."}});
        let err = extract_rows(body, "TaimsTpssStaRouteInfoH").unwrap_err();
        assert!(matches!(err, UpstreamError::Api { ref code, .. } if code == "ERROR-500"));
    }

    #[test]
    fn body_without_wrapper_or_result_is_malformed() {
        let err = extract_rows(json!({"foo": 1}), "citydata_ppltn").unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));

        let no_rows = json!({"citydata_ppltn": {"RESULT": {"CODE": "INFO-000"}}});
        assert!(matches!(
            extract_rows(no_rows, "citydata_ppltn"),
            Err(UpstreamError::Malformed(_))
        ));
    }
}
