use crate::config::AppConfig;
use crate::error::AppError;

/// 执行启动检查
///
/// 1. 上游基地址必须是合法 URL
/// 2. 分页窗口不能为空
/// 3. 缺少 API Key 只告警：服务照常启动，上游路由返回 500 MISSING_API_KEY
pub fn run_startup_checks(config: &AppConfig) -> Result<(), AppError> {
    tracing::info!("🔍 开始执行启动检查...");

    let upstream = &config.upstream;
    reqwest::Url::parse(&upstream.base_url).map_err(|e| {
        AppError::Internal(format!("上游基地址无效 {:?}: {e}", upstream.base_url))
    })?;

    if upstream.page_size == 0 || upstream.page_start == 0 {
        return Err(AppError::Internal(format!(
            "上游分页窗口无效: start={} size={}",
            upstream.page_start, upstream.page_size
        )));
    }

    if upstream.api_key().is_none() {
        tracing::warn!("⚠️ 未配置上游 API Key（SEOUL_TRAFFIC_API_KEY / APP_UPSTREAM__API_KEY）");
    }

    tracing::info!("🕒 看板时区: {}", config.dashboard.tz());
    tracing::info!("✅ 启动检查完成");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes() {
        assert!(run_startup_checks(&AppConfig::default()).is_ok());
    }

    #[test]
    fn invalid_base_url_fails() {
        let mut cfg = AppConfig::default();
        cfg.upstream.base_url = "not a url".into();
        assert!(run_startup_checks(&cfg).is_err());
    }

    #[test]
    fn empty_page_window_fails() {
        let mut cfg = AppConfig::default();
        cfg.upstream.page_size = 0;
        assert!(run_startup_checks(&cfg).is_err());
    }
}
