use std::sync::Arc;

use chrono_tz::Tz;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::features::upstream::UpstreamClient;
use crate::startup::stop_coordinates::StopCoordinates;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub stop_coordinates: Arc<StopCoordinates>,
    /// 计算“今天”“当前小时”的时区
    pub timezone: Tz,
}

impl AppState {
    /// 按配置构建状态：上游客户端 + 站点坐标表（未配置 CSV 时为空表）
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let upstream = UpstreamClient::new(&config.upstream)?;

        let stop_coordinates = match config.dashboard.stop_coordinates_csv.as_deref() {
            Some(path) if !path.trim().is_empty() => {
                crate::startup::stop_coordinates::load_stop_coordinates(std::path::Path::new(path))?
            }
            _ => {
                tracing::info!("未配置站点坐标 CSV，热力点统一落在市厅坐标");
                StopCoordinates::default()
            }
        };

        Ok(Self {
            upstream: Arc::new(upstream),
            stop_coordinates: Arc::new(stop_coordinates),
            timezone: config.dashboard.tz(),
        })
    }
}
