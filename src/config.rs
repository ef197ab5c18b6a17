use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 兼容旧部署脚本的上游环境变量（键：环境变量名，值：配置路径）
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SEOUL_TRAFFIC_API_KEY", "upstream.api_key"),
    ("SEOUL_API_BASE_URL", "upstream.base_url"),
    ("SEOUL_STOP_BOARDING_API", "upstream.stop_boarding_endpoint"),
    ("SEOUL_POI_POPULATION_API", "upstream.poi_population_endpoint"),
];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        3000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 默认日志过滤规则（RUST_LOG 优先）
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "drt_backend=info,tower_http=info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀
    #[serde(default = "ApiConfig::default_prefix")]
    pub prefix: String,
}

impl ApiConfig {
    fn default_prefix() -> String {
        "/api/v1/dashboard".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default)]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// 允许的方法列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    /// 允许的请求头列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    /// 预检缓存时间（秒）
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

/// 上游开放数据 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 开放数据 API 基地址（不含末尾斜杠）
    #[serde(default = "UpstreamConfig::default_base_url")]
    pub base_url: String,
    /// 认证 Key；为空视为未配置
    #[serde(default)]
    pub api_key: Option<String>,
    /// 站点分线路分时段上下车人数接口路径，形如 `/json/TaimsTpssStaRouteInfoH`
    #[serde(default = "UpstreamConfig::default_stop_boarding_endpoint")]
    pub stop_boarding_endpoint: String,
    /// POI 实时人口接口路径
    #[serde(default = "UpstreamConfig::default_poi_population_endpoint")]
    pub poi_population_endpoint: String,
    /// 分页起始行（1 起）
    #[serde(default = "UpstreamConfig::default_page_start")]
    pub page_start: u32,
    /// 单次拉取行数
    #[serde(default = "UpstreamConfig::default_page_size")]
    pub page_size: u32,
    /// 请求超时（秒）
    #[serde(default = "UpstreamConfig::default_timeout")]
    pub timeout_secs: u64,
    /// 是否按路由缓存周期缓存上游结果
    #[serde(default = "UpstreamConfig::default_cache_enabled")]
    pub cache_enabled: bool,
}

impl UpstreamConfig {
    fn default_base_url() -> String {
        "http://openapi.seoul.go.kr:8088".to_string()
    }
    fn default_stop_boarding_endpoint() -> String {
        "/json/TaimsTpssStaRouteInfoH".to_string()
    }
    fn default_poi_population_endpoint() -> String {
        "/json/citydata_ppltn".to_string()
    }
    fn default_page_start() -> u32 {
        1
    }
    fn default_page_size() -> u32 {
        1000
    }
    fn default_timeout() -> u64 {
        30
    }
    fn default_cache_enabled() -> bool {
        true
    }

    /// 有效的 API Key（去除空白后为空则视为缺失）
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
            stop_boarding_endpoint: Self::default_stop_boarding_endpoint(),
            poi_population_endpoint: Self::default_poi_population_endpoint(),
            page_start: Self::default_page_start(),
            page_size: Self::default_page_size(),
            timeout_secs: Self::default_timeout(),
            cache_enabled: Self::default_cache_enabled(),
        }
    }
}

/// 看板展示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 计算“今天”“当前小时”所用的时区（IANA 名称）
    #[serde(default = "DashboardConfig::default_timezone")]
    pub timezone: String,
    /// 站点坐标 CSV（列：stop_id, lat, lng），缺省则全部落在市厅坐标
    #[serde(default)]
    pub stop_coordinates_csv: Option<String>,
}

impl DashboardConfig {
    fn default_timezone() -> String {
        "Asia/Seoul".to_string()
    }

    /// 解析时区，非法名称回退到 Asia/Seoul
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("无效的时区配置 {:?}，回退到 Asia/Seoul", self.timezone);
            chrono_tz::Asia::Seoul
        })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone: Self::default_timezone(),
            stop_coordinates_csv: None,
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 优雅退出超时时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        30
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// CORS 配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// 上游开放数据 API 配置
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// 看板展示配置
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    ///
    /// 配置文件可选；环境变量形如 `APP_UPSTREAM__API_KEY`（双下划线分隔层级）。
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();

        tracing::info!("正在从 {:?} 加载配置文件", config_path);

        let mut builder = ConfigBuilder::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config: Self = builder.build()?.try_deserialize()?;

        tracing::debug!(
            "配置加载完成: upstream.base_url = {}, api_key 已配置 = {}",
            config.upstream.base_url,
            config.upstream.api_key().is_some()
        );

        Ok(config)
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 配置文件路径（`APP_CONFIG_FILE` 可覆盖）
    fn get_config_path() -> PathBuf {
        std::env::var_os("APP_CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = UpstreamConfig::default();
        assert!(cfg.api_key().is_none());
        cfg.api_key = Some("   ".to_string());
        assert!(cfg.api_key().is_none());
        cfg.api_key = Some(" abc ".to_string());
        assert_eq!(cfg.api_key(), Some("abc"));
    }

    #[test]
    fn invalid_timezone_falls_back_to_seoul() {
        let cfg = DashboardConfig {
            timezone: "Mars/Olympus".to_string(),
            stop_coordinates_csv: None,
        };
        assert_eq!(cfg.tz(), chrono_tz::Asia::Seoul);
    }

    #[test]
    fn defaults_point_at_seoul_open_api() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api.prefix, "/api/v1/dashboard");
        assert_eq!(cfg.upstream.page_start, 1);
        assert_eq!(cfg.upstream.page_size, 1000);
        assert_eq!(cfg.server_addr(), "0.0.0.0:3000");
    }
}
