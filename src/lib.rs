/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// CORS 中间件构建
pub mod cors;

/// request_id 中间件
pub mod request_id;

/// 启动检查与启动数据加载
pub mod startup;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// 优雅退出管理模块
pub mod shutdown;

/// 周期轮询句柄
pub mod poller;

/// OpenAPI 文档
pub mod openapi;

// 导出常用类型供外部使用
pub use config::AppConfig;
pub use error::{AppError, UpstreamError};
pub use poller::Poller;
pub use shutdown::{ShutdownManager, ShutdownReason};
