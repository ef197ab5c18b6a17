//! 各看板路由共用的流水线部件：参数解析、时钟、响应包络与回退。

pub mod clock;
pub mod envelope;
pub mod params;

pub use envelope::{Meta, ResponseEnvelope, with_fallback};
pub use params::{DashboardQuery, QueryFilter};
