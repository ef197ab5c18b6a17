//! 上游开放数据 API：URL 组装、单次拉取、RESULT.CODE 校验与行模型。

pub mod client;
pub mod models;

pub use client::{Dataset, UpstreamClient};
pub use models::{HOURS, PoiPopulationRow, UpstreamRecord, hour_label};
