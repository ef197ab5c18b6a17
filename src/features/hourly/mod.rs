pub mod aggregator;
pub mod formatter;
pub mod handler;
pub mod mock;
pub mod models;

pub use handler::create_hourly_router;
