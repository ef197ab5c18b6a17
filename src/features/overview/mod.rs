pub mod handler;
pub mod models;

pub use handler::create_overview_router;
