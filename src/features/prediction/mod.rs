pub mod handler;
pub mod models;
pub mod service;

pub use handler::create_prediction_router;
