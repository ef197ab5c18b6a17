/// 站点坐标加载器（stop_id, lat, lng）
pub mod stop_coordinates;
/// 启动检查
pub mod checks;

pub use checks::run_startup_checks;
