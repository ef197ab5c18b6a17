use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// WGS84 坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Coordinate {
    #[schema(example = 37.5665)]
    pub lat: f64,
    #[schema(example = 126.978)]
    pub lng: f64,
}

/// 首尔市厅，缺少坐标时的默认落点
pub const CITY_HALL: Coordinate = Coordinate {
    lat: 37.5665,
    lng: 126.9780,
};

/// 站点 ID -> 坐标
#[derive(Debug, Clone, Default)]
pub struct StopCoordinates {
    by_stop: HashMap<String, Coordinate>,
}

impl StopCoordinates {
    pub fn get(&self, stop_id: &str) -> Option<Coordinate> {
        self.by_stop.get(stop_id).copied()
    }

    /// 查不到时回退到 [`CITY_HALL`]
    pub fn locate(&self, stop_id: &str) -> Coordinate {
        self.get(stop_id).unwrap_or(CITY_HALL)
    }

    pub fn len(&self) -> usize {
        self.by_stop.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_stop.is_empty()
    }
}

impl FromIterator<(String, Coordinate)> for StopCoordinates {
    fn from_iter<I: IntoIterator<Item = (String, Coordinate)>>(iter: I) -> Self {
        Self {
            by_stop: iter.into_iter().collect(),
        }
    }
}

/// 从站点坐标 CSV 加载坐标表
/// 要求 CSV 头包含列：`stop_id`, `lat`, `lng`（不区分大小写）
pub fn load_stop_coordinates(file_path: &Path) -> Result<StopCoordinates, AppError> {
    if !file_path.exists() {
        return Err(AppError::Internal(format!(
            "未找到站点坐标文件: {file_path:?}"
        )));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(file_path)
        .map_err(|e| AppError::Internal(format!("读取 CSV 失败: {e}")))?;

    let headers = rdr
        .headers()
        .map_err(|e| AppError::Internal(format!("读取 CSV 表头失败: {e}")))?
        .clone();

    let idx_of = |name: &str| -> Result<usize, AppError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| AppError::Internal(format!("CSV 缺少必需列: {name}")))
    };

    let id_idx = idx_of("stop_id")?;
    let lat_idx = idx_of("lat")?;
    let lng_idx = idx_of("lng")?;

    let parse_f64 = |s: &str| -> Result<f64, AppError> {
        let s = s.trim();
        s.parse::<f64>()
            .map_err(|e| AppError::Internal(format!("解析坐标失败 '{s}': {e}")))
    };

    let mut by_stop = HashMap::new();
    for result in rdr.records() {
        let record = result.map_err(|e| AppError::Internal(format!("读取 CSV 记录失败: {e}")))?;

        let id = record.get(id_idx).unwrap_or("").trim().to_string();
        if id.is_empty() {
            continue;
        }

        let lat = parse_f64(record.get(lat_idx).unwrap_or(""))?;
        let lng = parse_f64(record.get(lng_idx).unwrap_or(""))?;
        by_stop.insert(id, Coordinate { lat, lng });
    }

    tracing::info!("已加载 {} 个站点坐标", by_stop.len());
    Ok(StopCoordinates { by_stop })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "drt_coords_{}_{}.csv",
            name,
            uuid::Uuid::new_v4().simple()
        ));
        let mut f = fs::File::create(&path).expect("create temp csv");
        f.write_all(content.as_bytes()).expect("write temp csv");
        path
    }

    #[test]
    fn loads_rows_and_skips_blank_ids() {
        let path = write_temp(
            "ok",
            "STOP_ID,lat,lng\n100000001,37.57,126.98\n,1,2\n100000002, 37.50 ,127.03\n",
        );
        let coords = load_stop_coordinates(&path).expect("load");
        let _ = fs::remove_file(&path);

        assert_eq!(coords.len(), 2);
        assert_eq!(
            coords.get("100000002"),
            Some(Coordinate {
                lat: 37.50,
                lng: 127.03
            })
        );
        assert_eq!(coords.locate("unknown"), CITY_HALL);
    }

    #[test]
    fn missing_column_is_an_error() {
        let path = write_temp("bad", "id,lat\n1,37.5\n");
        let result = load_stop_coordinates(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(AppError::Internal(msg)) if msg.contains("stop_id")));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("drt_coords_definitely_missing.csv");
        assert!(load_stop_coordinates(&path).is_err());
    }
}
