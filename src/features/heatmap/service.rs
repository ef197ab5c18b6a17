use rand::Rng;

use crate::error::UpstreamError;
use crate::features::common::QueryFilter;
use crate::features::common::envelope::MOCK_DATA_SOURCE;
use crate::features::upstream::UpstreamRecord;
use crate::startup::stop_coordinates::StopCoordinates;

use super::models::{HeatmapData, HeatmapMetadata, HeatmapPoint, Legend, SEOUL_BOUNDS};

/// 归一化时视为满强度的人数
pub const FULL_INTENSITY: f64 = 100.0;

const LEGEND_UNIT: &str = "명/시간";

/// 模拟数据的热点中心：市厅、明洞、江南站、弘大入口站、水逾站
const MOCK_CENTERS: [(f64, f64); 5] = [
    (37.5665, 126.9780),
    (37.5636, 126.9757),
    (37.5157, 127.0411),
    (37.5569, 126.9358),
    (37.6013, 126.9292),
];
const MOCK_POINTS_PER_CENTER: usize = 20;
const MOCK_JITTER_DEG: f64 = 0.01;

/// 把强度值换算为图例刻度：`min` 与 0 比较、`max` 与 1 比较后 ×100 取整
pub fn legend_for(intensities: &[f64]) -> Legend {
    let min = intensities.iter().copied().fold(0.0_f64, f64::min);
    let max = intensities.iter().copied().fold(1.0_f64, f64::max);
    Legend {
        min_value: (min * 100.0).floor() as i64,
        max_value: (max * 100.0).floor() as i64,
        unit: LEGEND_UNIT.to_string(),
    }
}

/// 单站强度：`1h` 取当前小时值，其余时间范围取日合计
fn raw_intensity(record: &UpstreamRecord, time_range: &str, current_hour: usize) -> f64 {
    if time_range == "1h" {
        record.hourly.get(current_hour).copied().unwrap_or(0.0)
    } else {
        record.daily_total
    }
}

/// 上游行 → 热力点；只保留 `a05 > 0` 且归一化强度大于 0 的站点
pub fn build_heatmap(
    records: &[UpstreamRecord],
    filter: &QueryFilter,
    current_hour: usize,
    coordinates: &StopCoordinates,
    updated_at: String,
) -> HeatmapData {
    let points: Vec<HeatmapPoint> = records
        .iter()
        .filter(|r| r.daily_total > 0.0)
        .filter_map(|r| {
            let intensity =
                (raw_intensity(r, &filter.time_range, current_hour) / FULL_INTENSITY).min(1.0);
            (intensity > 0.0).then(|| {
                let at = coordinates.locate(&r.stop_id);
                [at.lat, at.lng, intensity]
            })
        })
        .collect();

    let intensities: Vec<f64> = points.iter().map(|p| p[2]).collect();

    HeatmapData {
        bounds: SEOUL_BOUNDS,
        legend: legend_for(&intensities),
        updated_at,
        metadata: HeatmapMetadata {
            total_points: points.len(),
            data_source: "Seoul Open API".to_string(),
            api_status: "success".to_string(),
            time_range: Some(filter.time_range.clone()),
            intensity_type: Some(filter.intensity_type.clone()),
            target_date: Some(filter.target_date.clone()),
            error_message: None,
        },
        heatmap_points: points,
    }
}

/// 在几个热点中心附近随机撒点
pub fn mock_points<R: Rng + ?Sized>(rng: &mut R) -> Vec<HeatmapPoint> {
    let mut points = Vec::with_capacity(MOCK_CENTERS.len() * MOCK_POINTS_PER_CENTER);
    for (lat, lng) in MOCK_CENTERS {
        for _ in 0..MOCK_POINTS_PER_CENTER {
            points.push([
                lat + rng.gen_range(-MOCK_JITTER_DEG..MOCK_JITTER_DEG),
                lng + rng.gen_range(-MOCK_JITTER_DEG..MOCK_JITTER_DEG),
                rng.gen_range(0.0..1.0),
            ]);
        }
    }
    points
}

pub fn mock_heatmap<R: Rng + ?Sized>(
    rng: &mut R,
    err: &UpstreamError,
    updated_at: String,
) -> HeatmapData {
    let points = mock_points(rng);
    HeatmapData {
        bounds: SEOUL_BOUNDS,
        legend: Legend {
            min_value: 0,
            max_value: 100,
            unit: LEGEND_UNIT.to_string(),
        },
        updated_at,
        metadata: HeatmapMetadata {
            total_points: points.len(),
            data_source: MOCK_DATA_SOURCE.to_string(),
            api_status: "fallback".to_string(),
            time_range: None,
            intensity_type: None,
            target_date: None,
            error_message: Some(err.to_string()),
        },
        heatmap_points: points,
    }
}
