use rand::Rng;

use crate::error::UpstreamError;
use crate::features::common::QueryFilter;
use crate::features::upstream::{HOURS, UpstreamRecord, hour_label};
use crate::startup::stop_coordinates::{CITY_HALL, Coordinate, StopCoordinates};

use super::models::{
    CurrentStatus, HourlyBucket, NearbyInfo, StopDetailData, StopInfo, StopMetadata,
};

/// 上车占比，下车取余数。与时段模式的 0.55/0.45 不一致，两处各自保留。
pub const BOARDING_SHARE: f64 = 0.6;

/// 一小时内视为满负荷的人数
pub const FULL_LOAD_PER_HOUR: f64 = 10.0;

const DISTRICTS: [&str; 10] = [
    "강남구", "서초구", "송파구", "강동구", "마포구", "종로구", "중구", "용산구", "성동구", "광진구",
];
const DEFAULT_DISTRICT: &str = "서울시";

const POI_NEARBY: [&str; 3] = ["버스정류장", "편의점", "카페"];

/// 按 [`BOARDING_SHARE`] 切分一小时的合计：先取整，上车向下取整，余数归下车
pub fn split_hour(value: f64) -> (u64, u64) {
    let total = value.max(0.0).floor();
    let boarding = (total * BOARDING_SHARE).floor();
    (boarding as u64, (total - boarding) as u64)
}

/// 小时拥挤度：`min(v / 10 × 100, 100)`
pub fn hourly_congestion(value: f64) -> f64 {
    (value.max(0.0) / FULL_LOAD_PER_HOUR * 100.0).min(100.0)
}

/// 分数 → 拥挤度等级
pub fn congestion_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "매우혼잡"
    } else if score >= 60.0 {
        "혼잡"
    } else if score >= 40.0 {
        "보통"
    } else {
        "양호"
    }
}

/// 从站名中提取行政区，匹配不到时为 "서울시"
pub fn extract_district(stop_name: &str) -> &'static str {
    DISTRICTS
        .iter()
        .find(|d| stop_name.contains(*d))
        .copied()
        .unwrap_or(DEFAULT_DISTRICT)
}

pub fn hourly_buckets(record: &UpstreamRecord) -> Vec<HourlyBucket> {
    record
        .hourly
        .iter()
        .enumerate()
        .map(|(hour, value)| {
            let (boarding, alighting) = split_hour(*value);
            HourlyBucket {
                hour: hour_label(hour),
                boarding,
                alighting,
                congestion: hourly_congestion(*value),
            }
        })
        .collect()
}

fn routes_at_stop(records: &[UpstreamRecord], stop_id: &str) -> Vec<String> {
    let mut routes: Vec<String> = Vec::new();
    for r in records.iter().filter(|r| r.stop_id == stop_id) {
        if !routes.contains(&r.route_name) {
            routes.push(r.route_name.clone());
        }
    }
    routes
}

fn current_status(bucket: &HourlyBucket, now: &str) -> CurrentStatus {
    CurrentStatus {
        boarding_total: bucket.boarding,
        alighting_total: bucket.alighting,
        congestion_level: congestion_level(bucket.congestion).to_string(),
        congestion_score: bucket.congestion.floor() as u32,
        last_updated: now.to_string(),
    }
}

fn nearby<R: Rng + ?Sized>(rng: &mut R, routes: Vec<String>) -> NearbyInfo {
    NearbyInfo {
        routes,
        poi_nearby: POI_NEARBY.iter().map(|s| s.to_string()).collect(),
        walking_distance_to_subway: rng.gen_range(100..600),
    }
}

/// 站点详情：取第一条匹配行，没有匹配时报 "Stop not found"
pub fn build_stop_detail<R: Rng + ?Sized>(
    rng: &mut R,
    records: &[UpstreamRecord],
    stop_id: &str,
    filter: &QueryFilter,
    current_hour: usize,
    coordinates: &StopCoordinates,
    now: &str,
) -> Result<StopDetailData, UpstreamError> {
    let stop = records
        .iter()
        .find(|r| r.stop_id == stop_id)
        .ok_or_else(|| UpstreamError::NotFound("Stop".to_string()))?;

    let buckets = hourly_buckets(stop);
    let status = current_status(&buckets[current_hour.min(HOURS - 1)], now);

    let coords = coordinates.get(stop_id).unwrap_or_else(|| Coordinate {
        lat: CITY_HALL.lat + rng.gen_range(-0.05..0.05),
        lng: CITY_HALL.lng + rng.gen_range(-0.05..0.05),
    });

    Ok(StopDetailData {
        stop_info: StopInfo {
            stop_id: stop_id.to_string(),
            stop_name: stop.stop_name.clone(),
            district: extract_district(&stop.stop_name).to_string(),
            coordinates: coords,
        },
        current_status: status,
        hourly_data: if filter.include_hourly { buckets } else { Vec::new() },
        nearby_info: nearby(rng, routes_at_stop(records, stop_id)),
        metadata: Some(StopMetadata {
            data_source: "Seoul Open API".to_string(),
            target_date: filter.target_date.clone(),
            daily_total: stop.daily_total,
            route_type: stop.route_type.clone(),
        }),
    })
}

const MOCK_NAMES: [&str; 5] = ["홍대입구역", "강남역", "종로3가역", "명동역", "잠실역"];
const MOCK_DISTRICTS: [&str; 5] = ["마포구", "강남구", "종로구", "중구", "송파구"];
const MOCK_ROUTES: [&str; 3] = ["2번", "6002번", "7017번"];

/// 模拟一个小时的上下车：早晚高峰、午间小高峰、深夜极少
pub fn mock_bucket<R: Rng + ?Sized>(rng: &mut R, hour: usize) -> HourlyBucket {
    let (boarding, alighting): (f64, f64) = match hour {
        7..=9 | 17..=19 => (
            10.0 + rng.gen_range(20.0..50.0),
            8.0 + rng.gen_range(15.0..40.0),
        ),
        12..=13 => (
            10.0 + rng.gen_range(10.0..25.0),
            8.0 + rng.gen_range(10.0..25.0),
        ),
        0..=5 | 23 => (rng.gen_range(0.0..5.0), rng.gen_range(0.0..5.0)),
        _ => (10.0, 8.0),
    };
    let (boarding, alighting) = (boarding.floor() as u64, alighting.floor() as u64);
    HourlyBucket {
        hour: hour_label(hour),
        boarding,
        alighting,
        congestion: ((boarding + alighting) as f64 / 20.0 * 100.0).min(100.0),
    }
}

pub fn mock_stop_detail<R: Rng + ?Sized>(
    rng: &mut R,
    stop_id: &str,
    include_hourly: bool,
    current_hour: usize,
    now: &str,
) -> StopDetailData {
    let buckets: Vec<HourlyBucket> = (0..HOURS).map(|h| mock_bucket(rng, h)).collect();
    let status = current_status(&buckets[current_hour.min(HOURS - 1)], now);
    let route_count = rng.gen_range(1..=MOCK_ROUTES.len());

    StopDetailData {
        stop_info: StopInfo {
            stop_id: stop_id.to_string(),
            stop_name: MOCK_NAMES[rng.gen_range(0..MOCK_NAMES.len())].to_string(),
            district: MOCK_DISTRICTS[rng.gen_range(0..MOCK_DISTRICTS.len())].to_string(),
            coordinates: Coordinate {
                lat: 37.5 + rng.gen_range(0.0..0.2),
                lng: 126.9 + rng.gen_range(0.0..0.3),
            },
        },
        current_status: status,
        hourly_data: if include_hourly { buckets } else { Vec::new() },
        nearby_info: nearby(
            rng,
            MOCK_ROUTES[..route_count]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        metadata: None,
    }
}
