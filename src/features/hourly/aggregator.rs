//! 时段聚合：选行、按小时求正值平均、按比例切分上下车、推导高峰洞察。
//!
//! 这里的函数都是纯函数，相同输入得到相同输出。

use crate::features::upstream::{HOURS, UpstreamRecord, hour_label};

use super::models::{DailyTotal, HourlySeries, Insight};

/// 上车占比。与站点详情的 0.6/0.4 不一致，两处各自保留。
pub const BOARDING_SHARE: f64 = 0.55;
/// 下车占比
pub const ALIGHTING_SHARE: f64 = 0.45;

/// 全市采样时最多取的行数
pub const SAMPLE_LIMIT: usize = 100;

/// 全市平均时的区域名
pub const CITY_AVERAGE_NAME: &str = "서울시 전체 평균";

const DISTRICTS: &[(&str, &str)] = &[
    ("gangnam", "강남구"),
    ("seocho", "서초구"),
    ("songpa", "송파구"),
    ("gangdong", "강동구"),
    ("mapo", "마포구"),
    ("jongro", "종로구"),
    ("jung", "중구"),
    ("yongsan", "용산구"),
];

/// 区代码转韩文区名，未知代码原样返回
pub fn district_name(area_id: &str) -> &str {
    DISTRICTS
        .iter()
        .find(|(id, _)| *id == area_id)
        .map(|(_, name)| *name)
        .unwrap_or(area_id)
}

/// 选中的行及其展示名
#[derive(Debug)]
pub struct Selection<'a> {
    pub area_name: String,
    pub records: Vec<&'a UpstreamRecord>,
}

/// 按区域类型选行：
/// - `stop` + id：站点 ID 精确匹配
/// - `district` + id：站名包含 id 或其韩文区名
/// - 其他：前 [`SAMPLE_LIMIT`] 行采样
pub fn select<'a>(
    records: &'a [UpstreamRecord],
    area_type: &str,
    area_id: Option<&str>,
) -> Selection<'a> {
    match (area_type, area_id) {
        ("stop", Some(id)) => {
            let records: Vec<_> = records.iter().filter(|r| r.stop_id == id).collect();
            let area_name = records
                .first()
                .map(|r| r.stop_name.clone())
                .unwrap_or_else(|| CITY_AVERAGE_NAME.to_string());
            Selection { area_name, records }
        }
        ("district", Some(id)) => {
            let name = district_name(id);
            let records = records
                .iter()
                .filter(|r| r.stop_name.contains(id) || r.stop_name.contains(name))
                .collect();
            Selection {
                area_name: name.to_string(),
                records,
            }
        }
        _ => Selection {
            area_name: CITY_AVERAGE_NAME.to_string(),
            records: records.iter().take(SAMPLE_LIMIT).collect(),
        },
    }
}

/// 每小时只对严格为正的值求平均；没有正值的小时为 0
pub fn average_positive(records: &[&UpstreamRecord]) -> [f64; HOURS] {
    let mut averaged = [0.0; HOURS];
    for (hour, slot) in averaged.iter_mut().enumerate() {
        let (sum, count) = records
            .iter()
            .map(|r| r.hourly[hour])
            .filter(|v| *v > 0.0)
            .fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));
        if count > 0 {
            *slot = sum / f64::from(count);
        }
    }
    averaged
}

/// 按 [`BOARDING_SHARE`]/[`ALIGHTING_SHARE`] 切分，两侧分别向下取整
pub fn split(combined: &[f64; HOURS]) -> HourlySeries {
    let share = |v: f64, ratio: f64| (v * ratio).floor().max(0.0) as u64;
    HourlySeries {
        boarding: combined.iter().map(|v| share(*v, BOARDING_SHARE)).collect(),
        alighting: combined.iter().map(|v| share(*v, ALIGHTING_SHARE)).collect(),
    }
}

fn mean_boarding(series: &HourlySeries, hours: &[usize]) -> Option<f64> {
    if hours.is_empty() {
        return None;
    }
    let sum: f64 = hours.iter().map(|h| series.boarding[*h] as f64).sum();
    Some(sum / hours.len() as f64)
}

/// 上游数值只保证有限，极大值切分后会饱和到 `u64::MAX`；求和与阈值比较在 u128 中进行
fn wide_sum(values: &[u64]) -> u128 {
    values.iter().map(|v| u128::from(*v)).sum()
}

fn saturate(v: u128) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

/// 高峰：`total > 日上车/24 × 1.5`；低谷：`total < 日上车/24 × 0.3`（均为严格比较）。
///
/// 在整数域比较：`16·total > 日上车`、`80·total < 日上车`，避免浮点误差把边界算进去。
pub fn derive_insight(series: &HourlySeries) -> Insight {
    let daily_boarding = wide_sum(&series.boarding);
    let daily_alighting = wide_sum(&series.alighting);

    let mut peak = Vec::new();
    let mut off_peak = Vec::new();
    for (hour, (b, a)) in series.boarding.iter().zip(&series.alighting).enumerate() {
        let total = u128::from(*b) + u128::from(*a);
        if total * 16 > daily_boarding {
            peak.push(hour);
        } else if total * 80 < daily_boarding {
            off_peak.push(hour);
        }
    }

    let avg_peak = mean_boarding(series, &peak).unwrap_or(0.0);
    let avg_off_peak = mean_boarding(series, &off_peak).unwrap_or(1.0);
    let ratio = if avg_off_peak > 0.0 {
        avg_peak / avg_off_peak
    } else {
        1.0
    };

    Insight {
        peak_hours: peak.into_iter().map(hour_label).collect(),
        off_peak_hours: off_peak.into_iter().map(hour_label).collect(),
        daily_total: DailyTotal {
            boarding: saturate(daily_boarding),
            alighting: saturate(daily_alighting),
        },
        peak_vs_offpeak_ratio: (ratio * 10.0).round() / 10.0,
    }
}
