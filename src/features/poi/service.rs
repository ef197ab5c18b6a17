use rand::Rng;

use crate::features::common::QueryFilter;
use crate::features::upstream::PoiPopulationRow;
use crate::features::upstream::models::PoiTimeSlot;

use super::models::{
    AgeDistribution, CongestionDistribution, Demographics, PoiCongestion, PoiMetadata,
    PoiPopulationData, PoiSummary,
};

/// 进入 `peak_areas` 的最低拥挤度
pub const PEAK_SCORE: u32 = 70;
const PEAK_AREAS_LIMIT: usize = 5;

/// 未知拥挤度等级的默认分
const DEFAULT_SCORE: u32 = 50;

const LEVELS: [(&str, u32); 5] = [
    ("여유", 20),
    ("보통", 50),
    ("약간 붐빔", 65),
    ("붐빔", 80),
    ("매우 붐빔", 95),
];

/// 当前小时对应的上游时段分类
pub fn time_zone_key(hour: usize) -> &'static str {
    match hour {
        6..=9 => "06~10",
        10..=13 => "10~14",
        14..=17 => "14~18",
        18..=21 => "18~22",
        22..=23 | 0..=1 => "22~02",
        _ => "02~06",
    }
}

/// 拥挤度等级 → 分数
pub fn congestion_score(level: &str) -> u32 {
    LEVELS
        .iter()
        .find(|(name, _)| *name == level)
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_SCORE)
}

fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 { part / total * 100.0 } else { 0.0 }
}

fn to_congestion(row: &PoiPopulationRow, zone_key: &str) -> Option<PoiCongestion> {
    let slot: &PoiTimeSlot = row
        .poi_data
        .iter()
        .find(|s| s.tmzon_clas_se == zone_key)
        .or_else(|| row.poi_data.first())?;

    Some(PoiCongestion {
        poi_code: row.poi_code.clone(),
        poi_name: row.poi_name.clone(),
        current_population: slot.tot_ppltn_co.max(0.0).round() as u64,
        congestion_level: slot.congestion_lvl.clone(),
        congestion_message: slot.congestion_msg.clone(),
        congestion_score: congestion_score(&slot.congestion_lvl),
        demographics: Demographics {
            male_ratio: percent(slot.male_ppltn_co, slot.tot_ppltn_co),
            female_ratio: percent(slot.fml_ppltn_co, slot.tot_ppltn_co),
            age_distribution: AgeDistribution {
                teens: slot.ppltn_rate_10,
                twenties: slot.ppltn_rate_20,
                thirties: slot.ppltn_rate_30,
                forties: slot.ppltn_rate_40,
                fifties: slot.ppltn_rate_50,
                sixties_above: slot.ppltn_rate_60_above,
            },
        },
        timestamp: slot.stdr_de_id.clone(),
    })
}

/// 汇总：总人口、平均分（四舍五入，空集为 0）、分布与高峰区域
pub fn summarize(pois: &[PoiCongestion]) -> PoiSummary {
    let mut distribution = CongestionDistribution::default();
    for poi in pois {
        match poi.congestion_score {
            0..=30 => distribution.relaxed += 1,
            31..=60 => distribution.normal += 1,
            61..=80 => distribution.crowded += 1,
            _ => distribution.very_crowded += 1,
        }
    }

    let avg = if pois.is_empty() {
        0
    } else {
        let sum: u32 = pois.iter().map(|p| p.congestion_score).sum();
        (f64::from(sum) / pois.len() as f64).round() as u32
    };

    PoiSummary {
        total_pois: pois.len(),
        total_population: pois
            .iter()
            .fold(0, |acc: u64, p| acc.saturating_add(p.current_population)),
        avg_congestion_score: avg,
        congestion_distribution: distribution,
        peak_areas: pois
            .iter()
            .filter(|p| p.congestion_score >= PEAK_SCORE)
            .take(PEAK_AREAS_LIMIT)
            .map(|p| p.poi_name.clone())
            .collect(),
    }
}

fn wanted(codes: Option<&[String]>, code: &str) -> bool {
    codes.is_none_or(|codes| codes.iter().any(|c| c == code))
}

/// 按 `poi_codes` 过滤，取当前时段快照（没有则取第一条），跳过没有快照的 POI
pub fn build_poi_population(
    rows: &[PoiPopulationRow],
    filter: &QueryFilter,
    current_hour: usize,
    data_timestamp: String,
) -> PoiPopulationData {
    let zone_key = time_zone_key(current_hour);
    let pois: Vec<PoiCongestion> = rows
        .iter()
        .filter(|row| wanted(filter.poi_codes.as_deref(), &row.poi_code))
        .filter_map(|row| to_congestion(row, zone_key))
        .collect();

    PoiPopulationData {
        summary: summarize(&pois),
        poi_data: pois,
        metadata: Some(PoiMetadata {
            data_source: "Seoul Open API - POI Population".to_string(),
            target_date: filter.target_date.clone(),
            data_timestamp,
            cache_duration: "3 minutes".to_string(),
        }),
    }
}

const MOCK_POIS: [(&str, &str, f64); 5] = [
    ("POI001", "강남역 일대", 1200.0),
    ("POI002", "홍대입구 일대", 800.0),
    ("POI003", "명동 일대", 1500.0),
    ("POI004", "잠실 일대", 600.0),
    ("POI005", "신촌 일대", 700.0),
];

/// 模拟人口的时段系数
pub fn population_multiplier(hour: usize) -> f64 {
    match hour {
        7..=9 => 1.8,
        12..=13 => 1.4,
        18..=20 => 2.0,
        22..=23 | 0..=5 => 0.3,
        _ => 1.0,
    }
}

pub fn mock_poi_population<R: Rng + ?Sized>(
    rng: &mut R,
    codes: Option<&[String]>,
    current_hour: usize,
    today: &str,
) -> PoiPopulationData {
    let multiplier = population_multiplier(current_hour);

    let pois: Vec<PoiCongestion> = MOCK_POIS
        .iter()
        .filter(|(code, _, _)| wanted(codes, code))
        .map(|(code, name, base)| {
            let population = (base * multiplier * rng.gen_range(0.8..1.2)).floor();
            let score = (population / base * 50.0).min(95.0);
            let level = LEVELS[((score / 20.0).floor() as usize).min(LEVELS.len() - 1)].0;

            PoiCongestion {
                poi_code: code.to_string(),
                poi_name: name.to_string(),
                current_population: population as u64,
                congestion_level: level.to_string(),
                congestion_message: format!("{name}이(가) {level} 상태입니다."),
                congestion_score: score.floor() as u32,
                demographics: Demographics {
                    male_ratio: rng.gen_range(45.0..55.0),
                    female_ratio: rng.gen_range(45.0..55.0),
                    age_distribution: AgeDistribution {
                        teens: rng.gen_range(0.0..15.0),
                        twenties: rng.gen_range(20.0..35.0),
                        thirties: rng.gen_range(20.0..35.0),
                        forties: rng.gen_range(15.0..25.0),
                        fifties: rng.gen_range(10.0..20.0),
                        sixties_above: rng.gen_range(0.0..15.0),
                    },
                },
                timestamp: today.to_string(),
            }
        })
        .collect();

    PoiPopulationData {
        summary: summarize(&pois),
        poi_data: pois,
        metadata: None,
    }
}
