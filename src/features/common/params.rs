use chrono_tz::Tz;
use serde::Deserialize;

use super::clock;

pub const DEFAULT_AREA_TYPE: &str = "stop";
pub const DEFAULT_TIME_RANGE: &str = "1h";
pub const DEFAULT_CHART_TYPE: &str = "line";
pub const DEFAULT_INTENSITY_TYPE: &str = "total";

/// 看板路由的原始查询参数（全部可选，各路由只读取自己关心的字段）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub target_date: Option<String>,
    pub area_type: Option<String>,
    pub area_id: Option<String>,
    pub time_range: Option<String>,
    pub chart_type: Option<String>,
    pub intensity_type: Option<String>,
    pub include_poi: Option<String>,
    pub include_hourly: Option<String>,
    pub stop_id: Option<String>,
    pub poi_codes: Option<String>,
}

/// 解析并补全默认值后的请求过滤条件，构建后不再修改。
///
/// 取值不在预期集合内时原样透传，不报错。
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilter {
    pub target_date: String,
    pub area_type: String,
    pub area_id: Option<String>,
    pub time_range: String,
    pub chart_type: String,
    pub intensity_type: String,
    pub include_poi: bool,
    pub include_hourly: bool,
    pub stop_id: Option<String>,
    pub poi_codes: Option<Vec<String>>,
}

fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

fn or_default(v: Option<String>, default: &str) -> String {
    present(v).unwrap_or_else(|| default.to_string())
}

impl DashboardQuery {
    /// 以看板时区补全 `target_date`，其余字段按固定默认值补全
    pub fn resolve(self, tz: Tz) -> QueryFilter {
        QueryFilter {
            target_date: present(self.target_date).unwrap_or_else(|| clock::today(tz)),
            area_type: or_default(self.area_type, DEFAULT_AREA_TYPE),
            area_id: present(self.area_id),
            time_range: or_default(self.time_range, DEFAULT_TIME_RANGE),
            chart_type: or_default(self.chart_type, DEFAULT_CHART_TYPE),
            intensity_type: or_default(self.intensity_type, DEFAULT_INTENSITY_TYPE),
            // 只有字面量 "true" 开启
            include_poi: self.include_poi.as_deref() == Some("true"),
            // 只有字面量 "false" 关闭
            include_hourly: self.include_hourly.as_deref() != Some("false"),
            stop_id: present(self.stop_id),
            poi_codes: present(self.poi_codes).map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gets_defaults() {
        let f = DashboardQuery::default().resolve(chrono_tz::Asia::Seoul);
        assert_eq!(f.target_date, clock::today(chrono_tz::Asia::Seoul));
        assert_eq!(f.area_type, "stop");
        assert_eq!(f.time_range, "1h");
        assert_eq!(f.chart_type, "line");
        assert_eq!(f.intensity_type, "total");
        assert!(f.include_hourly);
        assert!(!f.include_poi);
        assert_eq!(f.area_id, None);
        assert_eq!(f.poi_codes, None);
    }

    #[test]
    fn boolean_flags_only_react_to_exact_literals() {
        let q = DashboardQuery {
            include_hourly: Some("FALSE".into()),
            include_poi: Some("1".into()),
            ..Default::default()
        };
        let f = q.resolve(chrono_tz::Asia::Seoul);
        assert!(f.include_hourly);
        assert!(!f.include_poi);

        let q = DashboardQuery {
            include_hourly: Some("false".into()),
            include_poi: Some("true".into()),
            ..Default::default()
        };
        let f = q.resolve(chrono_tz::Asia::Seoul);
        assert!(!f.include_hourly);
        assert!(f.include_poi);
    }

    #[test]
    fn unexpected_values_pass_through_and_empty_means_absent() {
        let q = DashboardQuery {
            area_type: Some("galaxy".into()),
            area_id: Some("".into()),
            target_date: Some("2025-08-01".into()),
            poi_codes: Some("POI001, POI003,,".into()),
            ..Default::default()
        };
        let f = q.resolve(chrono_tz::Asia::Seoul);
        assert_eq!(f.area_type, "galaxy");
        assert_eq!(f.area_id, None);
        assert_eq!(f.target_date, "2025-08-01");
        assert_eq!(
            f.poi_codes,
            Some(vec!["POI001".to_string(), "POI003".to_string()])
        );
    }
}
