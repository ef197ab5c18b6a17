use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// 一天的小时桶数量
pub const HOURS: usize = 24;

/// 两位数小时标签（"00".."23"）
pub fn hour_label(hour: usize) -> String {
    format!("{hour:02}")
}

/// 把上游字段值宽松地读成数字：字符串/数字/null 都接受，无法解析或非有限值记为 0。
pub fn lenient_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn lenient_string(row: &Map<String, Value>, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// 站点分线路分时段上下车记录（TaimsTpssStaRouteInfoH 的一行）
///
/// 上游以 `a05Num00h`..`a05Num23h` 24 个独立字段给出小时数据，这里收敛为定长数组。
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRecord {
    pub stop_id: String,
    pub stop_name: String,
    pub route_id: String,
    pub route_name: String,
    pub route_type: String,
    /// 当日上下车合计（`a05`）
    pub daily_total: f64,
    /// 各小时上下车合计，下标即小时
    pub hourly: [f64; HOURS],
}

impl UpstreamRecord {
    /// 从上游 JSON 行构建记录；非对象行返回 None
    pub fn from_row(row: &Value) -> Option<Self> {
        let row = row.as_object()?;
        let mut hourly = [0.0; HOURS];
        for (hour, slot) in hourly.iter_mut().enumerate() {
            *slot = lenient_f64(row.get(&format!("a05Num{hour:02}h")));
        }
        Some(Self {
            stop_id: lenient_string(row, "staId"),
            stop_name: lenient_string(row, "staNm"),
            route_id: lenient_string(row, "routeId"),
            route_name: lenient_string(row, "routeNm"),
            route_type: lenient_string(row, "rtType"),
            daily_total: lenient_f64(row.get("a05")),
            hourly,
        })
    }

    /// 批量转换，静默跳过无法识别的行
    pub fn from_rows(rows: &[Value]) -> Vec<Self> {
        rows.iter().filter_map(Self::from_row).collect()
    }
}

fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_f64(v.as_ref()))
}

fn de_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// POI 实时人口（citydata_ppltn 的一行）
#[derive(Debug, Clone, Deserialize)]
pub struct PoiPopulationRow {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub poi_code: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub poi_name: String,
    #[serde(default)]
    pub poi_data: Vec<PoiTimeSlot>,
}

/// POI 某个时段的人口快照
#[derive(Debug, Clone, Deserialize)]
pub struct PoiTimeSlot {
    /// 基准日期
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub stdr_de_id: String,
    /// 时段分类（如 "06~10"）
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub tmzon_clas_se: String,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub tot_ppltn_co: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub male_ppltn_co: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub fml_ppltn_co: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub ppltn_rate_10: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub ppltn_rate_20: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub ppltn_rate_30: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub ppltn_rate_40: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub ppltn_rate_50: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub ppltn_rate_60_above: f64,
    /// 拥挤度等级（여유/보통/약간 붐빔/붐빔/매우 붐빔）
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub congestion_lvl: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub congestion_msg: String,
}

impl PoiPopulationRow {
    /// 批量转换，跳过结构不符的行
    pub fn from_rows(rows: &[Value]) -> Vec<Self> {
        rows.iter()
            .filter_map(|row| match Self::deserialize(row) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::debug!("跳过无法解析的 POI 行: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_f64_accepts_strings_numbers_and_garbage() {
        assert_eq!(lenient_f64(Some(&json!("12.5"))), 12.5);
        assert_eq!(lenient_f64(Some(&json!(" 7 "))), 7.0);
        assert_eq!(lenient_f64(Some(&json!(3))), 3.0);
        assert_eq!(lenient_f64(Some(&json!(""))), 0.0);
        assert_eq!(lenient_f64(Some(&json!("abc"))), 0.0);
        assert_eq!(lenient_f64(Some(&json!("NaN"))), 0.0);
        assert_eq!(lenient_f64(Some(&Value::Null)), 0.0);
        assert_eq!(lenient_f64(None), 0.0);
    }

    #[test]
    fn record_maps_hour_fields_into_array() {
        let row = json!({
            "staId": "100000001",
            "staNm": "종로2가",
            "routeId": 100100001,
            "routeNm": "101",
            "rtType": "간선",
            "a05": "340",
            "a05Num00h": "4",
            "a05Num08h": "100",
            "a05Num23h": 9
        });
        let rec = UpstreamRecord::from_row(&row).expect("object row");
        assert_eq!(rec.stop_id, "100000001");
        assert_eq!(rec.route_id, "100100001");
        assert_eq!(rec.daily_total, 340.0);
        assert_eq!(rec.hourly[0], 4.0);
        assert_eq!(rec.hourly[8], 100.0);
        assert_eq!(rec.hourly[23], 9.0);
        assert_eq!(rec.hourly[12], 0.0);
    }

    #[test]
    fn non_object_rows_are_skipped() {
        let rows = vec![json!(1), json!({"staId": "a"}), json!(null)];
        assert_eq!(UpstreamRecord::from_rows(&rows).len(), 1);
    }

    #[test]
    fn poi_row_tolerates_string_numbers() {
        let row = json!({
            "poi_code": "POI001",
            "poi_name": "강남역",
            "poi_data": [{
                "tmzon_clas_se": "06~10",
                "tot_ppltn_co": "1200",
                "male_ppltn_co": 600,
                "fml_ppltn_co": null,
                "congestion_lvl": "붐빔"
            }]
        });
        let parsed = PoiPopulationRow::from_rows(&[row]);
        assert_eq!(parsed.len(), 1);
        let slot = &parsed[0].poi_data[0];
        assert_eq!(slot.tot_ppltn_co, 1200.0);
        assert_eq!(slot.male_ppltn_co, 600.0);
        assert_eq!(slot.fml_ppltn_co, 0.0);
        assert_eq!(slot.congestion_lvl, "붐빔");
    }
}
