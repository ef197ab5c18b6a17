use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;

/// 看板时区下的当前时间
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// 看板时区下的“今天”（YYYY-MM-DD）
pub fn today(tz: Tz) -> String {
    now_in(tz).format("%Y-%m-%d").to_string()
}

/// 看板时区下的当前小时（0..=23）
pub fn current_hour(tz: Tz) -> usize {
    now_in(tz).hour() as usize
}

/// 响应时间戳（UTC，毫秒精度，`Z` 结尾）
pub fn timestamp() -> String {
    rfc3339(Utc::now())
}

pub fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
