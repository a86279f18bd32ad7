//! 时间类型模块
//!
//! - `Timestamp`: 可序列化的毫秒时间戳，用于评论 ID 和相对时间显示
//! - `format_duration`: 课时时长格式化

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Sub;
use std::time::Duration;

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 当前时间（在 wasm32 上经由 `js_sys::Date` 获取）
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// 相对于 `now` 的人类可读描述，如 "Just now"、"2 hours ago"
    pub fn relative_to(&self, now: Timestamp) -> String {
        let elapsed = (now - *self).as_secs();
        let (value, unit) = match elapsed {
            0..60 => return "Just now".to_string(),
            60..3_600 => (elapsed / 60, "minute"),
            3_600..86_400 => (elapsed / 3_600, "hour"),
            86_400..2_592_000 => (elapsed / 86_400, "day"),
            _ => {
                return self
                    .to_datetime()
                    .map(|dt| dt.format("%b %-d, %Y").to_string())
                    .unwrap_or_default();
            }
        };
        if value == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{value} {unit}s ago")
        }
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs.as_millis() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 两个时间戳之间的差值，负值截断为 0
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

// =========================================================
// 时长格式化
// =========================================================

/// 浮点秒数取整为 `u32`；非有限值或非正数视为 0
pub fn round_seconds(raw: f64) -> u32 {
    if raw.is_finite() && raw > 0.0 {
        raw.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// 课时时长的反序列化：后端可能存整数、小数或 `null`
pub mod seconds {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.map_or(0, super::round_seconds))
    }
}

/// `m:ss`，超过一小时时为 `h:mm:ss`
pub fn format_duration(total_secs: u32) -> String {
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// 课程总时长，如 `3h 25m`
pub fn format_hours_minutes(total_secs: u32) -> String {
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    format!("{hours}h {minutes}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_are_rounded_and_guarded() {
        assert_eq!(round_seconds(12.5), 13);
        assert_eq!(round_seconds(94.4), 94);
        assert_eq!(round_seconds(-3.0), 0);
        assert_eq!(round_seconds(f64::NAN), 0);
        assert_eq!(round_seconds(f64::INFINITY), 0);
    }

    const HOUR: Duration = Duration::from_secs(3_600);

    #[test]
    fn relative_labels() {
        let now = Timestamp::new(1_700_000_000_000);
        assert_eq!(now.relative_to(now), "Just now");
        assert_eq!((now - Duration::from_secs(59)).relative_to(now), "Just now");
        assert_eq!((now - Duration::from_secs(60)).relative_to(now), "1 minute ago");
        assert_eq!((now - HOUR * 2).relative_to(now), "2 hours ago");
        assert_eq!((now - HOUR * 24).relative_to(now), "1 day ago");
    }

    #[test]
    fn old_timestamps_render_as_dates() {
        let now = Timestamp::new(1_700_000_000_000);
        let then = now - HOUR * 24 * 40;
        assert_eq!(then.relative_to(now), "Oct 5, 2023");
    }

    #[test]
    fn future_timestamps_count_as_now() {
        let now = Timestamp::new(10_000);
        assert_eq!(Timestamp::new(20_000).relative_to(now), "Just now");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(95), "1:35");
        assert_eq!(format_duration(3_725), "1:02:05");
        assert_eq!(format_hours_minutes(3_725), "1h 2m");
        assert_eq!(format_hours_minutes(59), "0h 0m");
    }
}
