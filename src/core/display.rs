use crate::utils::error::{DashboardError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Label shown when a donation date is missing or unreadable.
pub const NOT_SET: &str = "not set";
pub const NOT_SET_BN: &str = "নির্ধারিত নয়";

const DISPLAY_FORMAT: &str = "%d %b %Y";

/// 解析 API 的 `lastDonation` 欄位。
///
/// Accepts RFC 3339 timestamps, naive timestamps (read as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_donation_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| DashboardError::InvalidDate {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// 解析失敗時回傳 fallback，不拋出錯誤
pub fn format_donation_date(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => fallback.to_string(),
        Some(raw) => match parse_donation_date(raw) {
            Ok(dt) => dt.format(DISPLAY_FORMAT).to_string(),
            Err(e) => {
                tracing::debug!("Falling back to '{}' for date: {}", fallback, e);
                fallback.to_string()
            }
        },
    }
}
