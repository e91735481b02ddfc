use crate::core::display::parse_donation_date;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Minimum number of days between two donations by the same donor.
pub const ELIGIBILITY_WINDOW_DAYS: i64 = 120;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    pub can_donate: bool,
    pub days_remaining: u32,
    pub message: String,
    pub next_eligible: Option<DateTime<Utc>>,
}

/// 依上次捐血日期計算目前是否可捐血。
///
/// `now` is passed in by the caller. The 120th day after the last donation
/// is already eligible.
pub fn eligibility(last_donation: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Eligibility {
    let Some(last) = last_donation else {
        return eligible(None);
    };

    // 接近 chrono 上限的日期無法再加 120 天
    let next_eligible = last.checked_add_signed(Duration::days(ELIGIBILITY_WINDOW_DAYS));
    let days_since = (now - last).num_milliseconds().div_euclid(MILLIS_PER_DAY);
    let remaining = ELIGIBILITY_WINDOW_DAYS.saturating_sub(days_since);

    if remaining > 0 || next_eligible.is_none() {
        let days_remaining = u32::try_from(remaining.max(1)).unwrap_or(u32::MAX);
        Eligibility {
            can_donate: false,
            days_remaining,
            message: waiting_message(days_remaining),
            next_eligible,
        }
    } else {
        eligible(next_eligible)
    }
}

/// Parses the wire value first; an unreadable date is returned as an error.
pub fn eligibility_from_str(last_donation: Option<&str>, now: DateTime<Utc>) -> Result<Eligibility> {
    let parsed = match last_donation.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => Some(parse_donation_date(raw)?),
        None => None,
    };
    Ok(eligibility(parsed, now))
}

fn eligible(next_eligible: Option<DateTime<Utc>>) -> Eligibility {
    Eligibility {
        can_donate: true,
        days_remaining: 0,
        message: "Eligible to donate".to_string(),
        next_eligible,
    }
}

fn waiting_message(days: u32) -> String {
    if days == 1 {
        "Eligible to donate again in 1 day".to_string()
    } else {
        format!("Eligible to donate again in {} days", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DashboardError;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_no_last_donation_is_eligible() {
        let result = eligibility(None, now());
        assert!(result.can_donate);
        assert_eq!(result.days_remaining, 0);
        assert_eq!(result.next_eligible, None);
    }

    #[test]
    fn test_exactly_120_days_is_eligible() {
        let result = eligibility(Some(now() - Duration::days(120)), now());
        assert!(result.can_donate);
        assert_eq!(result.days_remaining, 0);
        assert_eq!(result.next_eligible, Some(now()));
    }

    #[test]
    fn test_119_days_has_one_day_remaining() {
        let result = eligibility(Some(now() - Duration::days(119)), now());
        assert!(!result.can_donate);
        assert_eq!(result.days_remaining, 1);
        assert_eq!(result.message, "Eligible to donate again in 1 day");
    }

    #[test]
    fn test_partial_day_is_floored() {
        // 119 天又 23 小時仍算 119 天
        let last = now() - Duration::days(119) - Duration::hours(23);
        let result = eligibility(Some(last), now());
        assert!(!result.can_donate);
        assert_eq!(result.days_remaining, 1);
    }

    #[test]
    fn test_recent_donation_counts_down() {
        let result = eligibility(Some(now() - Duration::days(20)), now());
        assert!(!result.can_donate);
        assert_eq!(result.days_remaining, 100);
        assert!(result.message.contains("100 days"));
    }

    #[test]
    fn test_future_date_waits_longer_than_window() {
        let result = eligibility(Some(now() + Duration::hours(1)), now());
        assert!(!result.can_donate);
        assert_eq!(result.days_remaining, 121);
    }

    #[test]
    fn test_sub_second_future_date_is_floored() {
        let result = eligibility(Some(now() + Duration::milliseconds(500)), now());
        assert!(!result.can_donate);
        assert_eq!(result.days_remaining, 121);
    }

    #[test]
    fn test_latest_representable_date_does_not_overflow() {
        let result = eligibility(Some(DateTime::<Utc>::MAX_UTC), now());
        assert!(!result.can_donate);
        assert_eq!(result.next_eligible, None);
        assert!(result.days_remaining > 120);
    }

    #[test]
    fn test_earliest_representable_date_is_eligible() {
        let result = eligibility(Some(DateTime::<Utc>::MIN_UTC), now());
        assert!(result.can_donate);
        assert_eq!(result.days_remaining, 0);
        assert!(result.next_eligible.is_some());
    }

    #[test]
    fn test_far_future_wire_date_is_not_eligible() {
        let result = eligibility_from_str(Some("+262142-12-31"), now()).unwrap();
        assert!(!result.can_donate);
        assert_eq!(result.next_eligible, None);
    }

    #[test]
    fn test_long_ago_is_eligible() {
        let result = eligibility(Some(now() - Duration::days(3650)), now());
        assert!(result.can_donate);
        assert_eq!(result.days_remaining, 0);
    }

    #[test]
    fn test_from_str_variants() {
        assert!(eligibility_from_str(None, now()).unwrap().can_donate);
        assert!(eligibility_from_str(Some("  "), now()).unwrap().can_donate);

        let result = eligibility_from_str(Some("2024-08-01"), now()).unwrap();
        assert!(!result.can_donate);
        assert_eq!(result.days_remaining, 89);

        let err = eligibility_from_str(Some("yesterday"), now()).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDate { .. }));
    }
}
