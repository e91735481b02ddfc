use crate::core::eligibility::Eligibility;
use serde::Serialize;

/// Comparison of a donor's manual availability toggle with date-based eligibility.
///
/// Advisory only: the toggle is never rewritten here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Consistent,
    AvailableButIneligible { days_remaining: u32 },
    EligibleButUnavailable,
}

impl AvailabilityStatus {
    pub fn is_advisory(&self) -> bool {
        matches!(self, AvailabilityStatus::AvailableButIneligible { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            AvailabilityStatus::Consistent => "ok".to_string(),
            AvailabilityStatus::AvailableButIneligible { days_remaining } => format!(
                "marked available but must wait {} more day(s)",
                days_remaining
            ),
            AvailabilityStatus::EligibleButUnavailable => {
                "eligible but marked unavailable".to_string()
            }
        }
    }
}

pub fn check_availability(is_available: bool, eligibility: &Eligibility) -> AvailabilityStatus {
    match (is_available, eligibility.can_donate) {
        (true, false) => AvailabilityStatus::AvailableButIneligible {
            days_remaining: eligibility.days_remaining,
        },
        // 合格但自行關閉：本人意願，僅註記
        (false, true) => AvailabilityStatus::EligibleButUnavailable,
        _ => AvailabilityStatus::Consistent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eligibility::eligibility;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_available_but_waiting_is_advisory() {
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        let result = eligibility(Some(now - Duration::days(100)), now);
        let status = check_availability(true, &result);
        assert_eq!(
            status,
            AvailabilityStatus::AvailableButIneligible { days_remaining: 20 }
        );
        assert!(status.is_advisory());
        assert!(status.describe().contains("20"));
    }

    #[test]
    fn test_consistent_and_opt_out_cases() {
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        let eligible = eligibility(None, now);
        let waiting = eligibility(Some(now - Duration::days(1)), now);

        assert_eq!(check_availability(true, &eligible), AvailabilityStatus::Consistent);
        assert_eq!(check_availability(false, &waiting), AvailabilityStatus::Consistent);

        let opted_out = check_availability(false, &eligible);
        assert_eq!(opted_out, AvailabilityStatus::EligibleButUnavailable);
        assert!(!opted_out.is_advisory());
    }
}
