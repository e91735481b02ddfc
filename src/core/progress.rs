use crate::domain::model::ProgressMetric;

/// Completion percentage in `[0, 100]`; halves round up and a zero target yields 0.
pub fn percentage(current: u64, target: u64) -> u8 {
    if target == 0 {
        return 0;
    }

    // 整數運算避免浮點誤差: round(c * 100 / t)
    let current = u128::from(current);
    let target = u128::from(target);
    let rounded = (current * 200 + target) / (target * 2);

    rounded.min(100) as u8
}

impl ProgressMetric {
    pub fn percentage(&self) -> u8 {
        percentage(self.current, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_target_is_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(25, 0), 0);
        assert_eq!(percentage(u64::MAX, 0), 0);
    }

    #[test]
    fn test_plain_ratios() {
        assert_eq!(percentage(50, 100), 50);
        assert_eq!(percentage(0, 40), 0);
        assert_eq!(percentage(40, 40), 100);
    }

    #[test]
    fn test_over_target_is_clamped() {
        assert_eq!(percentage(150, 100), 100);
        assert_eq!(percentage(u64::MAX, 1), 100);
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(1, 201), 0);
    }

    #[test]
    fn test_metric_delegates() {
        let metric = ProgressMetric {
            current: 30,
            target: 120,
        };
        assert_eq!(metric.percentage(), 25);
    }
}
