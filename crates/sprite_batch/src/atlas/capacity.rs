//! Atlas capacity growth

use crate::core::config::GrowthPolicy;

/// Capacity after one growth step from `current` that still fits `required` quads
pub fn grown_capacity(current: usize, required: usize, policy: GrowthPolicy) -> usize {
    let step = (current + 1) * policy.numerator / policy.denominator.max(1);
    step.max(required).max(current + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_growth_from_29() {
        let grown = grown_capacity(29, 30, GrowthPolicy::default());
        assert_eq!(grown, 40);
        assert!(grown >= 39);
    }

    #[test]
    fn test_growth_covers_shortfall() {
        assert_eq!(grown_capacity(4, 50, GrowthPolicy::default()), 50);
    }

    #[test]
    fn test_growth_from_zero() {
        assert_eq!(grown_capacity(0, 1, GrowthPolicy::default()), 1);
        assert_eq!(grown_capacity(0, 0, GrowthPolicy::default()), 1);
    }

    #[test]
    fn test_growth_is_monotonic() {
        let policy = GrowthPolicy::new(3, 2);
        let mut capacity = 1;
        for _ in 0..20 {
            let next = grown_capacity(capacity, capacity + 1, policy);
            assert!(next > capacity);
            capacity = next;
        }
    }
}
