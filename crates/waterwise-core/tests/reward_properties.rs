//! Property tests for the reward calculator.

use proptest::prelude::*;
use waterwise_core::{calculate_reward, RewardPolicy};

fn reward(actual: f64, expected: f64) -> f64 {
    calculate_reward(actual, expected, &RewardPolicy::default()).unwrap()
}

proptest! {
    #[test]
    fn no_reward_at_or_above_baseline(expected in 0.0..10_000.0_f64, extra in 0.0..10_000.0_f64) {
        prop_assert_eq!(reward(expected + extra, expected), 0.0);
    }

    #[test]
    fn reward_is_bounded_by_cap(expected in 0.0..10_000.0_f64, fraction in 0.0..1.0_f64) {
        let actual = expected * fraction;
        let r = reward(actual, expected);
        prop_assert!(r >= 0.0);
        prop_assert!(r <= expected * 0.3 + 0.005);
    }

    #[test]
    fn reward_grows_with_savings(
        expected in 1.0..10_000.0_f64,
        a in 0.0..1.0_f64,
        b in 0.0..1.0_f64,
    ) {
        // smaller actual = larger gap
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(reward(expected * low, expected) >= reward(expected * high, expected));
    }

    #[test]
    fn capped_reward_is_constant(
        expected in 1.0..1_000.0_f64,
        a in 0.0..1.0_f64,
        b in 0.0..1.0_f64,
    ) {
        // rate 1.0 reaches the 30% cap whenever usage stays under 70% of the baseline
        let policy = RewardPolicy { rate: 1.0, max_discount_percent: 30.0 };
        let cap = calculate_reward(0.0, expected, &policy).unwrap();
        let ra = calculate_reward(expected * 0.6 * a, expected, &policy).unwrap();
        let rb = calculate_reward(expected * 0.6 * b, expected, &policy).unwrap();
        prop_assert_eq!(ra, cap);
        prop_assert_eq!(rb, cap);
    }

    #[test]
    fn non_positive_baseline_never_rewards(expected in -1_000.0..=0.0_f64, actual in 0.0..1_000.0_f64) {
        prop_assert_eq!(reward(actual, expected), 0.0);
    }
}

#[test]
fn concrete_scenarios() {
    assert_eq!(reward(80.0, 100.0), 0.2);
    assert_eq!(reward(0.0, 100.0), 1.0);
    assert_eq!(reward(150.0, 100.0), 0.0);
    assert_eq!(reward(0.0, 0.0), 0.0);
}
