//! Metric helpers over any metricable T: availability, mean
//! latency, and percentile latency. All three return 0 on nil, empty, or
//! all-failure distributions.

use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::Metricable;

/// Probability mass on success buckets divided by total mass.
pub fn availability<T: Metricable>(d: &Outcomes<T>) -> f64 {
    let total = d.total_weight();
    if total <= 0.0 {
        return 0.0;
    }
    let success: f64 = d
        .buckets()
        .iter()
        .filter(|b| b.value.is_success())
        .map(|b| b.weight)
        .sum();
    success / total
}

/// `(sum_success w*latency) / (sum_success w)`.
pub fn mean_latency<T: Metricable>(d: &Outcomes<T>) -> Duration {
    let mut weight = 0.0;
    let mut weighted = 0.0;
    for b in d.buckets() {
        if b.value.is_success() {
            weight += b.weight;
            weighted += b.weight * b.value.get_latency().as_secs();
        }
    }
    if weight <= 0.0 {
        Duration::ZERO
    } else {
        Duration::from_secs(weighted / weight)
    }
}

/// The smallest-latency success bucket whose running success-weight
/// fraction is >= p. `p = 0` returns the smallest, `p = 1` the largest.
pub fn percentile_latency<T: Metricable>(d: &Outcomes<T>, p: f64) -> Duration {
    let success_total: f64 = d
        .buckets()
        .iter()
        .filter(|b| b.value.is_success())
        .map(|b| b.weight)
        .sum();
    if success_total <= 0.0 {
        return Duration::ZERO;
    }

    let mut latencies: Vec<(f64, f64)> = d
        .buckets()
        .iter()
        .filter(|b| b.value.is_success())
        .map(|b| (b.value.get_latency().as_secs(), b.weight))
        .collect();
    latencies.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let target = p.clamp(0.0, 1.0) * success_total;
    let mut running = 0.0;
    for (latency, weight) in &latencies {
        running += weight;
        // Guard against FP rounding landing just under the target at the
        // final bucket.
        if running + 1e-9 >= target {
            return Duration::from_secs(*latency);
        }
    }
    latencies
        .last()
        .map(|(l, _)| Duration::from_secs(*l))
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::PointResult;
    use std::rc::Rc;

    fn dist(entries: &[(f64, bool, f64)]) -> Outcomes<PointResult> {
        let combiner = Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b));
        let mut d = Outcomes::empty(combiner);
        for (w, s, l) in entries {
            d.add(*w, PointResult::new(*s, Duration::from_millis(*l)));
        }
        d
    }

    #[test]
    fn availability_bounds_and_degenerate_cases() {
        let empty: Outcomes<PointResult> = Outcomes::empty(Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b)));
        assert_eq!(availability(&empty), 0.0);

        let all_fail = dist(&[(1.0, false, 1.0), (2.0, false, 2.0)]);
        assert_eq!(availability(&all_fail), 0.0);

        let all_success = dist(&[(1.0, true, 1.0), (2.0, true, 2.0)]);
        assert_eq!(availability(&all_success), 1.0);

        let mixed = dist(&[(9.0, true, 1.0), (1.0, false, 2.0)]);
        assert!((availability(&mixed) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn mean_latency_ignores_failures() {
        let d = dist(&[(1.0, true, 10.0), (1.0, true, 20.0), (5.0, false, 1000.0)]);
        assert_eq!(mean_latency(&d), Duration::from_millis(15.0));
    }

    #[test]
    fn percentile_extremes() {
        let d = dist(&[(1.0, true, 1.0), (1.0, true, 2.0), (1.0, true, 3.0)]);
        assert_eq!(percentile_latency(&d, 0.0), Duration::from_millis(1.0));
        assert_eq!(percentile_latency(&d, 1.0), Duration::from_millis(3.0));
    }

    #[test]
    fn percentile_on_all_failure_is_zero() {
        let d = dist(&[(1.0, false, 1.0)]);
        assert_eq!(percentile_latency(&d, 0.5), Duration::ZERO);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::outcome::PointResult;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn dist(entries: &[(f64, bool, f64)]) -> Outcomes<PointResult> {
        let combiner = Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b));
        let mut d = Outcomes::empty(combiner);
        for (w, s, l) in entries {
            d.add(*w, PointResult::new(*s, Duration::from_millis(*l)));
        }
        d
    }

    proptest! {
        #[test]
        fn prop_availability_in_unit_interval_and_extremes(
            entries in prop::collection::vec((0.01f64..50.0, any::<bool>(), 0.0f64..1000.0), 0..12),
        ) {
            let d = dist(&entries);
            let a = availability(&d);
            prop_assert!((0.0..=1.0).contains(&a));
            let has_success = d.buckets().iter().any(|b| b.value.success && b.weight > 0.0);
            let has_failure = d.buckets().iter().any(|b| !b.value.success && b.weight > 0.0);
            if has_success && !has_failure {
                prop_assert!((a - 1.0).abs() < 1e-9);
            }
            if has_failure && !has_success {
                prop_assert!(a.abs() < 1e-9);
            }
        }

        #[test]
        fn prop_percentile_monotonic_in_p(
            entries in prop::collection::vec((0.01f64..50.0, any::<bool>(), 0.0f64..1000.0), 1..12),
            p_lo in 0.0f64..1.0,
            p_hi in 0.0f64..1.0,
        ) {
            let d = dist(&entries);
            let (lo, hi) = if p_lo <= p_hi { (p_lo, p_hi) } else { (p_hi, p_lo) };
            let a = percentile_latency(&d, lo);
            let b = percentile_latency(&d, hi);
            prop_assert!(a.as_secs() <= b.as_secs() + 1e-9);
        }
    }
}
