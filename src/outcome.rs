//! Concrete outcome shapes and the `Metricable`
//! capability that metric helpers are polymorphic over.

use crate::duration::Duration;

/// `(success, latency)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointResult {
    pub success: bool,
    pub latency: Duration,
}

impl PointResult {
    pub fn new(success: bool, latency: Duration) -> PointResult {
        PointResult { success, latency }
    }

    /// Combiner used by sequential composition: AND success, sum latency.
    pub fn combine(a: &PointResult, b: &PointResult) -> PointResult {
        PointResult {
            success: a.success && b.success,
            latency: a.latency + b.latency,
        }
    }
}

/// `(success, min, mode, max)` with the invariant `min <= mode <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedResult {
    pub success: bool,
    pub min: Duration,
    pub mode: Duration,
    pub max: Duration,
}

impl RangedResult {
    pub fn new(success: bool, min: Duration, mode: Duration, max: Duration) -> RangedResult {
        debug_assert!(min.as_secs() <= mode.as_secs() + 1e-12);
        debug_assert!(mode.as_secs() <= max.as_secs() + 1e-12);
        RangedResult {
            success,
            min: min.min(mode).min(max),
            mode,
            max: max.max(mode).max(min),
        }
    }

    /// A point-estimate view of a ranged outcome, using `mode`.
    pub fn to_point(&self) -> PointResult {
        PointResult::new(self.success, self.mode)
    }

    /// Component-wise addition of min/mode/max, AND of success.
    pub fn combine(a: &RangedResult, b: &RangedResult) -> RangedResult {
        RangedResult::new(
            a.success && b.success,
            a.min + b.min,
            a.mode + b.mode,
            a.max + b.max,
        )
    }

    fn width(&self) -> f64 {
        (self.max.as_secs() - self.min.as_secs()).max(0.0)
    }

    /// Length of the intersection divided by the max of both widths. Zero
    /// if success status differs.
    pub fn overlap(&self, other: &RangedResult) -> f64 {
        if self.success != other.success {
            return 0.0;
        }
        let lo = self.min.as_secs().max(other.min.as_secs());
        let hi = self.max.as_secs().min(other.max.as_secs());
        let inter = (hi - lo).max(0.0);
        let denom = self.width().max(other.width());
        if denom <= 0.0 {
            if inter >= 0.0 && self.min == other.min && self.max == other.max {
                1.0
            } else {
                0.0
            }
        } else {
            inter / denom
        }
    }

    /// Weighted sum of the three absolute differences, mode weighted 4x.
    pub fn dist_to(&self, other: &RangedResult) -> f64 {
        let dmin = (self.min.as_secs() - other.min.as_secs()).abs();
        let dmode = (self.mode.as_secs() - other.mode.as_secs()).abs();
        let dmax = (self.max.as_secs() - other.max.as_secs()).abs();
        dmin + 4.0 * dmode + dmax
    }
}

/// A T carries the metricable capability when it exposes success and
/// latency. Availability, mean, and percentile helpers are polymorphic over
/// this capability set.
pub trait Metricable {
    fn is_success(&self) -> bool;
    fn get_latency(&self) -> Duration;
}

impl Metricable for PointResult {
    fn is_success(&self) -> bool {
        self.success
    }
    fn get_latency(&self) -> Duration {
        self.latency
    }
}

impl Metricable for RangedResult {
    fn is_success(&self) -> bool {
        self.success
    }
    fn get_latency(&self) -> Duration {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_combine_ands_and_sums() {
        let a = PointResult::new(true, Duration::from_millis(1.0));
        let b = PointResult::new(false, Duration::from_millis(2.0));
        let c = PointResult::combine(&a, &b);
        assert!(!c.success);
        assert_eq!(c.latency, Duration::from_millis(3.0));
    }

    #[test]
    fn ranged_overlap_zero_on_mismatched_success() {
        let a = RangedResult::new(true, Duration::ZERO, Duration::from_millis(1.0), Duration::from_millis(2.0));
        let b = RangedResult::new(false, Duration::ZERO, Duration::from_millis(1.0), Duration::from_millis(2.0));
        assert_eq!(a.overlap(&b), 0.0);
    }

    #[test]
    fn ranged_overlap_full_for_identical_ranges() {
        let a = RangedResult::new(true, Duration::from_millis(1.0), Duration::from_millis(2.0), Duration::from_millis(3.0));
        assert_eq!(a.overlap(&a), 1.0);
    }

    #[test]
    fn ranged_combine_preserves_order_invariant() {
        let a = RangedResult::new(true, Duration::from_millis(1.0), Duration::from_millis(2.0), Duration::from_millis(3.0));
        let b = RangedResult::new(true, Duration::from_millis(4.0), Duration::from_millis(5.0), Duration::from_millis(6.0));
        let c = RangedResult::combine(&a, &b);
        assert!(c.min.as_secs() <= c.mode.as_secs());
        assert!(c.mode.as_secs() <= c.max.as_secs());
    }
}
