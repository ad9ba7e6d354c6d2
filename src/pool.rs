//! The resource-pool abstraction built on M/M/c.

use crate::distribution::{Combiner, Outcomes};
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::queueing::mmc_stats;
use std::rc::Rc;
use std::sync::Mutex;

fn point_combiner() -> Combiner<PointResult> {
    Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b))
}

const ONE_DAY_SECS: f64 = 86_400.0;
const WAIT_PERCENTILES: [f64; 5] = [0.10, 0.30, 0.50, 0.70, 0.90];

/// A pool of `size` identical resources, modelled as M/M/c with
/// `(lambda, avg hold time 1/mu)`. `used` is mutable under a mutex.
pub struct ResourcePool {
    pub size: usize,
    pub lambda: f64,
    pub mu: f64,
    used: Mutex<usize>,
}

impl ResourcePool {
    pub fn new(size: usize, lambda: f64, mu: f64) -> ResourcePool {
        ResourcePool {
            size,
            lambda,
            mu,
            used: Mutex::new(0),
        }
    }

    pub fn used(&self) -> usize {
        *self.used.lock().expect("resource pool mutex poisoned")
    }

    /// Does not mutate `used` — the caller is responsible for book-keeping.
    pub fn acquire(&self) -> Outcomes<PointResult> {
        let used = self.used();
        if used < self.size {
            return Outcomes::single(1.0, PointResult::new(true, Duration::ZERO), point_combiner());
        }

        let stats = mmc_stats(self.lambda, self.mu, self.size);
        if !stats.stable || stats.w_q.as_secs() > ONE_DAY_SECS {
            tracing::warn!(target: "pool", size = self.size, rho = stats.rho, "acquire rejected, queue unstable or wait unbounded");
            return Outcomes::single(1.0, PointResult::new(false, Duration::ZERO), point_combiner());
        }
        if stats.w_q.as_secs() < 1e-9 {
            return Outcomes::single(1.0, PointResult::new(true, Duration::ZERO), point_combiner());
        }

        let mut d = Outcomes::empty(point_combiner());
        for p in WAIT_PERCENTILES {
            let latency = -stats.w_q.as_secs() * (1.0 - p).ln();
            d.add(0.2, PointResult::new(true, Duration::from_secs(latency)));
        }
        d
    }

    /// Decrements under the lock, clamped at zero.
    pub fn release(&self) {
        let mut used = self.used.lock().expect("resource pool mutex poisoned");
        *used = used.saturating_sub(1);
    }

    pub fn mark_acquired(&self) {
        let mut used = self.used.lock().expect("resource pool mutex poisoned");
        *used += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_latency;
    use crate::queueing::mmc_stats;

    #[test]
    fn free_slot_is_instant_success() {
        let pool = ResourcePool::new(2, 9.0, 10.0);
        let d = pool.acquire();
        assert_eq!(d.len(), 1);
        assert_eq!(d.buckets()[0].value.latency, Duration::ZERO);
        assert!(d.buckets()[0].value.success);
    }

    #[test]
    fn full_pool_queues_with_five_buckets_near_w_q() {
        let pool = ResourcePool::new(1, 9.0, 10.0);
        pool.mark_acquired();
        assert_eq!(pool.used(), 1);

        let d = pool.acquire();
        assert_eq!(d.len(), 5);
        assert!(d.buckets().iter().all(|b| b.value.success));

        let stats = mmc_stats(9.0, 10.0, 1);
        let mean = mean_latency(&d);
        let rel = (mean.as_secs() - stats.w_q.as_secs()).abs() / stats.w_q.as_secs().max(1e-9);
        assert!(rel < 0.3, "mean={} w_q={}", mean.as_secs(), stats.w_q.as_secs());
    }

    #[test]
    fn unstable_pool_rejects() {
        let pool = ResourcePool::new(1, 12.0, 10.0);
        pool.mark_acquired();
        let d = pool.acquire();
        assert_eq!(d.len(), 1);
        assert!(!d.buckets()[0].value.success);
    }

    #[test]
    fn release_clamps_at_zero() {
        let pool = ResourcePool::new(1, 1.0, 10.0);
        pool.release();
        assert_eq!(pool.used(), 0);
    }
}
