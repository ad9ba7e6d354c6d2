//! Analytic queueing models: closed-form M/M/1 and M/M/c
//! wait-time means, and a bucketed exponential approximation of the wait
//! distribution.

use crate::distribution::{Bucket, Combiner, Outcomes};
use crate::duration::Duration;
use crate::outcome::PointResult;
use std::rc::Rc;
use std::sync::OnceLock;

const FACTORIAL_TABLE_LEN: usize = 171; // truncated at 170 to avoid IEEE-754 overflow.
const WAIT_BUCKET_COUNT: usize = 20;

fn factorial_table() -> &'static [f64; FACTORIAL_TABLE_LEN] {
    static TABLE: OnceLock<[f64; FACTORIAL_TABLE_LEN]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = [1.0f64; FACTORIAL_TABLE_LEN];
        for i in 1..FACTORIAL_TABLE_LEN {
            t[i] = t[i - 1] * i as f64;
        }
        t
    })
}

fn factorial(n: usize) -> f64 {
    let t = factorial_table();
    t[n.min(FACTORIAL_TABLE_LEN - 1)]
}

fn point_combiner() -> Combiner<PointResult> {
    Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b))
}

/// Steady-state queueing outputs shared by M/M/1 and M/M/c.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueStats {
    pub rho: f64,
    pub stable: bool,
    pub l_q: f64,
    pub w_q: Duration,
}

/// `rho = lambda / (c * mu)`. `rho >= 1` is unstable.
pub fn utilisation(lambda: f64, mu: f64, servers: usize) -> f64 {
    lambda / (servers as f64 * mu)
}

/// M/M/c closed-form `P0` and `L_q`, derived `W_q` via Little's Law
/// (`W_q = L_q / lambda`). Returns `stable = false` (with `w_q` undefined,
/// conventionally zero) when `rho >= 1`.
pub fn mmc_stats(lambda: f64, mu: f64, servers: usize) -> QueueStats {
    let rho = utilisation(lambda, mu, servers);
    if !rho.is_finite() || rho >= 1.0 || lambda <= 0.0 || mu <= 0.0 || servers == 0 {
        return QueueStats { rho, stable: false, l_q: f64::INFINITY, w_q: Duration::ZERO };
    }

    let a = lambda / mu; // offered load
    let c = servers;

    let mut sum = 0.0;
    for k in 0..c {
        sum += a.powi(k as i32) / factorial(k);
    }
    let last_term = a.powi(c as i32) / (factorial(c) * (1.0 - rho));
    let p0 = 1.0 / (sum + last_term);

    let l_q = p0 * a.powi(c as i32) * rho / (factorial(c) * (1.0 - rho).powi(2));
    let w_q = l_q / lambda;

    QueueStats {
        rho,
        stable: true,
        l_q,
        w_q: Duration::from_secs(w_q),
    }
}

/// M/M/1 is M/M/c with `c = 1`.
pub fn mm1_stats(lambda: f64, mu: f64) -> QueueStats {
    mmc_stats(lambda, mu, 1)
}

/// Bucket the wait distribution as an exponential with rate `c*mu -
/// lambda`: 20 equal buckets over `[0, 5*W_q)` plus an open-ended tail.
/// Degenerate cases (`W_q < 1e-12` or an unstable/invalid queue) collapse
/// to a single zero-wait bucket. Renormalised to sum to 1.
pub fn bucketed_wait_distribution(stats: &QueueStats) -> Outcomes<PointResult> {
    if !stats.stable || stats.w_q.as_secs() < 1e-12 {
        tracing::trace!(target: "queueing", rho = stats.rho, "degenerate wait collapses to zero bucket");
        return Outcomes::single(1.0, PointResult::new(true, Duration::ZERO), point_combiner());
    }

    // W_q = L_q/lambda and for an M/M/c queue the wait conditioned on
    // waiting decays with rate `c*mu - lambda`; since only W_q is carried
    // here, use the exponential identity mean == 1/rate.
    let exp_rate = 1.0 / stats.w_q.as_secs();

    let horizon = 5.0 * stats.w_q.as_secs();
    let bucket_width = horizon / WAIT_BUCKET_COUNT as f64;

    let mut buckets = Vec::with_capacity(WAIT_BUCKET_COUNT + 1);
    let mut mass_so_far = 0.0;

    for i in 0..WAIT_BUCKET_COUNT {
        let start = i as f64 * bucket_width;
        let end = start + bucket_width;
        let mass = (-exp_rate * start).exp() - (-exp_rate * end).exp();
        mass_so_far += mass;
        let midpoint = (start + end) / 2.0;
        buckets.push(Bucket::new(mass, PointResult::new(true, Duration::from_secs(midpoint))));
    }

    let tail_mass = (1.0 - mass_so_far).max(0.0);
    let tail_latency = horizon + 1.0 / exp_rate;
    buckets.push(Bucket::new(tail_mass, PointResult::new(true, Duration::from_secs(tail_latency))));

    let total: f64 = buckets.iter().map(|b| b.weight).sum();
    if total > 0.0 {
        for b in &mut buckets {
            b.weight /= total;
        }
    }

    Outcomes::from_buckets(buckets, point_combiner())
}

/// Convenience: empty distribution (zero total weight) signalling an
/// unstable dequeue wait.
pub fn dequeue_wait(lambda: f64, mu: f64, servers: usize) -> Outcomes<PointResult> {
    let stats = mmc_stats(lambda, mu, servers);
    if !stats.stable {
        tracing::warn!(target: "queueing", lambda, mu, servers, rho = stats.rho, "queue unstable, dequeue wait is empty");
        return Outcomes::empty(point_combiner());
    }
    bucketed_wait_distribution(&stats)
}

/// Conservative Erlang-B estimate for the bounded-buffer (M/M/1/K, M/M/c/K)
/// blocking probability. A faithful finite-buffer birth-death derivation is
/// future work — this placeholder is deliberately conservative (it overestimates
/// blocking relative to the true M/M/c/K value) rather than silently wrong.
///
/// TODO: replace with the exact M/M/c/K birth-death recursion; Erlang-B
/// ignores the finite-buffer truncation of the arrival process.
pub fn bounded_blocking_probability(lambda: f64, mu: f64, servers: usize) -> f64 {
    if lambda <= 0.0 || mu <= 0.0 || servers == 0 {
        return 0.0;
    }
    let a = lambda / mu;
    let c = servers;
    let numerator = a.powi(c as i32) / factorial(c);
    let denom: f64 = (0..=c).map(|k| a.powi(k as i32) / factorial(k)).sum();
    if denom <= 0.0 {
        0.0
    } else {
        (numerator / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{mean_latency, percentile_latency};

    #[test]
    fn mm1_matches_closed_form() {
        // lambda=9, mu=10 -> W_q = rho/(mu-lambda) = 0.9/(1) = 0.9s
        let stats = mm1_stats(9.0, 10.0);
        assert!(stats.stable);
        assert!((stats.w_q.as_secs() - 0.9).abs() < 1e-9);

        let dist = bucketed_wait_distribution(&stats);
        let mean = mean_latency(&dist);
        assert!(mean.as_secs() >= 0.7 && mean.as_secs() <= 1.1, "mean={}", mean.as_secs());

        let p99 = percentile_latency(&dist, 0.99);
        assert!(p99.as_secs() > mean.as_secs());
    }

    #[test]
    fn mmc_stable_within_tolerance() {
        // lambda=16, mu=10, c=2
        let stats = mmc_stats(16.0, 10.0, 2);
        assert!(stats.stable);
        let dist = bucketed_wait_distribution(&stats);
        let mean = mean_latency(&dist);
        let rel = (mean.as_secs() - stats.w_q.as_secs()).abs() / stats.w_q.as_secs().max(1e-9);
        assert!(rel < 0.2, "mean={} w_q={}", mean.as_secs(), stats.w_q.as_secs());
    }

    #[test]
    fn unstable_queue_is_empty() {
        // lambda=12, mu=10, c=1 -> rho=1.2 unstable
        let dist = dequeue_wait(12.0, 10.0, 1);
        assert_eq!(dist.total_weight(), 0.0);
        assert!(dist.is_empty());
    }

    #[test]
    fn w_q_monotonic_in_rho() {
        let mu = 10.0;
        let mut prev = 0.0;
        for lambda_tenths in 1..99 {
            let lambda = mu * (lambda_tenths as f64 / 100.0);
            let stats = mm1_stats(lambda, mu);
            assert!(stats.w_q.as_secs() + 1e-12 >= prev);
            prev = stats.w_q.as_secs();
        }
    }

    #[test]
    fn bounded_blocking_probability_in_unit_interval() {
        let p = bounded_blocking_probability(9.0, 10.0, 1);
        assert!((0.0..=1.0).contains(&p));
    }
}
