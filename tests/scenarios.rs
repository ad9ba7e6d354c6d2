//! Scenario-level integration tests. Each test exercises a named scenario
//! end to end, crossing module boundaries the way a caller of the crate
//! would rather than reaching into one module's internals.

use simlang::cost::{trim, TrimSettings};
use simlang::distribution::and;
use simlang::duration::Duration;
use simlang::metrics::{availability, mean_latency};
use simlang::outcome::PointResult;
use simlang::parser::Parser;
use simlang::pool::ResourcePool;
use simlang::queueing::{dequeue_wait, mm1_stats, mmc_stats};
use std::rc::Rc;

fn point_combiner() -> Rc<dyn Fn(&PointResult, &PointResult) -> PointResult> {
    Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b))
}

fn dist(entries: &[(f64, bool, f64)]) -> simlang::distribution::Outcomes<PointResult> {
    let mut d = simlang::distribution::Outcomes::empty(point_combiner());
    for (w, s, l) in entries {
        d.add(*w, PointResult::new(*s, Duration::from_millis(*l)));
    }
    d
}

/// Scenario 1: composition totals, then a deep chain of `And` trimmed down
/// to a bounded bucket count without losing availability or mean by more
/// than the validated tolerances.
#[test]
fn composition_totals_and_trim_preserves_availability_and_mean() {
    let a = dist(&[(8.0, true, 1.0), (2.0, false, 10.0)]);
    let b = a.copy();
    let composed = and(&a, &b, |x, y| PointResult::combine(x, y), point_combiner());
    assert_eq!(composed.len(), 4);
    assert!((composed.total_weight() - 100.0).abs() < 1e-9);

    let mut chain = a.copy();
    for _ in 0..6 {
        chain = and(&chain, &a, |x, y| PointResult::combine(x, y), point_combiner());
    }
    assert_eq!(chain.len(), 2usize.pow(7));

    let before_availability = availability(&chain);
    let before_mean = mean_latency(&chain);

    let trimmed = trim(&chain, TrimSettings { trigger: 100, target: 10 });
    assert!(trimmed.len() <= 10, "trimmed length {} exceeds budget", trimmed.len());

    let after_availability = availability(&trimmed);
    assert!(
        (after_availability - before_availability).abs() < 0.005,
        "availability drifted: {before_availability} -> {after_availability}"
    );
    let after_mean = mean_latency(&trimmed);
    let tolerance = (before_mean.as_secs() * 0.05).max(1e-9);
    assert!(
        (after_mean.as_secs() - before_mean.as_secs()).abs() < tolerance,
        "mean drifted: {before_mean:?} -> {after_mean:?}"
    );
}

/// Scenario 2: M/M/1 wait with lambda=9, mu=10.
#[test]
fn mm1_wait_matches_closed_form_and_bucketed_distribution() {
    let stats = mm1_stats(9.0, 10.0);
    assert!(stats.stable);
    assert!((stats.w_q.as_secs() - 0.9).abs() < 1e-9);

    let waits = dequeue_wait(9.0, 10.0, 1);
    let mean = mean_latency(&waits);
    assert!(mean.as_secs() >= 0.7 && mean.as_secs() <= 1.1, "mean {mean:?} out of [0.7, 1.1]");

    let p99 = simlang::metrics::percentile_latency(&waits, 0.99);
    assert!(p99.as_secs() > mean.as_secs(), "P99 {p99:?} should exceed mean {mean:?}");
}

/// Scenario 3: M/M/c wait with lambda=16, mu=10, c=2. Stable, bucketed
/// mean within 20% of the closed-form W_q.
#[test]
fn mmc_wait_is_stable_and_bucketed_mean_tracks_closed_form() {
    let stats = mmc_stats(16.0, 10.0, 2);
    assert!(stats.stable);

    let waits = dequeue_wait(16.0, 10.0, 2);
    let mean = mean_latency(&waits);
    let wq = stats.w_q.as_secs();
    let tolerance = (wq * 0.20).max(1e-9);
    assert!(
        (mean.as_secs() - wq).abs() < tolerance,
        "bucketed mean {mean:?} not within 20% of W_q {wq}"
    );
}

/// Scenario 4: an unstable queue (lambda=12, mu=10, c=1) has no dequeue
/// buckets at all.
#[test]
fn unstable_queue_dequeue_is_empty() {
    let waits = dequeue_wait(12.0, 10.0, 1);
    assert_eq!(waits.len(), 0);
}

/// Scenario 5: a single-resource pool under lambda=9, mu=10. The first
/// acquire with nothing in use succeeds immediately; once the resource is
/// marked acquired, a second acquire queues with a weighted mean close to
/// the closed-form wait.
#[test]
fn resource_pool_queuing_matches_closed_form_wait() {
    let pool = ResourcePool::new(1, 9.0, 10.0);

    let first = pool.acquire();
    assert_eq!(first.len(), 1);
    assert!(first.buckets()[0].value.success);
    assert_eq!(first.buckets()[0].value.latency, Duration::ZERO);

    pool.mark_acquired();
    assert_eq!(pool.used(), 1);

    let second = pool.acquire();
    assert_eq!(second.len(), 5);
    assert!(second.buckets().iter().all(|b| b.value.success));

    let stats = mmc_stats(9.0, 10.0, 1);
    let mean = mean_latency(&second);
    let tolerance = (stats.w_q.as_secs() * 0.30).max(1e-9);
    assert!(
        (mean.as_secs() - stats.w_q.as_secs()).abs() < tolerance,
        "pool wait mean {mean:?} not within 30% of W_q {:?}",
        stats.w_q
    );
}

/// Scenario 6: chaining non-associative comparison operators (`a == b ==
/// c`) is a single reported chain error, not a silent left-fold.
#[test]
fn chained_equality_comparison_is_a_chain_error() {
    let mut p = Parser::new("a == b == c").expect("lexing succeeds");
    let result = p.parse_expr();
    assert!(result.is_err(), "chained `==` must be rejected");
    let err = result.unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("=="),
        "error should name the offending operator, got: {message}"
    );
}

/// Scenario 6b: the same illegal chain still gets caught when a
/// tighter-binding operator sits between the two comparisons in the
/// source (`a < b + c < d`). `+` folds away first, leaving the two `<`s
/// directly nested, unlike a genuinely looser-binding separator such as
/// `&&` which keeps two independent comparisons apart.
#[test]
fn comparison_chain_interleaved_with_arithmetic_is_still_a_chain_error() {
    let mut p = Parser::new("a < b + c < d").expect("lexing succeeds");
    let result = p.parse_expr();
    assert!(result.is_err(), "interleaved `<` chain must be rejected");
}
