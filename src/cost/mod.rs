//! Storage/index cost models: parameterised components
//! expressed as compositions over the outcome algebra. Every operation is
//! built from base disk reads/writes, CPU processing outcomes, and
//! probabilistic branches, trimming the intermediate distribution whenever
//! its length exceeds a configured trigger, and ends with a final
//! split-trim-append by success status so failures are preserved as a
//! separate tail rather than smeared into the success distribution.

pub mod bitmap_index;
pub mod btree_index;
pub mod disk;
pub mod hash_index;
pub mod heap_file;
pub mod inverted_index;
pub mod lsm_tree;
pub mod sorted_file;

use crate::distribution::{and, if_, Combiner, Outcomes};
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::reduction::{trim_point, ADJACENT_MERGE_THRESHOLD};
use std::rc::Rc;

fn point_combiner() -> Combiner<PointResult> {
    Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b))
}

/// A small, near-deterministic CPU processing cost: three buckets around
/// `mean` scaled by `jitter` (fraction of `mean`), always successful —
/// CPU-bound steps in these cost models do not themselves fail.
pub fn cpu_outcome(mean: Duration, jitter: f64) -> Outcomes<PointResult> {
    let m = mean.as_secs();
    let mut d = Outcomes::empty(point_combiner());
    d.add(700.0, PointResult::new(true, Duration::from_secs(m * (1.0 - jitter))));
    d.add(250.0, PointResult::new(true, Duration::from_secs(m)));
    d.add(50.0, PointResult::new(true, Duration::from_secs(m * (1.0 + 2.0 * jitter))));
    d
}

/// Sequential AND of two point-result distributions using the shared
/// combiner (success AND, latency sum).
pub fn seq(a: &Outcomes<PointResult>, b: &Outcomes<PointResult>) -> Outcomes<PointResult> {
    and(a, b, |x, y| PointResult::combine(x, y), point_combiner())
}

/// With probability `p`, continue down `if_true`; otherwise `if_false`.
/// Used for collision/resize/compaction branches throughout the cost
/// models.
pub fn branch(p: f64, if_true: &Outcomes<PointResult>, if_false: &Outcomes<PointResult>) -> Outcomes<PointResult> {
    let p = p.clamp(0.0, 1.0);
    let mut cond = Outcomes::empty(Rc::new(|a: &bool, _b: &bool| *a) as Combiner<bool>);
    cond.add(p, true);
    cond.add(1.0 - p, false);
    if_(
        &cond,
        if_true,
        if_false,
        |c: &bool| *c,
        |_c: &bool, v: &PointResult| *v,
        point_combiner(),
    )
}

/// Unifies the named operations across storage/index components so cost
/// models can be composed and tested polymorphically. Not every component
/// implements every method — a B-tree has no `resize`, a bitmap has no
/// `delete` in the sense a hash index does — so each method returns
/// `Option` and components override only the ones they support.
pub trait CostModel {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        None
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        None
    }
    fn delete(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        None
    }
}

/// Trim trigger/target shared by cost-model operations, matching the
/// validated defaults (configurable per component).
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TrimSettings {
    pub trigger: usize,
    pub target: usize,
}

impl Default for TrimSettings {
    fn default() -> Self {
        TrimSettings { trigger: 64, target: 12 }
    }
}

/// Trim after every `And`, as every cost-model operation must.
pub fn trim(d: &Outcomes<PointResult>, settings: TrimSettings) -> Outcomes<PointResult> {
    trim_point(d, settings.trigger, settings.target)
}

/// Final split-trim-append by success status: failures are preserved as a
/// separate tail rather than smeared into the success distribution.
pub fn finalize(d: Outcomes<PointResult>, settings: TrimSettings) -> Outcomes<PointResult> {
    let (success, failure) = d.split(|v| v.success);
    let success = trim_point(&success, settings.trigger, settings.target);
    let failure = crate::reduction::adjacent_merge(&failure, ADJACENT_MERGE_THRESHOLD);
    success.append(failure)
}
