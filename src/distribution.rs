//! The probabilistic outcome algebra: a weighted finite
//! distribution over T, plus the composition operators that keep the rest
//! of the engine honest. Distributions are treated as immutable values —
//! every transformation below returns a fresh `Outcomes<T>`.

use crate::rng::Rng01;
use std::rc::Rc;

/// A `(weight, value)` pair. Weight is unnormalised; order is not
/// semantically meaningful except where a specific reducer documents
/// sortedness as a precondition.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<T> {
    pub weight: f64,
    pub value: T,
}

impl<T> Bucket<T> {
    pub fn new(weight: f64, value: T) -> Bucket<T> {
        debug_assert!(weight >= 0.0 && weight.is_finite());
        Bucket { weight, value }
    }
}

/// A pure binary function merging two values of the same type, used by
/// `And`. Combiners are set at construction and propagate through
/// composition.
pub type Combiner<T> = Rc<dyn Fn(&T, &T) -> T>;

/// A distribution over T: an ordered sequence of buckets plus a
/// T-specific combiner.
pub struct Outcomes<T> {
    buckets: Vec<Bucket<T>>,
    combiner: Option<Combiner<T>>,
}

impl<T: Clone> Clone for Outcomes<T> {
    fn clone(&self) -> Self {
        Outcomes {
            buckets: self.buckets.clone(),
            combiner: self.combiner.clone(),
        }
    }
}

impl<T> Outcomes<T> {
    /// An empty distribution ("no outcome"): zero total weight.
    pub fn empty(combiner: Combiner<T>) -> Outcomes<T> {
        Outcomes {
            buckets: Vec::new(),
            combiner: Some(combiner),
        }
    }

    /// An empty distribution with no combiner yet; one will be inherited
    /// the first time it is appended to, or must be supplied before `And`.
    pub fn empty_uncombined() -> Outcomes<T> {
        Outcomes {
            buckets: Vec::new(),
            combiner: None,
        }
    }

    pub fn single(weight: f64, value: T, combiner: Combiner<T>) -> Outcomes<T> {
        let mut d = Outcomes::empty(combiner);
        d.add(weight, value);
        d
    }

    pub fn from_buckets(buckets: Vec<Bucket<T>>, combiner: Combiner<T>) -> Outcomes<T> {
        Outcomes {
            buckets,
            combiner: Some(combiner),
        }
    }

    pub fn buckets(&self) -> &[Bucket<T>] {
        &self.buckets
    }

    pub fn buckets_mut(&mut self) -> &mut Vec<Bucket<T>> {
        &mut self.buckets
    }

    pub fn into_buckets(self) -> Vec<Bucket<T>> {
        self.buckets
    }

    pub fn combiner(&self) -> Option<Combiner<T>> {
        self.combiner.clone()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Append a bucket, fluent. Precondition: `weight >= 0`.
    pub fn add(&mut self, weight: f64, value: T) -> &mut Self {
        debug_assert!(weight >= 0.0 && weight.is_finite(), "weight must be finite and non-negative");
        self.buckets.push(Bucket::new(weight, value));
        self
    }

    /// Sum of bucket weights.
    pub fn total_weight(&self) -> f64 {
        self.buckets.iter().map(|b| b.weight).sum()
    }

    /// The unique value, iff exactly one bucket.
    pub fn get_value(&self) -> Option<&T> {
        if self.buckets.len() == 1 {
            Some(&self.buckets[0].value)
        } else {
            None
        }
    }
}

impl<T: Clone> Outcomes<T> {
    /// Deep copy of buckets; combiner is shared (it is pure).
    pub fn copy(&self) -> Outcomes<T> {
        self.clone()
    }

    /// Concatenation of bucket lists. Left operand's combiner wins; if left
    /// is empty of a combiner, inherit the right's.
    pub fn append(mut self, mut other: Outcomes<T>) -> Outcomes<T> {
        let combiner = self.combiner.clone().or_else(|| other.combiner.clone());
        self.buckets.append(&mut other.buckets);
        Outcomes {
            buckets: self.buckets,
            combiner,
        }
    }

    /// Partition buckets by a predicate on value into `(matching,
    /// non_matching)`, each carrying the same combiner.
    pub fn split(&self, pred: impl Fn(&T) -> bool) -> (Outcomes<T>, Outcomes<T>) {
        let mut yes = Vec::new();
        let mut no = Vec::new();
        for b in &self.buckets {
            if pred(&b.value) {
                yes.push(b.clone());
            } else {
                no.push(b.clone());
            }
        }
        (
            Outcomes { buckets: yes, combiner: self.combiner.clone() },
            Outcomes { buckets: no, combiner: self.combiner.clone() },
        )
    }

    /// Produce a new distribution whose buckets carry `f(value)`. Weights
    /// are unchanged; the combiner is supplied by the caller (typically the
    /// target type's).
    pub fn map<U>(&self, f: impl Fn(&T) -> U, combiner: Combiner<U>) -> Outcomes<U> {
        let buckets = self
            .buckets
            .iter()
            .map(|b| Bucket::new(b.weight, f(&b.value)))
            .collect();
        Outcomes { buckets, combiner: Some(combiner) }
    }

    /// Draw one value with probability proportional to weight. `ok = false`
    /// iff nil/empty/zero-weight.
    pub fn sample(&self, rng: &mut dyn Rng01) -> (Option<T>, bool) {
        let total = self.total_weight();
        if total <= 0.0 || self.buckets.is_empty() {
            return (None, false);
        }
        let mut target = rng.next_f64() * total;
        for b in &self.buckets {
            if target < b.weight {
                return (Some(b.value.clone()), true);
            }
            target -= b.weight;
        }
        // Floating-point rounding at the tail: fall back to the last bucket.
        (self.buckets.last().map(|b| b.value.clone()), true)
    }
}

/// Sequential composition: the Cartesian product of buckets. For every
/// pair `(w_i, v_i)` in `a` and `(w_j, u_j)` in `b`, emits
/// `(w_i * w_j, combine(v_i, u_j))`.
///
/// Associative up to reduction; the primary source of combinatorial
/// explosion in a naive pipeline (`n`-bucket distributions composed `k`
/// times yield up to `n^(k+1)` buckets), which is why production pipelines
/// trim after every `And`.
pub fn and<A, B, C>(
    a: &Outcomes<A>,
    b: &Outcomes<B>,
    combine: impl Fn(&A, &B) -> C,
    result_combiner: Combiner<C>,
) -> Outcomes<C> {
    let mut buckets = Vec::with_capacity(a.len() * b.len());
    for ba in &a.buckets {
        for bb in &b.buckets {
            buckets.push(Bucket::new(ba.weight * bb.weight, combine(&ba.value, &bb.value)));
        }
    }
    Outcomes { buckets, combiner: Some(result_combiner) }
}

/// Conditional composition: for each bucket of `cond`, multiply its weight
/// into either `then_dist` or `else_dist` (selected by `discriminate`) and
/// combine values via `combine`. Equivalent to
/// `And(cond.map(indicator), select(then/else))` but never materialises the
/// excluded branch for a given `cond` bucket.
pub fn if_<Cnd, A, C>(
    cond: &Outcomes<Cnd>,
    then_dist: &Outcomes<A>,
    else_dist: &Outcomes<A>,
    discriminate: impl Fn(&Cnd) -> bool,
    combine: impl Fn(&Cnd, &A) -> C,
    result_combiner: Combiner<C>,
) -> Outcomes<C> {
    let mut buckets = Vec::new();
    for bc in &cond.buckets {
        let branch = if discriminate(&bc.value) { &then_dist.buckets } else { &else_dist.buckets };
        for bb in branch {
            buckets.push(Bucket::new(bc.weight * bb.weight, combine(&bc.value, &bb.value)));
        }
    }
    Outcomes { buckets, combiner: Some(result_combiner) }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::duration::Duration;
    use crate::outcome::PointResult;
    use proptest::prelude::*;

    fn point_combiner() -> Combiner<PointResult> {
        Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b))
    }

    fn dist_from(entries: &[(f64, bool, f64)]) -> Outcomes<PointResult> {
        let mut d = Outcomes::empty(point_combiner());
        for (w, s, l) in entries {
            d.add(*w, PointResult::new(*s, Duration::from_millis(*l)));
        }
        d
    }

    proptest! {
        #[test]
        fn prop_and_total_weight_multiplies(
            a in prop::collection::vec((0.01f64..50.0, any::<bool>(), 0.0f64..1000.0), 1..8),
            b in prop::collection::vec((0.01f64..50.0, any::<bool>(), 0.0f64..1000.0), 1..8),
        ) {
            let da = dist_from(&a);
            let db = dist_from(&b);
            let result = and(&da, &db, |x, y| PointResult::combine(x, y), point_combiner());
            let expected = da.total_weight() * db.total_weight();
            prop_assert!((result.total_weight() - expected).abs() < 1e-6 * expected.max(1.0));
        }

        #[test]
        fn prop_copy_then_compose_equals_compose(
            a in prop::collection::vec((0.01f64..50.0, any::<bool>(), 0.0f64..1000.0), 1..6),
            b in prop::collection::vec((0.01f64..50.0, any::<bool>(), 0.0f64..1000.0), 1..6),
        ) {
            let da = dist_from(&a);
            let db = dist_from(&b);
            let direct = and(&da, &db, |x, y| PointResult::combine(x, y), point_combiner());
            let via_copy = and(&da.copy(), &db, |x, y| PointResult::combine(x, y), point_combiner());
            prop_assert_eq!(direct.len(), via_copy.len());
            for (d, v) in direct.buckets().iter().zip(via_copy.buckets().iter()) {
                prop_assert_eq!(d.value, v.value);
                prop_assert!((d.weight - v.weight).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_split_then_append_is_identity(
            entries in prop::collection::vec((0.01f64..50.0, any::<bool>(), 0.0f64..1000.0), 0..10),
        ) {
            let d = dist_from(&entries);
            let (yes, no) = d.split(|v| v.success);
            let merged = yes.append(no);
            prop_assert_eq!(merged.len(), d.len());
            prop_assert!((merged.total_weight() - d.total_weight()).abs() < 1e-9);
        }
    }
}
