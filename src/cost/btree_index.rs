//! B-tree index: find/insert/delete expressed as a branching walk down
//! `height` levels of disk reads, with an occasional node split on insert.

use super::{branch, cpu_outcome, finalize, seq, CostModel, TrimSettings};
use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::cost::disk::DiskProfile;

#[derive(Debug, Clone, Copy)]
pub struct BTreeIndex {
    pub disk: DiskProfile,
    pub height: u32,
    pub p_split_on_insert: f64,
    pub trim: TrimSettings,
}

impl BTreeIndex {
    fn compare_cpu(&self) -> Outcomes<PointResult> {
        cpu_outcome(Duration::from_micros(1.0), 0.2)
    }

    fn walk(&self) -> Outcomes<PointResult> {
        let mut acc = seq(&self.compare_cpu(), &self.disk.read());
        for _ in 1..self.height.max(1) {
            acc = seq(&acc, &seq(&self.compare_cpu(), &self.disk.read()));
            acc = super::trim(&acc, self.trim);
        }
        acc
    }

    fn split_cost(&self) -> Outcomes<PointResult> {
        seq(&cpu_outcome(Duration::from_micros(5.0), 0.3), &self.disk.write())
    }

    pub fn find(&self) -> Outcomes<PointResult> {
        finalize(self.walk(), self.trim)
    }

    pub fn insert(&self) -> Outcomes<PointResult> {
        let base = seq(&self.walk(), &self.disk.write());
        let with_split = seq(&base, &self.split_cost());
        let d = branch(self.p_split_on_insert, &with_split, &base);
        finalize(d, self.trim)
    }

    pub fn delete(&self) -> Outcomes<PointResult> {
        let d = seq(&self.walk(), &self.disk.write());
        finalize(d, self.trim)
    }
}

impl CostModel for BTreeIndex {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(BTreeIndex::find(self))
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(BTreeIndex::insert(self))
    }
    fn delete(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(BTreeIndex::delete(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_latency;

    #[test]
    fn taller_tree_costs_more() {
        let short = BTreeIndex { disk: DiskProfile::Ssd, height: 2, p_split_on_insert: 0.01, trim: TrimSettings::default() };
        let tall = BTreeIndex { disk: DiskProfile::Ssd, height: 6, p_split_on_insert: 0.01, trim: TrimSettings::default() };
        assert!(mean_latency(&tall.find()).as_secs() > mean_latency(&short.find()).as_secs());
    }

    #[test]
    fn insert_costs_at_least_as_much_as_find() {
        let b = BTreeIndex { disk: DiskProfile::Hdd, height: 3, p_split_on_insert: 0.05, trim: TrimSettings::default() };
        assert!(mean_latency(&b.insert()).as_secs() >= mean_latency(&b.find()).as_secs());
    }
}
