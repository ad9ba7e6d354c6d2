//! Hash index: find/insert/delete with resize.

use super::{branch, cpu_outcome, finalize, seq, CostModel, TrimSettings};
use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::cost::disk::DiskProfile;

#[derive(Debug, Clone, Copy)]
pub struct HashIndex {
    pub disk: DiskProfile,
    pub num_records: u64,
    pub record_size: u64,
    pub page_size: u64,
    pub num_pages: u64,
    /// Average number of overflow-chain reads paid on a collision.
    pub avg_overflow_reads: f64,
    /// Load factor above which resize probability starts ramping up.
    pub resize_threshold: f64,
    pub resize_cost_factor: f64,
    pub trim: TrimSettings,
}

impl HashIndex {
    /// Heuristic: records vs. page capacity. Approximate by design — kept
    /// behind this clearly named method rather than "fixed" to something
    /// more exact.
    pub fn current_load_factor_heuristic(&self) -> f64 {
        if self.page_size == 0 || self.num_pages == 0 {
            return 0.0;
        }
        let capacity = (self.page_size / self.record_size.max(1)) * self.num_pages;
        if capacity == 0 {
            return 0.0;
        }
        (self.num_records as f64 / capacity as f64).min(1.0)
    }

    fn p_collision(&self) -> f64 {
        let load = self.current_load_factor_heuristic();
        (load * load * self.avg_overflow_reads).min(1.0)
    }

    fn p_resize(&self) -> f64 {
        let load = self.current_load_factor_heuristic();
        if load < self.resize_threshold {
            0.0
        } else {
            let span = (1.0 - self.resize_threshold).max(1e-9);
            (0.1 * (load - self.resize_threshold) / span).min(0.1)
        }
    }

    fn hash_cpu(&self) -> Outcomes<PointResult> {
        cpu_outcome(Duration::from_micros(2.0), 0.3)
    }

    fn modify_cpu(&self) -> Outcomes<PointResult> {
        cpu_outcome(Duration::from_micros(3.0), 0.3)
    }

    fn overflow_read_cost(&self) -> Outcomes<PointResult> {
        let mut acc = self.disk.read();
        let extra = (self.avg_overflow_reads.max(1.0) - 1.0).round() as usize;
        for _ in 0..extra {
            acc = seq(&acc, &self.disk.read());
        }
        acc
    }

    fn resize_cost(&self) -> Outcomes<PointResult> {
        let work = (self.num_pages as f64 * self.resize_cost_factor).max(1.0);
        cpu_outcome(Duration::from_micros(work), 0.4)
    }

    pub fn find(&self) -> Outcomes<PointResult> {
        let base = seq(&self.hash_cpu(), &self.disk.read());
        let with_overflow = seq(&base, &self.overflow_read_cost());
        let d = branch(self.p_collision(), &with_overflow, &base);
        finalize(d, self.trim)
    }

    pub fn insert(&self) -> Outcomes<PointResult> {
        let find_read = seq(&self.hash_cpu(), &self.disk.read());
        let base = seq(&seq(&find_read, &self.modify_cpu()), &self.disk.write());
        let with_resize = seq(&base, &self.resize_cost());
        let d = branch(self.p_resize(), &with_resize, &base);
        finalize(d, self.trim)
    }

    pub fn delete(&self) -> Outcomes<PointResult> {
        let d = seq(&seq(&self.find(), &self.modify_cpu()), &self.disk.write());
        finalize(d, self.trim)
    }
}

impl CostModel for HashIndex {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(HashIndex::find(self))
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(HashIndex::insert(self))
    }
    fn delete(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(HashIndex::delete(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::availability;

    fn idx(load_records: u64) -> HashIndex {
        HashIndex {
            disk: DiskProfile::Ssd,
            num_records: load_records,
            record_size: 64,
            page_size: 4096,
            num_pages: 256,
            avg_overflow_reads: 1.5,
            resize_threshold: 0.7,
            resize_cost_factor: 0.01,
            trim: TrimSettings::default(),
        }
    }

    #[test]
    fn load_factor_heuristic_bounded() {
        let i = idx(1_000_000);
        assert!(i.current_load_factor_heuristic() <= 1.0);
    }

    #[test]
    fn find_is_mostly_available() {
        let i = idx(1000);
        let d = i.find();
        assert!(availability(&d) > 0.9);
    }

    #[test]
    fn higher_load_increases_collision_and_resize_probability() {
        let low = idx(100);
        let high = idx(100_000);
        assert!(high.p_collision() >= low.p_collision());
        assert!(high.p_resize() >= low.p_resize());
    }

    #[test]
    fn find_and_insert_stay_within_trim_target() {
        let i = idx(50_000);
        assert!(i.find().len() <= i.trim.target + 4);
        assert!(i.insert().len() <= i.trim.target + 4);
    }
}
