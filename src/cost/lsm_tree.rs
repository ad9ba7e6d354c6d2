//! LSM tree: writes are a cheap memtable insert plus a WAL append, with an
//! occasional flush/compaction tail; reads check the memtable then walk
//! down levels, paying a disk read at each level only on a bloom-filter
//! false positive.

use super::{branch, cpu_outcome, finalize, seq, CostModel, TrimSettings};
use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::cost::disk::DiskProfile;

#[derive(Debug, Clone, Copy)]
pub struct LsmTree {
    pub disk: DiskProfile,
    pub num_levels: u32,
    pub bloom_false_positive_rate: f64,
    pub p_flush_on_write: f64,
    pub trim: TrimSettings,
}

impl LsmTree {
    fn memtable_cpu(&self) -> Outcomes<PointResult> {
        cpu_outcome(Duration::from_micros(1.0), 0.2)
    }

    fn compaction_cost(&self) -> Outcomes<PointResult> {
        let mut acc = self.disk.read();
        for _ in 0..self.num_levels.min(4) {
            acc = seq(&acc, &self.disk.write());
            acc = super::trim(&acc, self.trim);
        }
        acc
    }

    pub fn write(&self) -> Outcomes<PointResult> {
        let base = seq(&self.memtable_cpu(), &self.disk.write());
        let with_flush = seq(&base, &self.compaction_cost());
        let d = branch(self.p_flush_on_write, &with_flush, &base);
        finalize(d, self.trim)
    }

    pub fn read(&self) -> Outcomes<PointResult> {
        let mut acc = self.memtable_cpu();
        for _ in 0..self.num_levels {
            let miss_check = seq(&cpu_outcome(Duration::from_nanos(200.0), 0.1), &self.disk.read());
            let skip = cpu_outcome(Duration::from_nanos(200.0), 0.1);
            acc = seq(&acc, &branch(self.bloom_false_positive_rate, &miss_check, &skip));
            acc = super::trim(&acc, self.trim);
        }
        // The level actually holding the key always costs one real read.
        acc = seq(&acc, &self.disk.read());
        finalize(acc, self.trim)
    }
}

impl CostModel for LsmTree {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(LsmTree::read(self))
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(LsmTree::write(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_latency;

    #[test]
    fn write_cheaper_than_read_for_deep_tree() {
        let lsm = LsmTree {
            disk: DiskProfile::Ssd,
            num_levels: 5,
            bloom_false_positive_rate: 0.01,
            p_flush_on_write: 0.02,
            trim: TrimSettings::default(),
        };
        assert!(mean_latency(&lsm.write()).as_secs() < mean_latency(&lsm.read()).as_secs());
    }
}
