//! Sorted file: binary search over pages. `find` pays `log2(num_pages)`
//! comparisons and reads; `insert`/`delete` additionally pay a rewrite of
//! the tail of the file.

use super::{cpu_outcome, finalize, seq, CostModel, TrimSettings};
use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::cost::disk::DiskProfile;

#[derive(Debug, Clone, Copy)]
pub struct SortedFile {
    pub disk: DiskProfile,
    pub num_pages: u32,
    pub trim: TrimSettings,
}

impl SortedFile {
    fn search_depth(&self) -> u32 {
        (32 - self.num_pages.max(1).leading_zeros()).max(1)
    }

    fn compare_cpu(&self) -> Outcomes<PointResult> {
        cpu_outcome(Duration::from_micros(1.0), 0.2)
    }

    fn binary_search(&self) -> Outcomes<PointResult> {
        let mut acc = seq(&self.compare_cpu(), &self.disk.read());
        for _ in 1..self.search_depth() {
            acc = seq(&acc, &seq(&self.compare_cpu(), &self.disk.read()));
            acc = super::trim(&acc, self.trim);
        }
        acc
    }

    fn rewrite_cost(&self) -> Outcomes<PointResult> {
        // Average half the file shifts on an insert/delete.
        let pages = (self.num_pages / 2).max(1);
        let mut acc = self.disk.write();
        for _ in 1..pages.min(8) {
            acc = seq(&acc, &self.disk.write());
            acc = super::trim(&acc, self.trim);
        }
        acc
    }

    pub fn find(&self) -> Outcomes<PointResult> {
        finalize(self.binary_search(), self.trim)
    }

    pub fn insert(&self) -> Outcomes<PointResult> {
        let d = seq(&self.binary_search(), &self.rewrite_cost());
        finalize(d, self.trim)
    }

    pub fn delete(&self) -> Outcomes<PointResult> {
        self.insert()
    }
}

impl CostModel for SortedFile {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(SortedFile::find(self))
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(SortedFile::insert(self))
    }
    fn delete(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(SortedFile::delete(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_latency;

    #[test]
    fn find_scales_logarithmically() {
        let small = SortedFile { disk: DiskProfile::Ssd, num_pages: 16, trim: TrimSettings::default() };
        let big = SortedFile { disk: DiskProfile::Ssd, num_pages: 16_000_000, trim: TrimSettings::default() };
        assert!(mean_latency(&big.find()).as_secs() > mean_latency(&small.find()).as_secs());
        // Logarithmic growth, not linear: 10^6 x more pages should cost
        // far less than 10^6 x more time.
        let ratio = mean_latency(&big.find()).as_secs() / mean_latency(&small.find()).as_secs();
        assert!(ratio < 10.0);
    }
}
