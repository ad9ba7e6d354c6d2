//! Heap file: unsorted page storage. `find` is a (possibly partial) linear
//! scan, `insert` is an append, `delete` is a scan-then-write of a tombstone.

use super::{cpu_outcome, finalize, seq, CostModel, TrimSettings};
use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::cost::disk::DiskProfile;

#[derive(Debug, Clone, Copy)]
pub struct HeapFile {
    pub disk: DiskProfile,
    pub num_pages: u32,
    pub trim: TrimSettings,
}

impl HeapFile {
    fn scan_cpu(&self) -> Outcomes<PointResult> {
        cpu_outcome(Duration::from_micros(1.5), 0.25)
    }

    fn scan_pages(&self, pages: u32) -> Outcomes<PointResult> {
        let mut acc = seq(&self.scan_cpu(), &self.disk.read());
        for _ in 1..pages.max(1) {
            acc = seq(&acc, &seq(&self.scan_cpu(), &self.disk.read()));
            acc = super::trim(&acc, self.trim);
        }
        acc
    }

    pub fn find(&self) -> Outcomes<PointResult> {
        // Expected scan depth to a uniformly-placed record: half the file.
        let expected = (self.num_pages / 2).max(1);
        finalize(self.scan_pages(expected), self.trim)
    }

    pub fn insert(&self) -> Outcomes<PointResult> {
        finalize(seq(&self.scan_cpu(), &self.disk.write()), self.trim)
    }

    pub fn delete(&self) -> Outcomes<PointResult> {
        let d = seq(&self.find(), &self.disk.write());
        finalize(d, self.trim)
    }
}

impl CostModel for HeapFile {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(HeapFile::find(self))
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(HeapFile::insert(self))
    }
    fn delete(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(HeapFile::delete(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_latency;

    #[test]
    fn insert_is_cheap_append() {
        let h = HeapFile { disk: DiskProfile::Ssd, num_pages: 1000, trim: TrimSettings::default() };
        assert!(mean_latency(&h.insert()).as_secs() < mean_latency(&h.find()).as_secs());
    }
}
