//! Inverted index: looking up a term reads its posting list; the cost of
//! merging/scanning it scales with the list's length.

use super::{cpu_outcome, finalize, seq, CostModel, TrimSettings};
use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::cost::disk::DiskProfile;

#[derive(Debug, Clone, Copy)]
pub struct InvertedIndex {
    pub disk: DiskProfile,
    pub avg_posting_list_len: u64,
    pub per_posting_cost: Duration,
    pub trim: TrimSettings,
}

impl InvertedIndex {
    fn merge_cpu(&self) -> Outcomes<PointResult> {
        let total = Duration::from_secs(self.per_posting_cost.as_secs() * self.avg_posting_list_len as f64);
        cpu_outcome(total, 0.15)
    }

    pub fn find(&self) -> Outcomes<PointResult> {
        let d = seq(&self.disk.read(), &self.merge_cpu());
        finalize(d, self.trim)
    }

    pub fn append_posting(&self) -> Outcomes<PointResult> {
        let d = seq(&cpu_outcome(Duration::from_nanos(100.0), 0.1), &self.disk.write());
        finalize(d, self.trim)
    }
}

impl CostModel for InvertedIndex {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(InvertedIndex::find(self))
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(InvertedIndex::append_posting(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_latency;

    #[test]
    fn longer_posting_lists_cost_more_to_find() {
        let short = InvertedIndex { disk: DiskProfile::Ssd, avg_posting_list_len: 10, per_posting_cost: Duration::from_nanos(20.0), trim: TrimSettings::default() };
        let long = InvertedIndex { disk: DiskProfile::Ssd, avg_posting_list_len: 100_000, per_posting_cost: Duration::from_nanos(20.0), trim: TrimSettings::default() };
        assert!(mean_latency(&long.find()).as_secs() > mean_latency(&short.find()).as_secs());
    }
}
