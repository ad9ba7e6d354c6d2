//! Bitmap index: a boolean-vector scan whose CPU cost scales with the
//! bitmap's size in words.

use super::{cpu_outcome, finalize, seq, CostModel, TrimSettings};
use crate::distribution::Outcomes;
use crate::duration::Duration;
use crate::outcome::PointResult;
use crate::cost::disk::DiskProfile;

#[derive(Debug, Clone, Copy)]
pub struct BitmapIndex {
    pub disk: DiskProfile,
    pub num_words: u64,
    pub per_word_cost: Duration,
    pub trim: TrimSettings,
}

impl BitmapIndex {
    fn scan_cpu(&self) -> Outcomes<PointResult> {
        let total = Duration::from_secs(self.per_word_cost.as_secs() * self.num_words as f64);
        cpu_outcome(total, 0.1)
    }

    pub fn find(&self) -> Outcomes<PointResult> {
        let d = seq(&self.scan_cpu(), &self.disk.read());
        finalize(d, self.trim)
    }

    pub fn set_bit(&self) -> Outcomes<PointResult> {
        let d = seq(&cpu_outcome(Duration::from_nanos(50.0), 0.1), &self.disk.write());
        finalize(d, self.trim)
    }
}

impl CostModel for BitmapIndex {
    fn find(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(BitmapIndex::find(self))
    }
    fn insert(&self, _key_hint: u64) -> Option<Outcomes<PointResult>> {
        Some(BitmapIndex::set_bit(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_latency;

    #[test]
    fn cost_scales_with_bitmap_size() {
        let small = BitmapIndex { disk: DiskProfile::Ssd, num_words: 1_000, per_word_cost: Duration::from_nanos(5.0), trim: TrimSettings::default() };
        let big = BitmapIndex { disk: DiskProfile::Ssd, num_words: 1_000_000, per_word_cost: Duration::from_nanos(5.0), trim: TrimSettings::default() };
        assert!(mean_latency(&big.find()).as_secs() > mean_latency(&small.find()).as_secs());
    }
}
