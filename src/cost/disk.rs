//! Disk profiles: read/write distributions keyed by medium.

use crate::distribution::{Combiner, Outcomes};
use crate::duration::Duration;
use crate::outcome::PointResult;
use std::rc::Rc;

fn point_combiner() -> Combiner<PointResult> {
    Rc::new(|a: &PointResult, b: &PointResult| PointResult::combine(a, b))
}

/// A storage medium's latency characteristics for read and write, as a
/// fixed weighted histogram over observed outcomes. Real profiles are
/// produced offline from measurement; these are the documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskProfile {
    Ssd,
    Hdd,
}

impl DiskProfile {
    /// SSD: sub-ms majority, tight spread, rare slow tail, two failure
    /// buckets. HDD: several-ms typical, fat long tail, slightly higher
    /// failure.
    pub fn read(&self) -> Outcomes<PointResult> {
        let mut d = Outcomes::empty(point_combiner());
        match self {
            DiskProfile::Ssd => {
                d.add(720.0, PointResult::new(true, Duration::from_micros(80.0)));
                d.add(250.0, PointResult::new(true, Duration::from_micros(150.0)));
                d.add(25.0, PointResult::new(true, Duration::from_micros(500.0)));
                d.add(4.0, PointResult::new(true, Duration::from_millis(5.0)));
                d.add(0.8, PointResult::new(false, Duration::from_micros(100.0)));
                d.add(0.2, PointResult::new(false, Duration::from_millis(10.0)));
            }
            DiskProfile::Hdd => {
                d.add(600.0, PointResult::new(true, Duration::from_millis(4.0)));
                d.add(300.0, PointResult::new(true, Duration::from_millis(8.0)));
                d.add(90.0, PointResult::new(true, Duration::from_millis(20.0)));
                d.add(8.0, PointResult::new(true, Duration::from_millis(80.0)));
                d.add(1.5, PointResult::new(false, Duration::from_millis(2.0)));
                d.add(0.5, PointResult::new(false, Duration::from_millis(50.0)));
            }
        }
        d
    }

    pub fn write(&self) -> Outcomes<PointResult> {
        let mut d = Outcomes::empty(point_combiner());
        match self {
            DiskProfile::Ssd => {
                d.add(700.0, PointResult::new(true, Duration::from_micros(100.0)));
                d.add(260.0, PointResult::new(true, Duration::from_micros(200.0)));
                d.add(30.0, PointResult::new(true, Duration::from_millis(1.0)));
                d.add(4.0, PointResult::new(true, Duration::from_millis(8.0)));
                d.add(0.7, PointResult::new(false, Duration::from_micros(150.0)));
                d.add(0.3, PointResult::new(false, Duration::from_millis(12.0)));
            }
            DiskProfile::Hdd => {
                d.add(580.0, PointResult::new(true, Duration::from_millis(6.0)));
                d.add(310.0, PointResult::new(true, Duration::from_millis(12.0)));
                d.add(95.0, PointResult::new(true, Duration::from_millis(25.0)));
                d.add(10.0, PointResult::new(true, Duration::from_millis(100.0)));
                d.add(2.5, PointResult::new(false, Duration::from_millis(3.0)));
                d.add(0.5, PointResult::new(false, Duration::from_millis(60.0)));
            }
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::availability;

    #[test]
    fn ssd_more_available_and_faster_than_hdd() {
        let ssd = DiskProfile::Ssd.read();
        let hdd = DiskProfile::Hdd.read();
        assert!(availability(&ssd) > availability(&hdd));
        assert!(crate::metrics::mean_latency(&ssd).as_secs() < crate::metrics::mean_latency(&hdd).as_secs());
    }
}
