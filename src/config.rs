//! Engine-wide configuration.
//! Bundles the tunables scattered across `reduction`, `queueing`, `pool`,
//! and the storage cost models into one `serde`-deserializable struct, using
//! the same `serde` + `ron` pairing for on-disk config, so a host can ship
//! one `.ron` file instead of wiring each module's defaults by hand.

use crate::cost::TrimSettings;
use crate::reduction::{ADJACENT_MERGE_THRESHOLD, DEFAULT_INTERPOLATION_TARGET, OVERLAP_MERGE_THRESHOLD};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    pub adjacent_merge_threshold: f64,
    pub overlap_merge_threshold: f64,
    pub interpolation_target: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        ReductionConfig {
            adjacent_merge_threshold: ADJACENT_MERGE_THRESHOLD,
            overlap_merge_threshold: OVERLAP_MERGE_THRESHOLD,
            interpolation_target: DEFAULT_INTERPOLATION_TARGET,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueingConfig {
    /// Number of buckets used by `bucketed_wait_distribution`, plus one
    /// implicit tail bucket.
    pub wait_buckets: usize,
}

impl Default for QueueingConfig {
    fn default() -> Self {
        QueueingConfig { wait_buckets: 20 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub default_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig { default_size: 8 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModelConfig {
    pub trim: TrimSettings,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        CostModelConfig { trim: TrimSettings::default() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub reduction: ReductionConfig,
    pub queueing: QueueingConfig,
    pub pool: PoolConfig,
    pub cost_model: CostModelConfig,
}

impl EngineConfig {
    pub fn from_ron_str(s: &str) -> Result<EngineConfig, ron::error::SpannedError> {
        ron::from_str(s)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_ron() {
        let cfg = EngineConfig::default();
        let s = cfg.to_ron_string().unwrap();
        let back = EngineConfig::from_ron_str(&s).unwrap();
        assert_eq!(back.reduction.adjacent_merge_threshold, cfg.reduction.adjacent_merge_threshold);
        assert_eq!(back.pool.default_size, cfg.pool.default_size);
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let cfg: EngineConfig = ron::from_str("(pool: (default_size: 16))").unwrap();
        assert_eq!(cfg.pool.default_size, 16);
        assert_eq!(cfg.queueing.wait_buckets, QueueingConfig::default().wait_buckets);
    }
}
