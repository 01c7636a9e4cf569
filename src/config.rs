use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::clusterer::{
    DEFAULT_BANDWIDTH_SAMPLE_CAP, DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_QUANTILE,
};
use crate::error::ReduceError;
use crate::reducer::DEFAULT_BATCH_SIZE;
use crate::sampler::DEFAULT_SAMPLE_CAP;
use crate::selector::DEFAULT_PER_CLUSTER;
use crate::trace::DEFAULT_FEATURE_WIDTH;

/// Every knob of a reduction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Feature slots per trace record (the record carries one more field)
    pub feature_width: usize,
    pub delimiter: char,
    /// Appended to a seed name to find its trace file
    pub trace_suffix: String,
    /// Vectors used to fit the projection
    pub sample_cap: usize,
    /// Vectors projected per batch
    pub batch_size: usize,
    pub bandwidth_quantile: f64,
    pub bandwidth_damping: f64,
    /// Fixed, already damped bandwidth. Skips estimation.
    pub bandwidth: Option<f64>,
    pub bandwidth_sample_cap: Option<usize>,
    pub bin_seeding: bool,
    pub max_iterations: usize,
    pub per_cluster: usize,
    pub prefer_overlap: bool,
    /// RNG seed. A random one is drawn (and logged) when absent.
    pub seed: Option<u64>,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            feature_width: DEFAULT_FEATURE_WIDTH,
            delimiter: ',',
            trace_suffix: String::new(),
            sample_cap: DEFAULT_SAMPLE_CAP,
            batch_size: DEFAULT_BATCH_SIZE,
            bandwidth_quantile: DEFAULT_QUANTILE,
            bandwidth_damping: DEFAULT_DAMPING,
            bandwidth: None,
            bandwidth_sample_cap: Some(DEFAULT_BANDWIDTH_SAMPLE_CAP),
            bin_seeding: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            per_cluster: DEFAULT_PER_CLUSTER,
            prefer_overlap: true,
            seed: None,
        }
    }
}

impl ReduceConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .context(format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .context(format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReduceError> {
        let invalid = |msg: String| Err(ReduceError::InvalidConfig(msg));

        if self.feature_width == 0 {
            return invalid("feature_width must be positive".into());
        }
        if self.sample_cap < 2 {
            return invalid(format!("sample_cap must be at least 2, got {}", self.sample_cap));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be positive".into());
        }
        if !(self.bandwidth_quantile > 0.0 && self.bandwidth_quantile <= 1.0) {
            return invalid(format!(
                "bandwidth_quantile must be in (0, 1], got {}",
                self.bandwidth_quantile
            ));
        }
        if !(self.bandwidth_damping.is_finite() && self.bandwidth_damping > 0.0) {
            return invalid(format!(
                "bandwidth_damping must be positive, got {}",
                self.bandwidth_damping
            ));
        }
        if let Some(b) = self.bandwidth {
            if !(b.is_finite() && b > 0.0) {
                return invalid(format!("bandwidth must be positive, got {}", b));
            }
        }
        if self.bandwidth_sample_cap.is_some_and(|cap| cap < 2) {
            return invalid("bandwidth_sample_cap must be at least 2".into());
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be positive".into());
        }
        if self.per_cluster == 0 {
            return invalid("per_cluster must be positive".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReduceConfig::default();
        assert_eq!(config.feature_width, 65536);
        assert_eq!(config.sample_cap, 500);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.bandwidth_quantile, 0.2);
        assert_eq!(config.bandwidth_damping, 2.5);
        assert_eq!(config.per_cluster, 1);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ReduceConfig =
            serde_json::from_str(r#"{ "feature_width": 128, "seed": 7, "delimiter": ";" }"#).unwrap();
        assert_eq!(config.feature_width, 128);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "per_cluster": 3, "prefer_overlap": false }"#).unwrap();

        let config = ReduceConfig::from_json_file(&path).unwrap();
        assert_eq!(config.per_cluster, 3);
        assert!(!config.prefer_overlap);

        assert!(ReduceConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            ReduceConfig { feature_width: 0, ..Default::default() },
            ReduceConfig { sample_cap: 1, ..Default::default() },
            ReduceConfig { batch_size: 0, ..Default::default() },
            ReduceConfig { bandwidth_quantile: 0.0, ..Default::default() },
            ReduceConfig { bandwidth_quantile: 1.5, ..Default::default() },
            ReduceConfig { bandwidth_damping: 0.0, ..Default::default() },
            ReduceConfig { bandwidth: Some(-1.0), ..Default::default() },
            ReduceConfig { bandwidth_sample_cap: Some(1), ..Default::default() },
            ReduceConfig { max_iterations: 0, ..Default::default() },
            ReduceConfig { per_cluster: 0, ..Default::default() },
        ];

        for config in bad {
            assert!(matches!(config.validate(), Err(ReduceError::InvalidConfig(_))));
        }
    }
}
