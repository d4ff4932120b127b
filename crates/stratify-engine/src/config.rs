//! Engine configuration.

use serde::{Deserialize, Serialize};
use stratify_core::error::{Result, StratifyError};

/// Parameters of the k-means fit.
///
/// Loaded from the `[engine]` table of `stratify.toml`; every field has a
/// default so a partial table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of clusters to fit.
    #[serde(default = "default_k")]
    pub k: usize,
    /// Base seed for centroid initialization.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Independent initializations; the lowest-inertia run is kept.
    #[serde(default = "default_n_init")]
    pub n_init: usize,
    /// Cap on Lloyd iterations per initialization.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Convergence threshold on the summed squared centroid shift, relative
    /// to the mean per-feature variance of the known points.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

// Default value functions
fn default_k() -> usize { 2 }
fn default_seed() -> u64 { 42 }
fn default_n_init() -> usize { 10 }
fn default_max_iterations() -> usize { 300 }
fn default_tolerance() -> f64 { 1e-4 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            seed: default_seed(),
            n_init: default_n_init(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl EngineConfig {
    /// Default configuration with `k` clusters.
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(StratifyError::invalid_config("k", "must be at least 1"));
        }
        if self.n_init == 0 {
            return Err(StratifyError::invalid_config("n_init", "must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(StratifyError::invalid_config(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(StratifyError::invalid_config(
                "tolerance",
                format!("must be a finite non-negative number, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_falls_back_to_defaults() {
        let config: EngineConfig = toml::from_str("k = 3").unwrap();
        assert_eq!(config.k, 3);
        assert_eq!(config.seed, 42);
        assert_eq!(config.n_init, 10);
        assert_eq!(config.max_iterations, 300);
    }

    #[test]
    fn zero_k_is_rejected() {
        let err = EngineConfig::with_k(0).validate().unwrap_err();
        assert!(matches!(err, StratifyError::InvalidConfig { ref field, .. } if field == "k"));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let config = EngineConfig {
            tolerance: -1.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
