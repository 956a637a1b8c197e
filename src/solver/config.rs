use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits and tolerances shared by both solving strategies.
///
/// Serialized with the deadline in milliseconds:
///
/// ```
/// # use clmm_zap_math::SolverConfig;
/// let config: SolverConfig = serde_json::from_str(r#"{"max_iterations": 64}"#).unwrap();
/// assert_eq!(config.max_iterations, 64);
/// assert_eq!(config.max_duration_ms, 30_000);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Hard cap on oracle round-trips per solve.
    pub max_iterations: u32,
    /// Wall-clock deadline per solve.
    pub max_duration_ms: u64,
    /// Relative distance to the target that counts as converged.
    pub relative_tolerance: f64,
    /// Relative change of the required ratio between iterations below which
    /// the ratio solver stops as stalled.
    pub stall_tolerance: f64,
    /// Bracket width, in raw input units, at which bisection stops.
    pub amount_resolution: u64,
}

impl SolverConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration_ms = max_duration.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn with_relative_tolerance(mut self, relative_tolerance: f64) -> Self {
        self.relative_tolerance = relative_tolerance;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 256,
            max_duration_ms: 30_000,
            relative_tolerance: 1e-9,
            stall_tolerance: 1e-12,
            amount_resolution: 1,
        }
    }
}
