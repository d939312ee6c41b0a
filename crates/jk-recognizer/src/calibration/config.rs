//! Calibration configuration.

use jk_models::GpsrCoefficients;
use serde::{Deserialize, Serialize};

/// Configuration for rejection threshold calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Negative and positive scores generated per template
    pub iterations_per_template: usize,
    /// Points dropped from each GPSR variation
    pub gpsr_remove_count: usize,
    /// Spacing variance of the GPSR jittered resample
    pub gpsr_variance: f64,
    /// Dimension of the spheres simulated by the threshold adjustment
    pub adjustment_dimension: usize,
    /// Monte-Carlo trials per adjustment scale
    pub adjustment_trials: usize,
    /// Window draws per splice before giving up
    pub max_window_attempts: usize,
    /// Rejection-sampling draws per sphere point before giving up
    pub max_sphere_attempts: usize,
    /// Regression choosing the GPSR point count
    pub gpsr_coefficients: GpsrCoefficients,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            iterations_per_template: 10,
            gpsr_remove_count: 5,
            gpsr_variance: 0.25,
            adjustment_dimension: 6,
            adjustment_trials: 1000,
            max_window_attempts: 1000,
            max_sphere_attempts: 100_000,
            gpsr_coefficients: GpsrCoefficients::default(),
        }
    }
}

impl CalibrationConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            iterations_per_template: std::env::var("JK_CALIBRATION_ITERATIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.iterations_per_template),
            adjustment_trials: std::env::var("JK_ADJUSTMENT_TRIALS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.adjustment_trials),
            adjustment_dimension: std::env::var("JK_ADJUSTMENT_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.adjustment_dimension),
            ..defaults
        }
    }

    /// Builder-style setter for the per-template iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations_per_template = iterations;
        self
    }

    /// Builder-style setter for the adjustment trial count.
    pub fn with_adjustment_trials(mut self, trials: usize) -> Self {
        self.adjustment_trials = trials;
        self
    }

    pub fn with_adjustment_dimension(mut self, dimension: usize) -> Self {
        self.adjustment_dimension = dimension;
        self
    }

    /// Use device-specific GPSR regression coefficients.
    pub fn with_gpsr_coefficients(mut self, coefficients: GpsrCoefficients) -> Self {
        self.gpsr_coefficients = coefficients;
        self
    }
}
