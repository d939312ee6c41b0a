//! Low-pass filtering of raw trajectories.
//!
//! Sensor jitter inflates path length and turning angle, both of which feed
//! the recognizer's features. A repeated centered moving average removes it
//! before templates are built. Applying the filter `r` times with a window
//! of `2w + 1` approximates a Gaussian low-pass; `cma_passes` picks `r` for a
//! given sample rate and cutoff frequency.

use jk_models::Sample;
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::RecognizerResult;

/// Configuration for trajectory smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Capture rate of the input trajectories (Hz).
    pub sample_rate_hz: f64,
    /// Cutoff frequency of the approximated low-pass filter (Hz).
    pub cutoff_hz: f64,
    /// Neighbors averaged on each side of a point.
    pub half_width: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 30.0,
            cutoff_hz: 3.0,
            half_width: 1,
        }
    }
}

impl SmoothingConfig {
    /// Number of moving-average passes for this configuration.
    pub fn passes(&self) -> usize {
        cma_passes(self.sample_rate_hz, self.cutoff_hz)
    }

    /// Builder-style setter for the sample rate.
    pub fn with_sample_rate(mut self, hz: f64) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    /// Builder-style setter for the cutoff frequency.
    pub fn with_cutoff(mut self, hz: f64) -> Self {
        self.cutoff_hz = hz;
        self
    }
}

/// Passes of a width-3 moving average needed to approximate a Gaussian
/// low-pass with cutoff `cutoff_hz` at sample rate `sample_rate_hz`.
pub fn cma_passes(sample_rate_hz: f64, cutoff_hz: f64) -> usize {
    if !(cutoff_hz > 0.0) || !(sample_rate_hz > 0.0) {
        return 0;
    }
    let m = 1.5 * (sample_rate_hz / (2.0 * std::f64::consts::PI * cutoff_hz)).powi(2);
    m.ceil() as usize
}

/// Apply a centered moving average `passes` times.
///
/// Each point becomes the mean of itself and up to `half_width` neighbors on
/// each side; the window is truncated at the ends so the length is preserved.
pub fn centered_moving_average(points: ArrayView2<'_, f64>, half_width: usize, passes: usize) -> Array2<f64> {
    let mut current = points.to_owned();
    let n = current.nrows();

    for _ in 0..passes {
        let mut next = Array2::zeros(current.raw_dim());
        for i in 0..n {
            let start = i.saturating_sub(half_width);
            let end = (i + half_width + 1).min(n);
            let window = current.slice(ndarray::s![start..end, ..]);
            if let Some(mean) = window.mean_axis(Axis(0)) {
                next.row_mut(i).assign(&mean);
            }
        }
        current = next;
    }

    current
}

/// Return a copy of `sample` with its trajectory smoothed.
pub fn smooth_sample(sample: &Sample, config: &SmoothingConfig) -> RecognizerResult<Sample> {
    let smoothed = centered_moving_average(sample.trajectory(), config.half_width, config.passes());
    Ok(sample.with_trajectory(smoothed)?)
}
