//! Match-ready representation of a trajectory.
//!
//! A [`Template`] holds the resampled points of one exemplar together with
//! the features the recognizer compares:
//!
//! - **Direction vectors**: unit vectors between consecutive points, the
//!   input to DTW
//! - **Shape signature**: normalized per-axis absolute coordinate sums
//! - **Size signature**: normalized bounding-box diagonal
//!
//! The two signatures are cheap to compare and scale the DTW score up when
//! the overall proportions of candidate and template disagree.

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::RecognizerResult;
use crate::geometry::{normalize_or_zero, shape_signature, size_signature};
use crate::resample::resample;

/// Resampled exemplar with precomputed matching features.
#[derive(Debug, Clone)]
pub struct Template {
    gesture: String,
    points: Array2<f64>,
    vectors: Array2<f64>,
    shape: Array1<f64>,
    size: Array1<f64>,
}

impl Template {
    /// Build a template by resampling `trajectory` to `n` points.
    pub fn build(gesture: impl Into<String>, trajectory: ArrayView2<'_, f64>, n: usize) -> RecognizerResult<Self> {
        let points = resample(trajectory, n)?;
        let vectors = vectorize(points.view());
        let shape = shape_signature(points.view());
        let size = size_signature(points.view());

        Ok(Self {
            gesture: gesture.into(),
            points,
            vectors,
            shape,
            size,
        })
    }

    /// Gesture class this template was built from.
    pub fn gesture(&self) -> &str {
        &self.gesture
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    /// Unit direction vectors, one fewer than the point count.
    pub fn vectors(&self) -> &Array2<f64> {
        &self.vectors
    }

    pub fn shape(&self) -> &Array1<f64> {
        &self.shape
    }

    pub fn size(&self) -> &Array1<f64> {
        &self.size
    }

    pub fn dimension(&self) -> usize {
        self.points.ncols()
    }

    /// Penalty for disagreeing proportions: `1 / max(0.01, shape·shape')`
    /// times `1 / max(0.01, size·size')`.
    pub fn correction_factor(&self, other: &Template) -> f64 {
        let shape_dot = self.shape.dot(&other.shape);
        let size_dot = self.size.dot(&other.size);
        (1.0 / shape_dot.max(0.01)) * (1.0 / size_dot.max(0.01))
    }
}

/// Convert points to unit direction vectors between consecutive points.
///
/// A zero-length step stays the zero vector, so it contributes a constant
/// cost of 1 to every DTW cell it touches instead of a NaN.
pub fn vectorize(points: ArrayView2<'_, f64>) -> Array2<f64> {
    let count = points.nrows().saturating_sub(1);
    let mut vectors = Array2::zeros((count, points.ncols()));
    for i in 0..count {
        let delta = &points.row(i + 1) - &points.row(i);
        vectors.row_mut(i).assign(&normalize_or_zero(delta));
    }
    vectors
}
