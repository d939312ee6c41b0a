//! Gesture path stochastic resampling (GPSR).
//!
//! Produces synthetic positives for a training sample: resample the path
//! with jittered spacing, drop a few points at random, and rebuild the
//! trajectory from the unit directions of what remains. The point count is
//! chosen per sample by a regression on path density and turning angle.

use jk_models::GpsrCoefficients;
use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::error::{RecognizerError, RecognizerResult};
use crate::geometry::{extent, norm, normalize_or_zero, path_length};
use crate::resample::{resample, resample_jittered};
use crate::template::vectorize;

/// Resolution used to measure turning angle for [`optimal_n`].
const ANGLE_RESOLUTION: usize = 64;

/// Smallest point count [`optimal_n`] returns.
const MIN_POINTS: usize = 2;

/// Predict the GPSR point count that best preserves a trajectory's shape.
///
/// Density is the original arc length over the bounding-box diagonal of the
/// resampled path. Angle is the total turning between consecutive direction
/// vectors; a pair involving a zero-length step adds nothing.
pub fn optimal_n(trajectory: ArrayView2<'_, f64>, coefficients: &GpsrCoefficients) -> RecognizerResult<usize> {
    let resampled = resample(trajectory, ANGLE_RESOLUTION)?;
    let vectors = vectorize(resampled.view());

    let angle: f64 = vectors
        .outer_iter()
        .zip(vectors.outer_iter().skip(1))
        .filter(|(prev, curr)| norm(*prev) > 0.0 && norm(*curr) > 0.0)
        .map(|(prev, curr)| prev.dot(&curr).clamp(-1.0, 1.0).acos())
        .sum();

    let diagonal = norm(extent(resampled.view()).view());
    let density = path_length(trajectory) / diagonal;

    let predicted = coefficients.predict(density, angle).round();
    if !predicted.is_finite() || predicted < MIN_POINTS as f64 {
        return Ok(MIN_POINTS);
    }
    Ok(predicted as usize)
}

/// Generate one synthetic variation of `points` with `n` points.
///
/// The output starts at the origin and every step has unit length, except
/// where two surviving points coincide; those steps stay zero.
pub fn gpsr<R: Rng + ?Sized>(
    points: ArrayView2<'_, f64>,
    n: usize,
    remove_count: usize,
    variance: f64,
    rng: &mut R,
) -> RecognizerResult<Array2<f64>> {
    if n < MIN_POINTS {
        return Err(RecognizerError::InvalidResampleCount(n));
    }

    let jittered = resample_jittered(points, n + remove_count, variance, rng)?;

    let mut kept: Vec<usize> = (0..jittered.nrows()).collect();
    for _ in 0..remove_count {
        let index = rng.random_range(0..kept.len());
        kept.remove(index);
    }

    let mut synthetic = Array2::zeros((n, jittered.ncols()));
    for i in 1..n {
        let delta = &jittered.row(kept[i]) - &jittered.row(kept[i - 1]);
        let next = &synthetic.row(i - 1) + &normalize_or_zero(delta);
        synthetic.row_mut(i).assign(&next);
    }
    Ok(synthetic)
}
