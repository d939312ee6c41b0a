//! Arc-length resampling of trajectories.
//!
//! Every template and candidate is resampled to a fixed point count before
//! vectorization so that DTW compares sequences of equal length. The
//! jittered variant draws random interval sizes and drives the synthetic
//! positive generator.

use ndarray::{Array1, Array2, ArrayView2};
use rand::Rng;

use crate::error::{RecognizerError, RecognizerResult};
use crate::geometry::{distance, path_length};

/// Resample a polyline to exactly `n` evenly spaced points.
///
/// The first output point equals the first input point. A polyline with zero
/// length (including a single point) yields `n` copies of its first point.
pub fn resample(points: ArrayView2<'_, f64>, n: usize) -> RecognizerResult<Array2<f64>> {
    check_count(n)?;
    let intervals = vec![1.0 / (n - 1) as f64; n - 1];
    resample_with_intervals(points, n, &intervals)
}

/// Resample a polyline to exactly `n` points with randomized spacing.
///
/// Each of the `n - 1` intervals is drawn as `1 + U(0,1) * sqrt(12 * variance)`
/// and the set is renormalized to cover the whole path. A variance of zero
/// gives the same result as [`resample`].
pub fn resample_jittered<R: Rng + ?Sized>(
    points: ArrayView2<'_, f64>,
    n: usize,
    variance: f64,
    rng: &mut R,
) -> RecognizerResult<Array2<f64>> {
    check_count(n)?;
    let scale = (12.0 * variance.max(0.0)).sqrt();
    let mut intervals: Vec<f64> = (0..n - 1).map(|_| 1.0 + rng.random::<f64>() * scale).collect();
    let total: f64 = intervals.iter().sum();
    for interval in &mut intervals {
        *interval /= total;
    }
    resample_with_intervals(points, n, &intervals)
}

fn check_count(n: usize) -> RecognizerResult<()> {
    if n < 2 {
        return Err(RecognizerError::InvalidResampleCount(n));
    }
    Ok(())
}

/// Walk the polyline and emit a point each time the accumulated distance
/// reaches the next interval boundary. `intervals` are fractions of the
/// total path length and must sum to 1.
fn resample_with_intervals(
    points: ArrayView2<'_, f64>,
    n: usize,
    intervals: &[f64],
) -> RecognizerResult<Array2<f64>> {
    let count = points.nrows();
    if count == 0 {
        return Err(RecognizerError::EmptyTrajectory);
    }

    let first = points.row(0);
    let mut resampled = Array2::zeros((n, points.ncols()));

    let path_distance = path_length(points);
    if !(path_distance > 0.0) {
        for mut row in resampled.outer_iter_mut() {
            row.assign(&first);
        }
        return Ok(resampled);
    }

    resampled.row_mut(0).assign(&first);
    let mut produced = 1;
    let mut accumulated = 0.0;
    let mut interval = path_distance * intervals[0];

    'walk: for ii in 1..count {
        let current = points.row(ii);
        let mut segment = distance(points.row(ii - 1), current);

        if accumulated + segment < interval {
            accumulated += segment;
            continue;
        }

        let mut previous: Array1<f64> = points.row(ii - 1).to_owned();
        while accumulated + segment >= interval {
            let remaining = interval - accumulated;

            // Duplicate input points give a zero-length segment and a NaN
            // parameter.
            let t = remaining / segment;
            let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };

            let point = &previous * (1.0 - t) + &current * t;
            resampled.row_mut(produced).assign(&point);

            segment -= remaining;
            accumulated = 0.0;
            previous = point;
            produced += 1;

            if produced == n {
                break 'walk;
            }
            interval = path_distance * intervals[produced - 1];
        }
        accumulated = segment;
    }

    // Rounding can leave the final boundary just past the end of the path.
    if produced == n - 1 {
        resampled.row_mut(n - 1).assign(&points.row(count - 1));
        produced += 1;
    }

    if produced != n {
        return Err(RecognizerError::ResampleShortfall { expected: n, produced });
    }
    Ok(resampled)
}
