//! Hard-negative synthesis.
//!
//! A spliced trajectory follows the target sample for a prefix and suffix
//! and borrows a window of movement from a sample of another gesture in
//! between. The result looks locally like the target but is not an instance
//! of it, which makes it a useful negative when estimating how low a
//! non-matching score can go.

use jk_models::Sample;
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;
use tracing::trace;

use crate::error::{RecognizerError, RecognizerResult};
use crate::geometry::{centroid, extent};
use crate::resample::resample;

/// Points every prepared trajectory is resampled to.
pub const PREPARED_POINTS: usize = 128;

/// Default bound on window draws per splice.
pub const DEFAULT_MAX_WINDOW_ATTEMPTS: usize = 1000;

/// Generator of spliced negatives over a fixed training set.
#[derive(Debug, Clone)]
pub struct Splicer {
    gestures: Vec<String>,
    deltas: Vec<Array2<f64>>,
    max_window_attempts: usize,
}

impl Splicer {
    /// Prepare every sample for splicing.
    pub fn new(samples: &[Sample]) -> RecognizerResult<Self> {
        let deltas = samples
            .iter()
            .map(|sample| prepare(sample.trajectory()))
            .collect::<RecognizerResult<Vec<_>>>()?;

        Ok(Self {
            gestures: samples.iter().map(|s| s.gesture().to_string()).collect(),
            deltas,
            max_window_attempts: DEFAULT_MAX_WINDOW_ATTEMPTS,
        })
    }

    /// Builder-style setter for the window retry bound.
    pub fn with_max_window_attempts(mut self, attempts: usize) -> Self {
        self.max_window_attempts = attempts;
        self
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Splice a negative for the sample at `target_index`.
    ///
    /// Returns [`PREPARED_POINTS`] points starting at the origin.
    pub fn splice<R: Rng + ?Sized>(&self, target_index: usize, rng: &mut R) -> RecognizerResult<Array2<f64>> {
        let target_gesture = self
            .gestures
            .get(target_index)
            .ok_or(RecognizerError::TemplateIndexOutOfRange {
                index: target_index,
                count: self.gestures.len(),
            })?;

        let others: Vec<usize> = self
            .gestures
            .iter()
            .enumerate()
            .filter(|(_, gesture)| *gesture != target_gesture)
            .map(|(index, _)| index)
            .collect();
        if others.is_empty() {
            return Err(RecognizerError::insufficient_class_diversity(target_gesture.as_str()));
        }
        let other_index = others[rng.random_range(0..others.len())];

        let (idx1, idx2) = self.draw_window(rng)?;
        trace!(target_index, other_index, idx1, idx2, "Splicing negative");

        Ok(splice_window(
            self.deltas[target_index].view(),
            self.deltas[other_index].view(),
            idx1,
            idx2,
        ))
    }

    /// Draw window bounds until the window spans at least a third of the
    /// deltas.
    fn draw_window<R: Rng + ?Sized>(&self, rng: &mut R) -> RecognizerResult<(usize, usize)> {
        let segments = PREPARED_POINTS - 1;
        let min_width = segments as f64 / 3.0;

        for _ in 0..self.max_window_attempts {
            let idx1 = rng.random_range(0..segments);
            let idx2 = rng.random_range(0..segments);
            let width = idx1.abs_diff(idx2) + 1;
            if width as f64 >= min_width {
                return Ok((idx1, idx2));
            }
        }

        Err(RecognizerError::SpliceWindowExhausted {
            attempts: self.max_window_attempts,
        })
    }
}

/// Resample, center on the centroid, scale the longest side to 1 and take
/// consecutive differences.
fn prepare(trajectory: ArrayView2<'_, f64>) -> RecognizerResult<Array2<f64>> {
    let mut points = resample(trajectory, PREPARED_POINTS)?;

    let center = centroid(points.view());
    let scale = extent(points.view()).fold(0.0_f64, |acc, &x| acc.max(x));
    for mut row in points.outer_iter_mut() {
        row -= &center;
        if scale > 0.0 {
            row /= scale;
        }
    }

    let mut deltas = Array2::zeros((PREPARED_POINTS - 1, points.ncols()));
    for i in 0..PREPARED_POINTS - 1 {
        deltas.row_mut(i).assign(&(&points.row(i + 1) - &points.row(i)));
    }
    Ok(deltas)
}

/// Replace the deltas of `target` between `idx1` and `idx2` (inclusive) with
/// those of `other`, walked backwards when `idx1 > idx2`, and rebuild one
/// more point than there are deltas, starting at the origin.
fn splice_window(target: ArrayView2<'_, f64>, other: ArrayView2<'_, f64>, idx1: usize, idx2: usize) -> Array2<f64> {
    let segments = target.nrows();
    let low = idx1.min(idx2);
    let high = idx1.max(idx2);

    let middle: Vec<usize> = if idx1 <= idx2 {
        (idx1..=idx2).collect()
    } else {
        (idx2..=idx1).rev().collect()
    };

    let steps = (0..low)
        .map(|i| target.row(i))
        .chain(middle.into_iter().map(|i| other.row(i)))
        .chain((high + 1..segments).map(|i| target.row(i)));

    accumulate(steps, segments + 1, target.ncols())
}

/// Rebuild `count` points from the origin by summing `steps`.
fn accumulate<'a>(steps: impl Iterator<Item = ArrayView1<'a, f64>>, count: usize, dimension: usize) -> Array2<f64> {
    let mut points = Array2::zeros((count, dimension));
    for (i, step) in steps.enumerate().take(count - 1) {
        let next = &points.row(i) + &step;
        points.row_mut(i + 1).assign(&next);
    }
    points
}
