//! Banded dynamic time warping over direction vectors.
//!
//! The local cost of aligning two direction vectors is `1 - a·b`, which is
//! 0 for identical directions and 2 for opposite ones. Alignment is limited
//! to a Sakoe-Chiba band of half-width `w` around the diagonal, so only
//! O(n·w) cells are evaluated.

use ndarray::ArrayView2;

/// Banded DTW distance between two equal-length vector sequences.
///
/// # Panics
/// Panics if the sequences differ in length. The recognizer always resamples
/// both sides to the same count, so a mismatch is a programming error.
pub fn dtw_distance(candidate: ArrayView2<'_, f64>, template: ArrayView2<'_, f64>, band: usize) -> f64 {
    assert_eq!(
        candidate.nrows(),
        template.nrows(),
        "DTW requires equal-length sequences"
    );

    let n = candidate.nrows();
    let width = n + 1;
    let mut grid = vec![f64::INFINITY; width * width];
    grid[0] = 0.0;

    for i in 1..=n {
        let lo = i.saturating_sub(band).max(1);
        let hi = (i + band).min(n);
        let c = candidate.row(i - 1);

        for j in lo..=hi {
            let cost = 1.0 - c.dot(&template.row(j - 1));

            let insert = grid[(i - 1) * width + j];
            let delete = grid[i * width + j - 1];
            let matched = grid[(i - 1) * width + j - 1];

            grid[i * width + j] = cost + insert.min(delete).min(matched);
        }
    }

    grid[n * width + n]
}

/// Band half-width for a sequence of `n` points at the given ratio.
pub fn band_width(n: usize, ratio: f64) -> usize {
    (n as f64 * ratio).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::vectorize;
    use ndarray::{array, Array2};

    fn circle_vectors(n: usize, phase: f64) -> Array2<f64> {
        let mut pts = Array2::zeros((n + 1, 2));
        for i in 0..=n {
            let a = phase + i as f64 / n as f64 * std::f64::consts::TAU;
            pts[[i, 0]] = a.cos();
            pts[[i, 1]] = a.sin();
        }
        vectorize(pts.view())
    }

    #[test]
    fn test_self_distance_is_zero() {
        let v = circle_vectors(24, 0.0);
        for band in [0, 1, 3, 10, 100] {
            assert!(dtw_distance(v.view(), v.view(), band).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_vectors_self_match() {
        let v = array![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]];
        // Zero vectors cost 1 against themselves, never NaN.
        let d = dtw_distance(v.view(), v.view(), 1);
        assert_eq!(d, 2.0);
    }

    #[test]
    fn test_wider_band_never_worse() {
        let a = circle_vectors(32, 0.0);
        let b = circle_vectors(32, 0.6);
        let mut previous = f64::INFINITY;
        for band in 0..=32 {
            let d = dtw_distance(a.view(), b.view(), band);
            assert!(d <= previous + 1e-12, "band {band}: {d} > {previous}");
            previous = d;
        }
    }

    #[test]
    fn test_opposite_directions() {
        let a = array![[1.0, 0.0], [1.0, 0.0], [1.0, 0.0]];
        let b = array![[-1.0, 0.0], [-1.0, 0.0], [-1.0, 0.0]];
        assert!((dtw_distance(a.view(), b.view(), 0) - 6.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "equal-length")]
    fn test_length_mismatch_panics() {
        let a = array![[1.0, 0.0], [1.0, 0.0]];
        let b = array![[1.0, 0.0]];
        dtw_distance(a.view(), b.view(), 1);
    }

    #[test]
    fn test_band_width() {
        assert_eq!(band_width(32, 0.1), 3);
        assert_eq!(band_width(96, 0.1), 10);
        assert_eq!(band_width(16, 1.0), 16);
    }
}
