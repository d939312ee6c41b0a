//! Vector and polyline helpers shared by the resampler, template builder and
//! synthesizers.
//!
//! Trajectories are `ndarray` matrices with one row per point.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

// === Vector Functions ===

/// Euclidean norm of a vector.
pub fn norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// Euclidean distance between two points.
pub fn distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

/// Scale a vector to unit length.
///
/// A zero-length vector is returned unchanged rather than divided by zero.
pub fn normalize_or_zero(mut v: Array1<f64>) -> Array1<f64> {
    let length = norm(v.view());
    if length > 0.0 {
        v /= length;
    }
    v
}

// === Polyline Functions ===

/// Total arc length of a polyline.
pub fn path_length(points: ArrayView2<'_, f64>) -> f64 {
    points
        .outer_iter()
        .zip(points.outer_iter().skip(1))
        .map(|(a, b)| distance(a, b))
        .sum()
}

/// Per-axis minimum and maximum.
pub fn bounding_box(points: ArrayView2<'_, f64>) -> (Array1<f64>, Array1<f64>) {
    let minimum = points.fold_axis(Axis(0), f64::INFINITY, |&acc, &x| acc.min(x));
    let maximum = points.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &x| acc.max(x));
    (minimum, maximum)
}

/// Per-axis extent (max - min).
pub fn extent(points: ArrayView2<'_, f64>) -> Array1<f64> {
    let (minimum, maximum) = bounding_box(points);
    maximum - minimum
}

/// Mean of all points.
pub fn centroid(points: ArrayView2<'_, f64>) -> Array1<f64> {
    points
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(points.ncols()))
}

/// Per-axis sum of absolute coordinates, normalized to unit length.
pub fn shape_signature(points: ArrayView2<'_, f64>) -> Array1<f64> {
    let absolute = points.fold_axis(Axis(0), 0.0, |&acc, &x| acc + x.abs());
    normalize_or_zero(absolute)
}

/// Bounding-box diagonal, normalized to unit length.
pub fn size_signature(points: ArrayView2<'_, f64>) -> Array1<f64> {
    normalize_or_zero(extent(points))
}
