//! Captured gesture samples.
//!
//! A [`Sample`] is one recorded performance of a gesture: an ordered list of
//! d-dimensional points, the timestamp of each point, and the labels that say
//! who performed which gesture. Samples are produced by an external loader and
//! are read-only afterwards.

use ndarray::{Array2, ArrayView2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for sample construction.
pub type SampleResult<T> = Result<T, SampleError>;

/// Errors raised while validating a sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("Trajectory has no points")]
    EmptyTrajectory,

    #[error("Trajectory points have zero dimensions")]
    ZeroDimension,

    #[error("Timestamp count {timestamps} does not match point count {points}")]
    TimestampCountMismatch { points: usize, timestamps: usize },

    #[error("Timestamps decrease at index {index}")]
    NonMonotonicTimestamps { index: usize },

    #[error("Non-finite coordinate at point {point}, axis {axis}")]
    NonFiniteCoordinate { point: usize, axis: usize },

    #[error("Point {point} has {found} axes, expected {expected}")]
    RaggedPoint { point: usize, expected: usize, found: usize },
}

/// Labels attached to a sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct SampleLabels {
    /// Subject (participant) identifier.
    pub subject: String,
    /// Gesture class name; this is the label the recognizer reports.
    pub gesture: String,
    /// Exemplar name, unique within a subject and gesture.
    pub exemplar: String,
    /// Partition identifier assigned by the loader.
    pub partition: u32,
}

impl SampleLabels {
    /// Labels with only the gesture class set.
    pub fn gesture(name: impl Into<String>) -> Self {
        Self {
            gesture: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Builder-style setter for the exemplar.
    pub fn with_exemplar(mut self, exemplar: impl Into<String>) -> Self {
        self.exemplar = exemplar.into();
        self
    }

    /// Builder-style setter for the partition.
    pub fn with_partition(mut self, partition: u32) -> Self {
        self.partition = partition;
        self
    }
}

/// One recorded gesture performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleParts", into = "SampleParts")]
pub struct Sample {
    labels: SampleLabels,
    trajectory: Array2<f64>,
    timestamps: Vec<f64>,
}

/// Unvalidated wire form of a sample.
#[derive(Serialize, Deserialize)]
struct SampleParts {
    labels: SampleLabels,
    trajectory: Vec<Vec<f64>>,
    timestamps: Vec<f64>,
}

impl Sample {
    /// Create a validated sample.
    ///
    /// # Arguments
    /// * `labels` - Subject/gesture/exemplar labels
    /// * `trajectory` - One row per point
    /// * `timestamps` - Seconds, one per point, non-decreasing
    pub fn new(labels: SampleLabels, trajectory: Array2<f64>, timestamps: Vec<f64>) -> SampleResult<Self> {
        let (points, dims) = trajectory.dim();
        if points == 0 {
            return Err(SampleError::EmptyTrajectory);
        }
        if dims == 0 {
            return Err(SampleError::ZeroDimension);
        }
        if timestamps.len() != points {
            return Err(SampleError::TimestampCountMismatch {
                points,
                timestamps: timestamps.len(),
            });
        }
        if let Some(index) = timestamps.windows(2).position(|w| w[1] < w[0]) {
            return Err(SampleError::NonMonotonicTimestamps { index: index + 1 });
        }
        for ((point, axis), value) in trajectory.indexed_iter() {
            if !value.is_finite() {
                return Err(SampleError::NonFiniteCoordinate { point, axis });
            }
        }

        Ok(Self {
            labels,
            trajectory,
            timestamps,
        })
    }

    /// Create a sample from point rows, generating evenly spaced timestamps.
    ///
    /// Convenient for synthetic data where capture times do not matter.
    pub fn from_points(labels: SampleLabels, points: &[Vec<f64>], frame_rate: f64) -> SampleResult<Self> {
        let trajectory = rows_to_array(points)?;
        let step = if frame_rate > 0.0 { 1.0 / frame_rate } else { 0.0 };
        let timestamps = (0..points.len()).map(|i| i as f64 * step).collect();
        Self::new(labels, trajectory, timestamps)
    }

    /// Return a copy of this sample with its trajectory replaced.
    ///
    /// The replacement must keep the point count so timestamps stay paired.
    pub fn with_trajectory(&self, trajectory: Array2<f64>) -> SampleResult<Self> {
        Self::new(self.labels.clone(), trajectory, self.timestamps.clone())
    }

    pub fn labels(&self) -> &SampleLabels {
        &self.labels
    }

    /// Gesture class name.
    pub fn gesture(&self) -> &str {
        &self.labels.gesture
    }

    pub fn trajectory(&self) -> ArrayView2<'_, f64> {
        self.trajectory.view()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.trajectory.nrows()
    }

    /// Always false; a validated sample has at least one point.
    pub fn is_empty(&self) -> bool {
        self.trajectory.nrows() == 0
    }

    /// Number of axes per point.
    pub fn dimension(&self) -> usize {
        self.trajectory.ncols()
    }

    /// Capture rate in frames per second.
    ///
    /// Returns `None` when the sample spans no time.
    pub fn fps(&self) -> Option<f64> {
        let first = *self.timestamps.first()?;
        let last = *self.timestamps.last()?;
        let duration = last - first;
        if duration <= 0.0 {
            return None;
        }
        Some((self.len() as f64 - 1.0) / duration)
    }
}

fn rows_to_array(points: &[Vec<f64>]) -> SampleResult<Array2<f64>> {
    let dims = points.first().map(Vec::len).ok_or(SampleError::EmptyTrajectory)?;
    if dims == 0 {
        return Err(SampleError::ZeroDimension);
    }
    let mut flat = Vec::with_capacity(points.len() * dims);
    for (point, row) in points.iter().enumerate() {
        if row.len() != dims {
            return Err(SampleError::RaggedPoint {
                point,
                expected: dims,
                found: row.len(),
            });
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((points.len(), dims), flat).map_err(|_| SampleError::EmptyTrajectory)
}

impl TryFrom<SampleParts> for Sample {
    type Error = SampleError;

    fn try_from(parts: SampleParts) -> Result<Self, Self::Error> {
        let trajectory = rows_to_array(&parts.trajectory)?;
        Self::new(parts.labels, trajectory, parts.timestamps)
    }
}

impl From<Sample> for SampleParts {
    fn from(sample: Sample) -> Self {
        Self {
            trajectory: sample.trajectory.outer_iter().map(|row| row.to_vec()).collect(),
            labels: sample.labels,
            timestamps: sample.timestamps,
        }
    }
}
