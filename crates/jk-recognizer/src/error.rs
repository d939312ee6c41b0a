//! Error types for recognition and calibration.

use jk_models::SampleError;
use thiserror::Error;

/// Result type for recognizer operations.
pub type RecognizerResult<T> = Result<T, RecognizerError>;

/// Errors that can occur while building templates, classifying or calibrating.
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("Resample count must be at least 2, got {0}")]
    InvalidResampleCount(usize),

    #[error("DTW band ratio must be in (0, 1], got {0}")]
    InvalidBandRatio(f64),

    #[error("Trajectory has no points")]
    EmptyTrajectory,

    #[error("Resampling produced {produced} points, expected {expected}")]
    ResampleShortfall { expected: usize, produced: usize },

    #[error("Trajectory has {found} dimensions, templates have {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Template index {index} out of range ({count} templates)")]
    TemplateIndexOutOfRange { index: usize, count: usize },

    #[error("No training sample has a gesture other than '{gesture}'")]
    InsufficientClassDiversity { gesture: String },

    #[error("No splice window of sufficient width found after {attempts} attempts")]
    SpliceWindowExhausted { attempts: usize },

    #[error("Sphere rejection sampling failed after {attempts} attempts")]
    SphereSamplingExhausted { attempts: usize },

    #[error("Score distribution is empty: {0}")]
    EmptyScoreDistribution(&'static str),

    #[error("Recognizer has no templates")]
    NoTemplates,

    #[error("Training count must be at least 1")]
    InvalidTrainCount,

    #[error("Invalid sample: {0}")]
    Sample(#[from] SampleError),
}

impl RecognizerError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    /// Create a class diversity error for the given gesture.
    pub fn insufficient_class_diversity(gesture: impl Into<String>) -> Self {
        Self::InsufficientClassDiversity {
            gesture: gesture.into(),
        }
    }
}
