#![deny(unreachable_patterns)]
//! Jackknife gesture recognition.
//!
//! This crate provides:
//! - Arc-length resampling and low-pass smoothing of trajectories
//! - Template matching with banded DTW over direction vectors
//! - Shape and size correction factors for the DTW score
//! - Hard-negative splicing and GPSR synthetic positives
//! - Rejection threshold calibration without negative training data

pub mod calibration;
pub mod config;
pub mod dtw;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod recognizer;
pub mod resample;
pub mod smoothing;
pub mod synthesis;
pub mod template;

pub use calibration::{
    estimate_adjustment, estimate_threshold, sample_sphere, select_rejection_threshold, CalibrationConfig,
    ThresholdCalibrator, ThresholdEstimate,
};
pub use config::RecognizerConfig;
pub use dtw::dtw_distance;
pub use error::{RecognizerError, RecognizerResult};
pub use recognizer::{RecognitionResult, Recognizer, RejectionThreshold};
pub use resample::{resample, resample_jittered};
pub use smoothing::{smooth_sample, SmoothingConfig};
pub use synthesis::{gpsr, optimal_n, Splicer};
pub use template::Template;
