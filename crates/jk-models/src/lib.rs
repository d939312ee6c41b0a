//! Shared data models for the Jackknife gesture recognizer.
//!
//! This crate provides Serde-serializable types for:
//! - Captured gesture samples (trajectory, timestamps, labels)
//! - Device profiles (resample count, inflation factor)
//! - GPSR regression coefficients used during calibration

pub mod device;
pub mod sample;

// Re-export common types
pub use device::{DeviceProfile, DeviceType, DeviceTypeParseError, GpsrCoefficients};
pub use sample::{Sample, SampleError, SampleLabels, SampleResult};
