//! Rejection threshold calibration.
//!
//! Calibration needs no negative training data. For every template it
//! generates hard negatives with the [`Splicer`](crate::synthesis::Splicer)
//! and positives with [`gpsr`](crate::synthesis::gpsr), then:
//!
//! 1. **Threshold**: merge-scan the pooled scores for the F-beta optimal cut
//! 2. **Adjustment**: rescale the cut by a Monte-Carlo simulation of how far
//!    real positives spread beyond the synthetic ones (device inflation)

pub mod adjustment;
pub mod config;
pub mod selector;
pub mod threshold;

pub use adjustment::{estimate_adjustment, sample_sphere, Adjustment, AdjustmentSearch};
pub use config::CalibrationConfig;
pub use selector::{select_rejection_threshold, ThresholdCalibrator};
pub use threshold::{estimate_threshold, f_beta, ThresholdEstimate};
