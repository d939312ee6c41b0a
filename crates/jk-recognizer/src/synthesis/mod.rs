//! Synthetic score generators for threshold calibration.
//!
//! - [`splicer`]: hard negatives spliced together from two gesture classes
//! - [`gpsr`]: positives produced by gesture path stochastic resampling

pub mod gpsr;
pub mod splicer;

pub use gpsr::{gpsr, optimal_n};
pub use splicer::Splicer;
