//! Metrics emitted through the `metrics` facade.
//!
//! The library never installs a recorder; an embedding application that
//! wants Prometheus output installs one and these calls start reporting.

use metrics::{counter, gauge, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const TEMPLATES_ADDED_TOTAL: &str = "jk_templates_added_total";
    pub const CLASSIFICATIONS_TOTAL: &str = "jk_classifications_total";
    pub const CALIBRATION_DURATION_SECONDS: &str = "jk_calibration_duration_seconds";
    pub const CALIBRATION_THRESHOLD: &str = "jk_calibration_threshold";
}

/// Record a template being added to a recognizer.
pub fn record_template_added(gesture: &str) {
    let labels = [("gesture", gesture.to_string())];
    counter!(names::TEMPLATES_ADDED_TOTAL, &labels).increment(1);
}

/// Record a classification outcome.
pub fn record_classification(matched: bool) {
    let outcome = if matched { "matched" } else { "no_match" };
    let labels = [("outcome", outcome.to_string())];
    counter!(names::CLASSIFICATIONS_TOTAL, &labels).increment(1);
}

/// Record a finished calibration run.
pub fn record_calibration(duration_secs: f64, threshold: f64) {
    histogram!(names::CALIBRATION_DURATION_SECONDS).record(duration_secs);
    gauge!(names::CALIBRATION_THRESHOLD).set(threshold);
}
