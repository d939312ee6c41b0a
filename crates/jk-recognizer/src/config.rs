//! Recognizer configuration.

use jk_models::DeviceType;
use serde::{Deserialize, Serialize};

/// Parameters fixed for the lifetime of a recognizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Points every template and candidate is resampled to.
    pub resample_count: usize,
    /// DTW band half-width as a fraction of the resample count.
    pub band_ratio: f64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            resample_count: 16,
            band_ratio: 0.1,
        }
    }
}

impl RecognizerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            resample_count: std::env::var("JK_RESAMPLE_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.resample_count),
            band_ratio: std::env::var("JK_BAND_RATIO")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.band_ratio),
        }
    }

    /// Configuration using the calibrated resample count of a device.
    pub fn for_device(device: DeviceType) -> Option<Self> {
        device.profile().map(|profile| Self {
            resample_count: profile.resample_count,
            ..Self::default()
        })
    }

    /// Builder-style setter for the resample count.
    pub fn with_resample_count(mut self, n: usize) -> Self {
        self.resample_count = n;
        self
    }

    /// Builder-style setter for the band ratio.
    pub fn with_band_ratio(mut self, ratio: f64) -> Self {
        self.band_ratio = ratio;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RecognizerConfig::default();
        assert_eq!(config.resample_count, 16);
        assert!((config.band_ratio - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_device_config() {
        let config = RecognizerConfig::for_device(DeviceType::Kinect).unwrap();
        assert_eq!(config.resample_count, 20);
        assert!(RecognizerConfig::for_device(DeviceType::Gds).is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RecognizerConfig::default().with_resample_count(64).with_band_ratio(0.2);
        assert_eq!(config.resample_count, 64);
        assert!((config.band_ratio - 0.2).abs() < f64::EPSILON);
    }
}
