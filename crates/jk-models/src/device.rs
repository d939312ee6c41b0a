//! Capture device definitions and their calibration constants.
//!
//! Recognition parameters depend on the sensor that captured a gesture:
//! skeletal trackers, VR controllers and mice differ in sampling rate and
//! noise, so each gets its own resample count and threshold inflation
//! factor. The recognizer itself never branches on the device; callers look
//! the profile up here and pass plain numbers in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Device or dataset modality a gesture was captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Kinect,
    Vive,
    VivePosition,
    ViveQuaternion,
    Jk2017Kinect,
    Jk2017LeapMotion,
    Gds,
    Wii,
    Mouse,
    Shrec19,
    #[serde(rename = "chalearn11")]
    ChaLearn11,
    #[serde(rename = "chalearn14")]
    ChaLearn14,
}

impl DeviceType {
    /// All known device types.
    pub const ALL: &'static [DeviceType] = &[
        DeviceType::Kinect,
        DeviceType::Vive,
        DeviceType::VivePosition,
        DeviceType::ViveQuaternion,
        DeviceType::Jk2017Kinect,
        DeviceType::Jk2017LeapMotion,
        DeviceType::Gds,
        DeviceType::Wii,
        DeviceType::Mouse,
        DeviceType::Shrec19,
        DeviceType::ChaLearn11,
        DeviceType::ChaLearn14,
    ];

    /// Returns the device name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Kinect => "kinect",
            DeviceType::Vive => "vive",
            DeviceType::VivePosition => "vive_position",
            DeviceType::ViveQuaternion => "vive_quaternion",
            DeviceType::Jk2017Kinect => "jk2017_kinect",
            DeviceType::Jk2017LeapMotion => "jk2017_leap_motion",
            DeviceType::Gds => "gds",
            DeviceType::Wii => "wii",
            DeviceType::Mouse => "mouse",
            DeviceType::Shrec19 => "shrec19",
            DeviceType::ChaLearn11 => "chalearn11",
            DeviceType::ChaLearn14 => "chalearn14",
        }
    }

    /// Calibrated recognition profile, if one has been measured for this device.
    pub fn profile(&self) -> Option<DeviceProfile> {
        match self {
            DeviceType::Kinect => Some(DeviceProfile::new(20, 1.4)),
            DeviceType::VivePosition => Some(DeviceProfile::new(32, 1.52)),
            DeviceType::ViveQuaternion => Some(DeviceProfile::new(16, 1.68)),
            DeviceType::Mouse => Some(DeviceProfile::new(96, 1.2)),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = DeviceTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        DeviceType::ALL
            .iter()
            .copied()
            .find(|device| device.as_str() == lowered)
            .ok_or_else(|| DeviceTypeParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown device type: {0}")]
pub struct DeviceTypeParseError(String);

/// Per-device recognition constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceProfile {
    /// Number of points every template and candidate is resampled to.
    pub resample_count: usize,
    /// Ratio between the inflated and the training decision radius used by
    /// the threshold adjustment.
    pub inflation: f64,
}

impl DeviceProfile {
    pub fn new(resample_count: usize, inflation: f64) -> Self {
        Self {
            resample_count,
            inflation,
        }
    }
}

/// Linear regression predicting the GPSR point count of a trajectory from
/// its path density and total turning angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GpsrCoefficients {
    pub intercept: f64,
    pub angle_co: f64,
    pub density_co: f64,
    pub density_angle_co: f64,
}

impl Default for GpsrCoefficients {
    fn default() -> Self {
        Self {
            intercept: 4.471682,
            angle_co: -0.686062,
            density_co: 0.464960,
            density_angle_co: 0.384859,
        }
    }
}

impl GpsrCoefficients {
    /// Evaluate the regression (unrounded).
    pub fn predict(&self, density: f64, angle: f64) -> f64 {
        self.intercept + self.density_co * density + self.angle_co * angle + self.density_angle_co * density * angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_parse() {
        assert_eq!("kinect".parse::<DeviceType>().unwrap(), DeviceType::Kinect);
        assert_eq!("Mouse".parse::<DeviceType>().unwrap(), DeviceType::Mouse);
        assert_eq!("vive_quaternion".parse::<DeviceType>().unwrap(), DeviceType::ViveQuaternion);
        assert!("trackpad".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_device_display_roundtrip() {
        for device in DeviceType::ALL {
            assert_eq!(device.to_string().parse::<DeviceType>().unwrap(), *device);
        }
    }

    #[test]
    fn test_device_profiles() {
        assert_eq!(DeviceType::Kinect.profile(), Some(DeviceProfile::new(20, 1.4)));
        assert_eq!(DeviceType::Mouse.profile().map(|p| p.resample_count), Some(96));
        assert!(DeviceType::Wii.profile().is_none());
    }

    #[test]
    fn test_device_serde() {
        let json = serde_json::to_string(&DeviceType::VivePosition).unwrap();
        assert_eq!(json, "\"vive_position\"");
    }

    #[test]
    fn test_gpsr_prediction() {
        let co = GpsrCoefficients::default();
        assert!((co.predict(0.0, 0.0) - co.intercept).abs() < 1e-12);
        // A straight line: density 1, no turning.
        assert_eq!(co.predict(1.0, 0.0).round(), 5.0);
    }
}
