use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tuning knobs for detection and capture.
///
/// Defaults match the values the pipeline was tuned with on 1080p frames;
/// the two fractions scale with frame size so other resolutions behave the
/// same.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Contours enclosing less than this fraction of the frame's pixel
    /// count are discarded as noise.
    pub min_area_fraction: f64,
    /// Polygon approximation tolerance, as a fraction of each contour's
    /// perimeter. Proportional tolerance keeps detection scale-invariant.
    pub epsilon_ratio: f64,
    /// Center-crop fractions used when no boundary was detected.
    pub fallback_width_fraction: f32,
    pub fallback_height_fraction: f32,
    /// Cosmetic filter factors for fallback pages: contrast about the
    /// channel midpoint, then a brightness multiplier.
    pub fallback_contrast: f32,
    pub fallback_brightness: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 75.0,
            canny_high: 200.0,
            min_area_fraction: 0.0025,
            epsilon_ratio: 0.02,
            fallback_width_fraction: 0.85,
            fallback_height_fraction: 0.70,
            fallback_contrast: 1.4,
            fallback_brightness: 1.1,
        }
    }
}

impl ScanConfig {
    /// Load settings from a JSON file. Absent fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }
}
