pub mod contours;
pub mod preprocessing;
pub mod quad;

use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::config::ScanConfig;
use crate::models::Quad;

/// Per-frame document boundary detector.
///
/// Runs the full chain on one frame: grayscale, blur, Canny edge map,
/// contour extraction, quadrilateral selection. Holds no per-frame state;
/// all tuning comes from [`ScanConfig`].
pub struct DocumentDetector {
    config: ScanConfig,
}

impl DocumentDetector {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Detect the most likely document boundary in one frame.
    pub fn detect(&self, frame: &DynamicImage) -> Option<Quad> {
        self.detect_traced(frame).quad
    }

    /// Like [`detect`](Self::detect), but keeps the intermediate rasters so
    /// callers can inspect or save them.
    pub fn detect_traced(&self, frame: &DynamicImage) -> DetectionTrace {
        let gray = preprocessing::to_grayscale(frame);
        let smoothed = preprocessing::denoise(&gray, self.config.blur_sigma);
        let edges =
            preprocessing::edge_map(&smoothed, self.config.canny_low, self.config.canny_high);

        let contour_set = contours::extract_contours(&edges);
        debug!(contours = contour_set.len(), "contours extracted");

        let frame_area = f64::from(frame.width()) * f64::from(frame.height());
        let quad = quad::select_document_quad(&contour_set, frame_area, &self.config);
        debug!(found = quad.is_some(), "quadrilateral selection complete");

        DetectionTrace {
            smoothed,
            edges,
            contour_count: contour_set.len(),
            quad,
        }
    }
}

impl Default for DocumentDetector {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Intermediate products of one detection pass.
pub struct DetectionTrace {
    /// Grayscale frame after noise suppression.
    pub smoothed: GrayImage,
    /// Binary edge map fed to the contour extractor.
    pub edges: GrayImage,
    pub contour_count: usize,
    pub quad: Option<Quad>,
}
