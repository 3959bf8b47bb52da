use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

use crate::config::ScanConfig;

/// Reduce a color frame to the single-channel input the edge detector expects.
pub fn to_grayscale(frame: &DynamicImage) -> GrayImage {
    frame.to_luma8()
}

/// Gaussian blur to suppress sensor noise before edge detection.
pub fn denoise(gray: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(gray, sigma)
}

/// Canny edge filter. Output is a binary edge map (255 = edge pixel).
pub fn edge_map(gray: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(gray, low_threshold, high_threshold)
}

/// Full preprocessing chain for one frame: grayscale, blur, edge map.
pub fn prepare(frame: &DynamicImage, config: &ScanConfig) -> GrayImage {
    let gray = to_grayscale(frame);
    let smoothed = denoise(&gray, config.blur_sigma);
    edge_map(&smoothed, config.canny_low, config.canny_high)
}
