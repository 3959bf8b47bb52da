use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

use crate::config::ScanConfig;
use crate::models::OrderedCorners;

/// Flatten the region bounded by `corners` into an upright rectangle.
///
/// The source and destination corner sets are paired by role (top-left to
/// top-left, and so on); pairing by position alone would mirror or rotate
/// the page. The perspective solve and pixel resampling are delegated to
/// `imageproc`, with bilinear interpolation and a constant black fill for
/// out-of-bounds samples.
///
/// Returns `None` when the corner geometry is degenerate (e.g. collinear
/// points) and no projective transform exists.
pub fn rectify(frame: &DynamicImage, corners: &OrderedCorners) -> Option<DynamicImage> {
    let width = corners.target_width().round().max(1.0) as u32;
    let height = corners.target_height().round().max(1.0) as u32;

    let src = [
        (corners.top_left.x, corners.top_left.y),
        (corners.top_right.x, corners.top_right.y),
        (corners.bottom_right.x, corners.bottom_right.y),
        (corners.bottom_left.x, corners.bottom_left.y),
    ];
    let dst = [
        (0.0, 0.0),
        (width as f32, 0.0),
        (width as f32, height as f32),
        (0.0, height as f32),
    ];

    let projection = Projection::from_control_points(src, dst)?;
    debug!(width, height, "projective transform solved");

    let input = frame.to_rgba8();
    let mut output = RgbaImage::new(width, height);
    warp_into(
        &input,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 255]),
        &mut output,
    );

    Some(DynamicImage::ImageRgba8(output))
}

/// Detection-independent capture path: a fixed centered crop plus a
/// cosmetic filter approximating a scanned-document look.
///
/// Trades geometric accuracy for availability: a capture must always
/// produce a usable page, even when detection found nothing.
pub fn fallback_crop(frame: &DynamicImage, config: &ScanConfig) -> DynamicImage {
    let crop_w = ((frame.width() as f32 * config.fallback_width_fraction).round() as u32).max(1);
    let crop_h = ((frame.height() as f32 * config.fallback_height_fraction).round() as u32).max(1);
    let crop_x = (frame.width() - crop_w) / 2;
    let crop_y = (frame.height() - crop_h) / 2;

    let gray = frame.crop_imm(crop_x, crop_y, crop_w, crop_h).to_luma8();

    let contrast = config.fallback_contrast;
    let brightness = config.fallback_brightness;
    let filtered = GrayImage::from_fn(crop_w, crop_h, |x, y| {
        let value = f32::from(gray.get_pixel(x, y).0[0]);
        let contrasted = (value - 128.0) * contrast + 128.0;
        let brightened = contrasted * brightness;
        image::Luma([brightened.clamp(0.0, 255.0) as u8])
    });

    DynamicImage::ImageLuma8(filtered)
}
