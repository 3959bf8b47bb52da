use anyhow::Result;
use image::{DynamicImage, GrayImage, Luma};

use pagescan::detection::quad::order_corners;
use pagescan::{DocumentDetector, ScanConfig};

/// Dark frame with a light filled rectangle, the synthetic stand-in for a
/// page on a desk.
fn frame_with_rect(
    width: u32,
    height: u32,
    x0: u32,
    y0: u32,
    rect_w: u32,
    rect_h: u32,
) -> DynamicImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([30]));
    for y in y0..y0 + rect_h {
        for x in x0..x0 + rect_w {
            img.put_pixel(x, y, Luma([220]));
        }
    }
    DynamicImage::ImageLuma8(img)
}

#[test]
fn detects_page_boundary_in_1080p_frame() -> Result<()> {
    let detector = DocumentDetector::new(ScanConfig::default());
    let frame = frame_with_rect(1920, 1080, 100, 100, 900, 700);

    let quad = detector
        .detect(&frame)
        .expect("the rectangle must be detected");

    // The traced contour follows the rectangle's edge pixels, so allow a
    // few pixels of slack on every derived quantity.
    assert!(
        (quad.area - 630_000.0).abs() < 630_000.0 * 0.05,
        "area out of tolerance: {}",
        quad.area
    );

    let corners = order_corners(&quad);
    let expectations = [
        (corners.top_left, (100.0, 100.0)),
        (corners.top_right, (1000.0, 100.0)),
        (corners.bottom_right, (1000.0, 800.0)),
        (corners.bottom_left, (100.0, 800.0)),
    ];
    for (corner, (x, y)) in expectations {
        assert!(
            (corner.x - x).abs() <= 10.0 && (corner.y - y).abs() <= 10.0,
            "corner {:?} too far from ({}, {})",
            corner,
            x,
            y
        );
    }

    assert!((corners.target_width() - 900.0).abs() <= 10.0);
    assert!((corners.target_height() - 700.0).abs() <= 10.0);

    Ok(())
}

#[test]
fn blank_frame_yields_no_candidate() -> Result<()> {
    let detector = DocumentDetector::new(ScanConfig::default());
    let frame = DynamicImage::ImageLuma8(GrayImage::from_pixel(1280, 720, Luma([128])));

    assert!(detector.detect(&frame).is_none());
    Ok(())
}

#[test]
fn largest_of_two_pages_is_selected() -> Result<()> {
    let detector = DocumentDetector::new(ScanConfig::default());

    let mut img = GrayImage::from_pixel(1920, 1080, Luma([30]));
    for (x0, y0, w, h) in [(100u32, 100u32, 800u32, 600u32), (1200, 650, 300, 200)] {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Luma([220]));
            }
        }
    }
    let frame = DynamicImage::ImageLuma8(img);

    let quad = detector.detect(&frame).expect("a boundary must be found");
    assert!(
        (quad.area - 480_000.0).abs() < 480_000.0 * 0.05,
        "selector must prefer the larger rectangle, got area {}",
        quad.area
    );

    Ok(())
}

#[test]
fn small_noise_is_ignored() -> Result<()> {
    let detector = DocumentDetector::new(ScanConfig::default());

    // A 40x40 speck is under the 0.25% noise floor of a 1080p frame.
    let frame = frame_with_rect(1920, 1080, 500, 500, 40, 40);
    assert!(detector.detect(&frame).is_none());

    Ok(())
}

#[test]
fn trace_exposes_intermediate_stages() -> Result<()> {
    let detector = DocumentDetector::new(ScanConfig::default());
    let frame = frame_with_rect(640, 480, 100, 100, 300, 200);

    let trace = detector.detect_traced(&frame);
    assert_eq!(trace.smoothed.dimensions(), (640, 480));
    assert_eq!(trace.edges.dimensions(), (640, 480));
    assert!(trace.contour_count > 0);
    assert!(trace.quad.is_some());

    Ok(())
}
