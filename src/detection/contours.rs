use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

/// Extract closed boundaries from a binary edge map.
///
/// Only top-level outer borders are kept: holes and nested contours cannot
/// be the page outline. Contours with fewer than 4 points can never
/// approximate to a quadrilateral and are dropped here.
pub fn extract_contours(edges: &GrayImage) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .filter(|points| points.len() >= 4)
        .collect()
}

/// Enclosed area of a closed contour via the shoelace formula.
pub fn enclosed_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += f64::from(points[i].x) * f64::from(points[j].y);
        area -= f64::from(points[j].x) * f64::from(points[i].y);
    }
    area.abs() / 2.0
}
