use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point as ContourPoint;

use crate::config::ScanConfig;
use crate::models::{OrderedCorners, Point, Quad};

use super::contours;

/// Pick the contour most likely to be the page boundary.
///
/// Contours below the noise floor (`min_area_fraction` of the frame area)
/// are discarded. The rest are simplified with a tolerance proportional to
/// their own perimeter; only exact four-vertex simplifications qualify, and
/// the one with the strictly greatest enclosed area wins. Equal areas keep
/// the first contour in extractor order. The extractor's traversal order
/// is not part of this contract, so ties are an accepted nondeterminism.
///
/// Pure function of its inputs.
pub fn select_document_quad(
    contours: &[Vec<ContourPoint<i32>>],
    frame_area: f64,
    config: &ScanConfig,
) -> Option<Quad> {
    let noise_floor = config.min_area_fraction * frame_area;
    let mut best: Option<Quad> = None;

    for contour in contours {
        let area = contours::enclosed_area(contour);
        if area < noise_floor {
            continue;
        }

        let perimeter = arc_length(contour, true);
        let approx = approximate_polygon_dp(contour, config.epsilon_ratio * perimeter, true);
        if approx.len() != 4 {
            continue;
        }

        if best.as_ref().map_or(true, |quad| area > quad.area) {
            let mut points = [Point::new(0.0, 0.0); 4];
            for (point, vertex) in points.iter_mut().zip(&approx) {
                *point = Point::new(vertex.x as f32, vertex.y as f32);
            }
            best = Some(Quad { points, area });
        }
    }

    best
}

/// Label the four corners of a candidate by role.
///
/// Sorting by the vertical coordinate splits the top and bottom pairs;
/// within each pair the smaller horizontal coordinate is the left corner.
/// Assumes the quadrilateral is within roughly 45 degrees of upright;
/// steeper skews can swap labels.
pub fn order_corners(quad: &Quad) -> OrderedCorners {
    let mut points = quad.points;
    points.sort_by(|a, b| a.y.total_cmp(&b.y));

    let (mut top, mut bottom) = ([points[0], points[1]], [points[2], points[3]]);
    if top[0].x > top[1].x {
        top.swap(0, 1);
    }
    if bottom[0].x > bottom[1].x {
        bottom.swap(0, 1);
    }

    OrderedCorners {
        top_left: top[0],
        top_right: top[1],
        bottom_right: bottom[1],
        bottom_left: bottom[0],
    }
}
