use super::distance_2d::point_to_segment_dist;
use super::intersect_2d::{segment_segment_intersect_2d, segments_cross_2d};
use super::{Point2, TOLERANCE};
use crate::error::GeometryError;

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Total length of the closed boundary.
#[must_use]
pub fn perimeter_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| nalgebra::distance(&points[i], &points[(i + 1) % n]))
        .sum()
}

/// Returns the index of the leftmost vertex (smallest x), breaking ties by
/// smallest y.
///
/// Gives a start vertex that depends only on the geometry, not on the order
/// the caller listed the vertices in.
#[must_use]
pub fn leftmost_bottom_index(points: &[Point2]) -> usize {
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    best
}

/// Axis-aligned bounds `(min, max)` of a point set, or `None` when empty.
#[must_use]
pub fn bounds_2d(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for pt in &points[1..] {
        min.x = min.x.min(pt.x);
        min.y = min.y.min(pt.y);
        max.x = max.x.max(pt.x);
        max.y = max.y.max(pt.y);
    }
    Some((min, max))
}

/// Point-in-polygon test by ray casting.
///
/// Points exactly on the boundary may fall either way; use
/// [`contains_point_2d`] when the boundary must count as inside.
#[must_use]
pub fn point_in_polygon_2d(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (&polygon[i], &polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closed point-in-polygon test: boundary points (within `tolerance`) count
/// as inside.
#[must_use]
pub fn contains_point_2d(point: &Point2, polygon: &[Point2], tolerance: f64) -> bool {
    let n = polygon.len();
    let on_boundary =
        (0..n).any(|i| point_to_segment_dist(point, &polygon[i], &polygon[(i + 1) % n]) < tolerance);
    on_boundary || point_in_polygon_2d(point, polygon)
}

/// Validates that `points` describe a simple polygon usable for planning.
///
/// # Errors
///
/// Returns `GeometryError::InvalidPolygon` for fewer than 3 vertices,
/// non-finite coordinates, repeated vertices, zero area, or any contact
/// between non-adjacent edges.
pub fn validate_simple_2d(points: &[Point2]) -> Result<(), GeometryError> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::InvalidPolygon(format!(
            "at least 3 vertices required, got {n}"
        )));
    }

    if let Some(i) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::InvalidPolygon(format!(
            "vertex {i} has a non-finite coordinate"
        )));
    }

    for i in 0..n {
        let repeat = (i + 1..n).find(|&j| nalgebra::distance(&points[i], &points[j]) < TOLERANCE);
        if let Some(j) = repeat {
            return Err(GeometryError::InvalidPolygon(format!(
                "vertices {i} and {j} coincide"
            )));
        }
    }

    if signed_area_2d(points).abs() < TOLERANCE {
        return Err(GeometryError::InvalidPolygon("polygon has zero area".to_owned()));
    }

    // Non-adjacent edges may not touch at all; adjacent edges may only share
    // their common vertex.
    for i in 0..n {
        let (a0, a1) = (&points[i], &points[(i + 1) % n]);
        for j in (i + 1)..n {
            let (b0, b1) = (&points[j], &points[(j + 1) % n]);
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                if n > 3 && segments_cross_2d(a0, a1, b0, b1) {
                    return Err(GeometryError::InvalidPolygon(format!(
                        "edges {i} and {j} fold back onto each other"
                    )));
                }
                continue;
            }
            if segments_cross_2d(a0, a1, b0, b1)
                || segment_segment_intersect_2d(a0, a1, b0, b1).is_some()
            {
                return Err(GeometryError::InvalidPolygon(format!(
                    "edges {i} and {j} intersect"
                )));
            }
        }
    }

    Ok(())
}
