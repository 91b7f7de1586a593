use std::f64::consts::PI;

use super::{Point2, TOLERANCE};

/// Perpendicular projection of `p` onto the segment `a → b`.
///
/// Returns the closest point on the segment and its parameter `t`, clamped to
/// `[0, 1]`. Returns `None` for a degenerate (zero-length) segment.
#[must_use]
pub fn project_onto_segment(p: &Point2, a: &Point2, b: &Point2) -> Option<(Point2, f64)> {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }

    // Project onto the infinite line, clamp to the segment.
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    Some((a + d * t, t))
}

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    match project_onto_segment(p, a, b) {
        Some((closest, _)) => nalgebra::distance(p, &closest),
        // Degenerate segment: point-to-point distance.
        None => nalgebra::distance(p, a),
    }
}

/// Absolute turning angle at `curr`, in degrees, for the path
/// `prev → curr → next`.
///
/// `0` means the path continues straight on, `180` means it doubles back.
#[must_use]
pub fn turning_angle_deg(prev: &Point2, curr: &Point2, next: &Point2) -> f64 {
    let incoming = curr - prev;
    let outgoing = next - curr;
    let mut delta = outgoing.y.atan2(outgoing.x) - incoming.y.atan2(incoming.x);

    while delta > PI {
        delta -= 2.0 * PI;
    }
    while delta < -PI {
        delta += 2.0 * PI;
    }
    delta.abs().to_degrees()
}
