use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let delta = p2 - p1;
    let t = delta.perp(d2) / cross;
    let u = delta.perp(d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel (including collinear) segments report no intersection.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Intersection of the infinite line `origin + s * dir` with the segment
/// `b0 → b1`.
///
/// Returns `(point, s)`; `s` is the signed projection along `dir` when `dir`
/// is a unit vector.
#[must_use]
pub fn line_segment_intersect_2d(
    origin: &Point2,
    dir: &Vector2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64)> {
    let db = b1 - b0;
    let (s, u) = line_line_intersect_2d(origin, dir, b0, &db)?;
    let eps = TOLERANCE;
    if u >= -eps && u <= 1.0 + eps {
        Some((b0 + db * u.clamp(0.0, 1.0), s))
    } else {
        None
    }
}

/// Returns `true` if segment `a0 → a1` meets `b0 → b1` anywhere other than at
/// a shared endpoint, including collinear overlap.
#[must_use]
pub fn segments_cross_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;
    if da.perp(&db).abs() < TOLERANCE {
        // Parallel: only collinear overlap counts.
        if da.perp(&(b0 - a0)).abs() > TOLERANCE * da.norm().max(1.0) {
            return false;
        }
        let len_sq = da.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return false;
        }
        let s0 = (b0 - a0).dot(&da) / len_sq;
        let s1 = (b1 - a0).dot(&da) / len_sq;
        let (lo, hi) = (s0.min(s1), s0.max(s1));
        return hi.min(1.0) - lo.max(0.0) > TOLERANCE;
    }

    match segment_segment_intersect_2d(a0, a1, b0, b1) {
        Some((pt, _, _)) => {
            let shared = [a0, a1]
                .iter()
                .any(|a| [b0, b1].iter().any(|b| nalgebra::distance(*a, *b) < TOLERANCE))
                && [a0, a1, b0, b1]
                    .iter()
                    .any(|end| nalgebra::distance(*end, &pt) < TOLERANCE);
            !shared
        }
        None => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_segments() {
        let (pt, t, u) =
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0))
                .unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE && (pt.y - 1.0).abs() < TOLERANCE);
        assert!((t - 0.5).abs() < TOLERANCE && (u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn disjoint_segments() {
        assert!(segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(2.0, -1.0),
            &p(2.0, 1.0)
        )
        .is_none());
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let d = Vector2::new(1.0, 0.0);
        assert!(line_line_intersect_2d(&p(0.0, 0.0), &d, &p(0.0, 1.0), &d).is_none());
    }

    #[test]
    fn line_hits_segment_behind_origin() {
        // Infinite line: the hit may lie at negative s.
        let (pt, s) = line_segment_intersect_2d(
            &p(5.0, 1.0),
            &Vector2::new(1.0, 0.0),
            &p(0.0, 0.0),
            &p(0.0, 2.0),
        )
        .unwrap();
        assert!((s + 5.0).abs() < TOLERANCE, "s={s}");
        assert!(pt.x.abs() < TOLERANCE && (pt.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_misses_short_segment() {
        assert!(line_segment_intersect_2d(
            &p(0.0, 5.0),
            &Vector2::new(1.0, 0.0),
            &p(3.0, 0.0),
            &p(3.0, 2.0)
        )
        .is_none());
    }

    #[test]
    fn shared_endpoint_is_not_a_crossing() {
        assert!(!segments_cross_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)));
    }

    #[test]
    fn t_junction_is_a_crossing() {
        assert!(segments_cross_2d(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)));
    }

    #[test]
    fn collinear_overlap_is_a_crossing() {
        assert!(segments_cross_2d(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0)));
        assert!(!segments_cross_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0)));
    }
}
