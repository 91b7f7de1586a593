use serde::{Deserialize, Serialize};

use super::lawnmower::LawnmowerLine;
use crate::math::Point2;

/// One point of the final flight path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
}

impl Waypoint {
    #[must_use]
    pub fn new(point: Point2, altitude: f64) -> Self {
        Self {
            x: point.x,
            y: point.y,
            altitude,
        }
    }

    /// Planar position of the waypoint.
    #[must_use]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Orders lawnmower lines into a single waypoint path.
///
/// The path enters at the line endpoint closest to either end of
/// `reference` (the longest Following polyline), or at that line's other end
/// when `start_opposite_end` is set. Each following line is the unvisited one
/// whose nearer endpoint is closest to the current position, entered at that
/// endpoint.
#[must_use]
pub fn sequence(
    lines: &[LawnmowerLine],
    reference: (Point2, Point2),
    altitude: f64,
    start_opposite_end: bool,
) -> Vec<Waypoint> {
    let lines: Vec<&LawnmowerLine> = lines.iter().filter(|l| !l.segments.is_empty()).collect();
    let ends: Vec<(Point2, Point2)> = lines
        .iter()
        .filter_map(|l| Some((l.start()?, l.end()?)))
        .collect();

    // Step 1: Entry line and endpoint nearest the reference.
    let mut best: Option<(f64, usize, bool)> = None;
    for (i, (start, end)) in ends.iter().enumerate() {
        for (point, from_end) in [(start, false), (end, true)] {
            for anchor in [&reference.0, &reference.1] {
                let dist = nalgebra::distance(point, anchor);
                if best.is_none_or(|(d, _, _)| dist < d) {
                    best = Some((dist, i, from_end));
                }
            }
        }
    }
    let Some((_, first, from_end)) = best else {
        return Vec::new();
    };

    let mut visited = vec![false; lines.len()];
    let mut waypoints = Vec::new();
    let emit = |index: usize, from_end: bool, waypoints: &mut Vec<Waypoint>| {
        let mut points = lines[index].points();
        if from_end {
            points.reverse();
        }
        waypoints.extend(points.into_iter().map(|p| Waypoint::new(p, altitude)));
    };

    visited[first] = true;
    emit(first, from_end != start_opposite_end, &mut waypoints);

    // Step 2: Greedy nearest-neighbour over the remaining lines.
    while let Some(current) = waypoints.last().map(Waypoint::position) {
        let mut next: Option<(f64, usize, bool)> = None;
        for (i, (start, end)) in ends.iter().enumerate() {
            if visited[i] {
                continue;
            }
            for (point, from_end) in [(start, false), (end, true)] {
                let dist = nalgebra::distance(point, &current);
                if next.is_none_or(|(d, _, _)| dist < d) {
                    next = Some((dist, i, from_end));
                }
            }
        }
        let Some((_, index, from_end)) = next else {
            break;
        };
        visited[index] = true;
        emit(index, from_end, &mut waypoints);
    }
    waypoints
}
