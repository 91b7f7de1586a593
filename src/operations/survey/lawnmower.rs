use std::collections::VecDeque;

use super::slice::SlicingSegment;
use crate::math::Point2;

/// A continuous flight leg: chained segments, each starting where the
/// previous one ends.
#[derive(Debug, Clone, PartialEq)]
pub struct LawnmowerLine {
    pub segments: Vec<SlicingSegment>,
}

impl LawnmowerLine {
    /// Start of the first segment.
    #[must_use]
    pub fn start(&self) -> Option<Point2> {
        self.segments.first().map(|s| s.start)
    }

    /// End of the last segment.
    #[must_use]
    pub fn end(&self) -> Option<Point2> {
        self.segments.last().map(|s| s.end)
    }

    /// One point per segment boundary, start to end.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            points.push(first.start);
        }
        points.extend(self.segments.iter().map(|s| s.end));
        points
    }

    /// Total length of the chained segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments.iter().map(SlicingSegment::length).sum()
    }
}

/// Finds the unvisited segment with an endpoint nearest `anchor`, within
/// `tolerance`. Returns its index and whether its end (not its start) touches.
fn nearest_touching(
    segments: &[SlicingSegment],
    visited: &[bool],
    anchor: &Point2,
    tolerance: f64,
) -> Option<(usize, bool)> {
    let mut best: Option<(f64, usize, bool)> = None;
    for (j, seg) in segments.iter().enumerate() {
        if visited[j] {
            continue;
        }
        for (dist, at_end) in [
            (nalgebra::distance(&seg.start, anchor), false),
            (nalgebra::distance(&seg.end, anchor), true),
        ] {
            if dist < tolerance && best.is_none_or(|(d, _, _)| dist < d) {
                best = Some((dist, j, at_end));
            }
        }
    }
    best.map(|(_, j, at_end)| (j, at_end))
}

fn connections(
    segments: &[SlicingSegment],
    visited: &[bool],
    point: &Point2,
    tolerance: f64,
) -> usize {
    segments
        .iter()
        .zip(visited)
        .filter(|&(seg, &done)| {
            !done
                && (nalgebra::distance(&seg.start, point) < tolerance
                    || nalgebra::distance(&seg.end, point) < tolerance)
        })
        .count()
}

/// Chains segments whose endpoints touch within `tolerance` into lawnmower
/// lines.
///
/// Each chain starts from its seed's less connected endpoint, grows forward
/// from the tail, then backward from the head. Every segment ends up in
/// exactly one line.
#[must_use]
pub fn build_lines(segments: &[SlicingSegment], tolerance: f64) -> Vec<LawnmowerLine> {
    let mut visited = vec![false; segments.len()];
    let mut lines = Vec::new();

    for i in 0..segments.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let mut seed = segments[i];
        let at_start = connections(segments, &visited, &seed.start, tolerance);
        let at_end = connections(segments, &visited, &seed.end, tolerance);
        if at_start > at_end {
            seed = seed.reversed();
        }

        let mut chain = VecDeque::from([seed]);
        while let Some(tail) = chain.back().map(|s| s.end) {
            let Some((j, at_end)) = nearest_touching(segments, &visited, &tail, tolerance) else {
                break;
            };
            visited[j] = true;
            chain.push_back(if at_end { segments[j].reversed() } else { segments[j] });
        }
        while let Some(head) = chain.front().map(|s| s.start) {
            let Some((j, at_end)) = nearest_touching(segments, &visited, &head, tolerance) else {
                break;
            };
            visited[j] = true;
            chain.push_front(if at_end { segments[j] } else { segments[j].reversed() });
        }

        lines.push(LawnmowerLine {
            segments: chain.into(),
        });
    }
    lines
}
