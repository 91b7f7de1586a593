use tracing::debug;

use super::labels::{EdgeRole, LabeledCell, LabeledEdge};
use crate::geometry::{VertexId, VertexStore};
use crate::math::intersect_2d::line_segment_intersect_2d;
use crate::math::polygon_2d::{bounds_2d, contains_point_2d};
use crate::math::{Point2, Vector2, POINT_TOLERANCE, TOLERANCE};

/// Distance along an edge below which a survey point is moved off the vertex.
const VERTEX_CLEARANCE: f64 = 1e-6;

/// Replacement distance for points that would sit on a vertex.
const NUDGE_DISTANCE: f64 = 1e-3;

/// A candidate survey-line segment inside one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicingSegment {
    pub start: Point2,
    pub end: Point2,
    /// Index of the cell the segment was cut from.
    pub cell: usize,
}

impl SlicingSegment {
    #[must_use]
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.start, &self.end)
    }

    /// The same segment traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            cell: self.cell,
        }
    }
}

/// Chord of the longest contiguous run of Direction edges.
#[derive(Debug, Clone, Copy)]
struct DirectionRun {
    start: VertexId,
    end: VertexId,
}

impl DirectionRun {
    fn touches(&self, edge: &LabeledEdge) -> bool {
        [self.start, self.end]
            .iter()
            .any(|&v| v == edge.start || v == edge.end)
    }
}

/// Finds the longest run of consecutive Direction edges, wrapping around the
/// cell boundary.
fn direction_run(cell: &LabeledCell, store: &VertexStore) -> Option<DirectionRun> {
    let n = cell.edges.len();
    let is_direction = |i: usize| cell.edges[i % n].role == EdgeRole::Direction;
    if n == 0 || !(0..n).any(is_direction) {
        return None;
    }
    if (0..n).all(is_direction) {
        return Some(DirectionRun {
            start: cell.edges[0].start,
            end: cell.edges[n - 1].end,
        });
    }

    let mut best: Option<(f64, DirectionRun)> = None;
    for first in (0..n).filter(|&i| is_direction(i) && !is_direction(i + n - 1)) {
        let mut last = first;
        let mut length = 0.0;
        while is_direction(last) {
            let edge = &cell.edges[last % n];
            length += nalgebra::distance(&store[edge.start], &store[edge.end]);
            last += 1;
        }
        let run = DirectionRun {
            start: cell.edges[first].start,
            end: cell.edges[(last - 1) % n].end,
        };
        if best.as_ref().is_none_or(|(l, _)| length > *l) {
            best = Some((length, run));
        }
    }
    best.map(|(_, run)| run)
}

/// Chord of the cell boundary between the first and last points on the
/// infinite line through `origin` along `dir` whose midpoint is inside the
/// cell, chosen nearest to `origin`.
fn ray_span(outline: &[Point2], origin: &Point2, dir: &Vector2) -> Option<(Point2, Point2)> {
    let n = outline.len();
    let mut hits: Vec<(Point2, f64)> = Vec::new();
    for i in 0..n {
        let Some((point, s)) = line_segment_intersect_2d(origin, dir, &outline[i], &outline[(i + 1) % n])
        else {
            continue;
        };
        if !hits.iter().any(|(q, _)| nalgebra::distance(q, &point) < POINT_TOLERANCE) {
            hits.push((point, s));
        }
    }
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut best: Option<(f64, Point2, Point2)> = None;
    for w in hits.windows(2) {
        let ((p0, s0), (p1, s1)) = (w[0], w[1]);
        if s1 - s0 < POINT_TOLERANCE {
            continue;
        }
        if !contains_point_2d(&nalgebra::center(&p0, &p1), outline, POINT_TOLERANCE) {
            continue;
        }
        let gap = if s0 <= 0.0 && s1 >= 0.0 { 0.0 } else { s0.abs().min(s1.abs()) };
        if best.as_ref().is_none_or(|(g, _, _)| gap < *g) {
            best = Some((gap, p0, p1));
        }
    }
    best.map(|(_, p0, p1)| (p0, p1))
}

fn march_distance(start_offset: f64, spacing: f64, i: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let d = start_offset + i as f64 * spacing;
    if d < VERTEX_CLEARANCE {
        NUDGE_DISTANCE
    } else {
        d
    }
}

/// Orients `edge` so it starts at the endpoint nearest the direction run.
fn orient_from_run(store: &VertexStore, edge: &LabeledEdge, d1: &Point2, d2: &Point2) -> (Point2, Point2) {
    let (a, b) = (store[edge.start], store[edge.end]);
    let near = |p: &Point2| nalgebra::distance(p, d1).min(nalgebra::distance(p, d2));
    if near(&b) < near(&a) {
        (b, a)
    } else {
        (a, b)
    }
}

/// Orients the single corresponding edge so it leaves the direction run.
fn orient_single(store: &VertexStore, edge: &LabeledEdge, d1: &Point2, d2: &Point2) -> (Point2, Point2) {
    let (c1, c2) = (store[edge.start], store[edge.end]);
    let same = |p: &Point2, q: &Point2| nalgebra::distance(p, q) < POINT_TOLERANCE;
    if same(&c1, d2) {
        (c1, c2)
    } else if same(&c2, d2) || same(&c2, d1) {
        (c2, c1)
    } else if same(&c1, d1) {
        (c1, c2)
    } else if nalgebra::distance(&c2, d2) < nalgebra::distance(&c1, d2) {
        (c2, c1)
    } else {
        (c1, c2)
    }
}

/// Slices one labeled cell into parallel survey segments.
///
/// Returns `None` when the cell has no direction run or no edge to march
/// along; the caller records the skip.
#[must_use]
pub fn slice_cell(
    store: &VertexStore,
    cell: &LabeledCell,
    line_spacing: f64,
    start_offset: f64,
) -> Option<Vec<SlicingSegment>> {
    let run = direction_run(cell, store)?;
    let (d1, d2) = (store[run.start], store[run.end]);
    let direction = (d2 - d1).try_normalize(TOLERANCE)?;
    let outline = store.resolve(&cell.vertices);

    let mut corresponding: Vec<&LabeledEdge> = cell.edges_with(EdgeRole::Corresponding).collect();
    if corresponding.is_empty() {
        corresponding = cell
            .edges_with(EdgeRole::Heading)
            .filter(|e| run.touches(e))
            .collect();
        debug!(cell = cell.index, fallback = corresponding.len(), "using heading edges as corresponding");
    }

    let slicer = Slicer {
        cell: cell.index,
        outline: &outline,
        line_spacing,
        start_offset,
    };
    let segments = match corresponding.as_slice() {
        [] => return None,
        [edge] => {
            let (start, end) = orient_single(store, edge, &d1, &d2);
            slicer.one_edge(start, end, &direction)
        }
        [first, second, ..] => {
            let e1 = orient_from_run(store, first, &d1, &d2);
            let e2 = orient_from_run(store, second, &d1, &d2);
            slicer.two_edge(e1, e2, &direction)
        }
    };
    debug!(cell = cell.index, segments = segments.len(), "sliced cell");
    Some(segments)
}

struct Slicer<'a> {
    cell: usize,
    outline: &'a [Point2],
    line_spacing: f64,
    start_offset: f64,
}

impl Slicer<'_> {
    fn segment(&self, start: Point2, end: Point2) -> SlicingSegment {
        SlicingSegment {
            start,
            end,
            cell: self.cell,
        }
    }

    /// Marches along `start → end` (past its end if needed) and casts a line
    /// parallel to `direction` at each step.
    fn one_edge(&self, start: Point2, end: Point2, direction: &Vector2) -> Vec<SlicingSegment> {
        let Some(step_dir) = (end - start).try_normalize(TOLERANCE) else {
            return Vec::new();
        };
        let max_steps = bounds_2d(self.outline).map_or(0, |(min, max)| {
            let diagonal = nalgebra::distance(&min, &max);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let steps = (diagonal / self.line_spacing).ceil() as usize;
            steps + 2
        });

        let mut segments = Vec::new();
        for i in 0..max_steps {
            let origin = start + step_dir * march_distance(self.start_offset, self.line_spacing, i);
            let Some((p0, p1)) = ray_span(self.outline, &origin, direction) else {
                break;
            };
            segments.push(self.segment(p0, p1));
        }
        segments
    }

    /// Places matching points along two edges and joins them index-wise.
    fn two_edge(
        &self,
        (s1, e1): (Point2, Point2),
        (s2, e2): (Point2, Point2),
        direction: &Vector2,
    ) -> Vec<SlicingSegment> {
        let (len1, len2) = (nalgebra::distance(&s1, &e1), nalgebra::distance(&s2, &e2));
        let (Some(u1), Some(u2)) = ((e1 - s1).try_normalize(TOLERANCE), (e2 - s2).try_normalize(TOLERANCE))
        else {
            return Vec::new();
        };
        let max_len = len1.max(len2);
        if max_len < self.start_offset {
            return Vec::new();
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = ((max_len - self.start_offset) / self.line_spacing).floor() as usize + 1;
        let mut points1 = Vec::new();
        let mut points2 = Vec::new();
        for i in 0..count {
            let d = march_distance(self.start_offset, self.line_spacing, i);
            if d <= len1 + TOLERANCE {
                points1.push(s1 + u1 * d.min(len1));
            }
            if d <= len2 + TOLERANCE {
                points2.push(s2 + u2 * d.min(len2));
            }
        }

        let mut segments: Vec<SlicingSegment> = points1
            .iter()
            .zip(&points2)
            .map(|(&a, &b)| self.segment(a, b))
            .collect();

        // Points left over on the longer edge are cut with a ray.
        let excess = if points1.len() > points2.len() {
            &points1[points2.len()..]
        } else {
            &points2[points1.len()..]
        };
        let ray_dir = segments
            .last()
            .and_then(|s| (s.end - s.start).try_normalize(TOLERANCE))
            .unwrap_or(*direction);
        for origin in excess {
            let Some((p0, p1)) = ray_span(self.outline, origin, &ray_dir) else {
                break;
            };
            segments.push(self.segment(p0, p1));
        }
        segments
    }
}
