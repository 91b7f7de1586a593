use tracing::debug;

use crate::error::PlanningWarning;
use crate::geometry::{Polyline, VertexId, VertexStore};
use crate::math::distance_2d::project_onto_segment;
use crate::math::Point2;

/// Outcome of equalizing the two Following polylines.
#[derive(Debug, Clone, Default)]
pub struct Equalization {
    /// Vertices added to the shorter polyline, in splice order.
    pub inserted: Vec<VertexId>,
    /// Set when fewer points than required could be inserted.
    pub warning: Option<PlanningWarning>,
}

struct Insertion {
    edge: usize,
    t: f64,
    point: Point2,
}

/// Inserts points into the Following polyline with fewer points until both
/// have the same count.
///
/// The interior points of the longer polyline are ranked by their distance to
/// the nearest point of the shorter one, farthest first, and each is projected
/// onto its closest edge of the shorter polyline. Projections within
/// `tolerance` of an existing vertex or of an earlier insertion are skipped in
/// favour of the next-ranked point. New vertices are appended to `store`.
pub fn equalize(
    store: &mut VertexStore,
    polylines: &mut [Polyline],
    (first, second): (usize, usize),
    tolerance: f64,
) -> Equalization {
    let (long_idx, short_idx) = if polylines[first].len() >= polylines[second].len() {
        (first, second)
    } else {
        (second, first)
    };
    let required = polylines[long_idx].len() - polylines[short_idx].len();
    if required == 0 {
        return Equalization::default();
    }

    let short_points = store.resolve(&polylines[short_idx].vertices);

    // Step 1: Rank interior points of the longer run, farthest first.
    let mut candidates: Vec<(Point2, f64)> = polylines[long_idx]
        .interior()
        .iter()
        .map(|&id| {
            let p = store[id];
            let nearest = short_points
                .iter()
                .map(|q| nalgebra::distance(&p, q))
                .fold(f64::INFINITY, f64::min);
            (p, nearest)
        })
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    // Step 2: Project onto the closest edge, skipping duplicates.
    let mut accepted: Vec<Insertion> = Vec::with_capacity(required);
    for (p, _) in candidates {
        if accepted.len() == required {
            break;
        }

        let mut best: Option<(Insertion, f64)> = None;
        for (edge, w) in short_points.windows(2).enumerate() {
            let Some((point, t)) = project_onto_segment(&p, &w[0], &w[1]) else {
                continue;
            };
            let dist = nalgebra::distance(&p, &point);
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((Insertion { edge, t, point }, dist));
            }
        }
        let Some((insertion, _)) = best else {
            continue;
        };

        let duplicate = short_points
            .iter()
            .chain(accepted.iter().map(|a| &a.point))
            .any(|q| nalgebra::distance(q, &insertion.point) < tolerance);
        if duplicate {
            debug!(x = insertion.point.x, y = insertion.point.y, "skipped duplicate projection");
            continue;
        }
        accepted.push(insertion);
    }

    // Step 3: Splice insertions into their edges in order along each edge.
    accepted.sort_by(|a, b| a.edge.cmp(&b.edge).then_with(|| a.t.total_cmp(&b.t)));
    let old = std::mem::take(&mut polylines[short_idx].vertices);
    let mut spliced = Vec::with_capacity(old.len() + accepted.len());
    let mut inserted = Vec::with_capacity(accepted.len());
    let mut pending = accepted.iter().peekable();
    for (i, &vertex) in old.iter().enumerate() {
        spliced.push(vertex);
        while let Some(ins) = pending.next_if(|ins| ins.edge == i) {
            let id = store.insert(ins.point);
            spliced.push(id);
            inserted.push(id);
        }
    }
    polylines[short_idx].vertices = spliced;

    let warning = (inserted.len() < required).then(|| PlanningWarning::IncompletePairing {
        required,
        inserted: inserted.len(),
    });
    Equalization { inserted, warning }
}
