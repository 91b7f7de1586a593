use slotmap::SecondaryMap;
use tracing::debug;

use super::classify::Classification;
use crate::error::PlanningError;
use crate::geometry::{Polyline, VertexId, VertexStore};
use crate::math::intersect_2d::segments_cross_2d;
use crate::math::polygon_2d::{point_in_polygon_2d, signed_area_2d};
use crate::math::{Point2, POINT_TOLERANCE};

/// Two vertices, one on each Following polyline, defining an internal cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrespondingPair {
    pub a: VertexId,
    pub b: VertexId,
}

impl CorrespondingPair {
    /// Returns `true` if `{u, v}` is this pair in either order.
    #[must_use]
    pub fn matches(&self, u: VertexId, v: VertexId) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }
}

/// A simple sub-polygon produced by cutting along corresponding pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub vertices: Vec<VertexId>,
}

impl Cell {
    /// Cyclic edges of the cell.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Cell boundary positions.
    #[must_use]
    pub fn points(&self, store: &VertexStore) -> Vec<Point2> {
        store.resolve(&self.vertices)
    }

    /// Unsigned cell area.
    #[must_use]
    pub fn area(&self, store: &VertexStore) -> f64 {
        signed_area_2d(&self.points(store)).abs()
    }
}

/// Cells together with the pairs that produced them.
#[derive(Debug, Clone, Default)]
pub struct CellDecomposition {
    /// Polygon boundary in traversal order, starting at the canonical seed.
    pub boundary: Vec<VertexId>,
    /// Pairs actually used as cuts, in cut order.
    pub pairs: Vec<CorrespondingPair>,
    pub cells: Vec<Cell>,
}

/// Undirected vertex adjacency built from every polyline edge.
fn build_adjacency(polylines: &[Polyline]) -> SecondaryMap<VertexId, Vec<VertexId>> {
    let mut adjacency: SecondaryMap<VertexId, Vec<VertexId>> = SecondaryMap::new();
    for polyline in polylines {
        for (u, v) in polyline.edges() {
            if u == v {
                continue;
            }
            for (from, to) in [(u, v), (v, u)] {
                if let Some(neighbours) = adjacency.entry(from).map(|e| e.or_default()) {
                    if !neighbours.contains(&to) {
                        neighbours.push(to);
                    }
                }
            }
        }
    }
    adjacency
}

/// Walks the boundary once from the first vertex of `longest`, taking its
/// first edge and then always the unvisited neighbour.
fn traverse(
    adjacency: &SecondaryMap<VertexId, Vec<VertexId>>,
    longest: &Polyline,
) -> Result<Vec<VertexId>, PlanningError> {
    let (Some(&seed), Some(&second)) = (longest.vertices.first(), longest.vertices.get(1)) else {
        return Err(PlanningError::InvalidDecomposition(
            "longest polyline has fewer than 2 points".to_owned(),
        ));
    };

    let mut visited: SecondaryMap<VertexId, ()> = SecondaryMap::new();
    visited.insert(seed, ());
    visited.insert(second, ());
    let mut order = vec![seed, second];
    let mut current = second;
    while let Some(&next) = adjacency
        .get(current)
        .and_then(|neighbours| neighbours.iter().find(|n| !visited.contains_key(**n)))
    {
        visited.insert(next, ());
        order.push(next);
        current = next;
    }

    if order.len() != adjacency.len() {
        return Err(PlanningError::InvalidDecomposition(format!(
            "boundary walk reached {} of {} vertices",
            order.len(),
            adjacency.len()
        )));
    }
    Ok(order)
}

/// Index-matches the interior points of the two Following polylines and keeps
/// the pairs whose cut lies inside the polygon.
fn corresponding_pairs(
    store: &VertexStore,
    polylines: &[Polyline],
    classification: &Classification,
    boundary: &[VertexId],
    position: &SecondaryMap<VertexId, usize>,
) -> Vec<CorrespondingPair> {
    let Some((f1, f2)) = classification.following_pair() else {
        return Vec::new();
    };
    let first = &polylines[f1];
    let mut second = polylines[f2].vertices.clone();

    let heads_joined = match (first.first(), polylines[f2].first()) {
        (Some(a), Some(b)) => classification
            .heading
            .iter()
            .any(|&h| polylines[h].joins(a, b)),
        _ => false,
    };
    if !heads_joined {
        second.reverse();
    }

    let outline = store.resolve(boundary);
    let n = outline.len();
    let len = first.len().min(second.len());
    let mut pairs = Vec::new();
    for i in 1..len.saturating_sub(1) {
        let pair = CorrespondingPair {
            a: first.vertices[i],
            b: second[i],
        };
        let (pa, pb) = (store[pair.a], store[pair.b]);
        if pair.a == pair.b || nalgebra::distance(&pa, &pb) < POINT_TOLERANCE {
            debug!(index = i, "dropped zero-length pair");
            continue;
        }
        if !point_in_polygon_2d(&nalgebra::center(&pa, &pb), &outline) {
            debug!(index = i, "dropped pair with midpoint outside polygon");
            continue;
        }
        let crosses = (0..n).any(|k| segments_cross_2d(&pa, &pb, &outline[k], &outline[(k + 1) % n]));
        if crosses {
            debug!(index = i, "dropped pair crossing the boundary");
            continue;
        }
        pairs.push(pair);
    }

    pairs.sort_by_key(|p| position.get(p.a).copied().unwrap_or(usize::MAX));
    pairs
}

/// Cuts the polygon into cells along the corresponding pairs of the two
/// Following polylines.
///
/// `polylines` must already be classified and equalized. The boundary is
/// rebuilt from polyline edges so vertices added by equalization take part.
///
/// # Errors
///
/// Returns `PlanningError::InvalidDecomposition` if the boundary walk does not
/// reach every vertex, or if a cut would leave a cell or the remaining
/// boundary with fewer than 3 vertices.
pub fn decompose_cells(
    store: &VertexStore,
    polylines: &[Polyline],
    classification: &Classification,
) -> Result<CellDecomposition, PlanningError> {
    let primary = classification
        .primary()
        .ok_or(PlanningError::InsufficientPolylines { found: 0 })?;

    // Step 1: Connectivity graph and canonical boundary order.
    let adjacency = build_adjacency(polylines);
    let boundary = traverse(&adjacency, &polylines[primary])?;
    let mut position: SecondaryMap<VertexId, usize> = SecondaryMap::new();
    for (i, &v) in boundary.iter().enumerate() {
        position.insert(v, i);
    }

    // Step 2: Candidate cuts.
    let candidates = corresponding_pairs(store, polylines, classification, &boundary, &position);
    debug!(candidates = candidates.len(), "corresponding pairs");

    // Step 3: Cut along each pair in turn.
    let mut pairs = Vec::new();
    let mut cells = Vec::new();
    let mut worklist = vec![(boundary.clone(), candidates)];
    while let Some((current, remaining)) = worklist.pop() {
        if current.len() < 3 {
            return Err(PlanningError::InvalidDecomposition(format!(
                "boundary reduced to {} vertices",
                current.len()
            )));
        }
        let Some((pair, rest)) = remaining.split_first() else {
            cells.push(Cell { vertices: current });
            continue;
        };

        let located = (
            current.iter().position(|&v| v == pair.a),
            current.iter().position(|&v| v == pair.b),
        );
        let (Some(i), Some(j)) = located else {
            debug!("dropped pair no longer on the boundary");
            worklist.push((current, rest.to_vec()));
            continue;
        };
        let (lo, hi) = (i.min(j), i.max(j));

        let cell: Vec<VertexId> = current[..=lo].iter().chain(&current[hi..]).copied().collect();
        let next: Vec<VertexId> = current[lo..=hi].to_vec();
        if cell.len() < 3 {
            return Err(PlanningError::InvalidDecomposition(format!(
                "cut produced a cell with {} vertices",
                cell.len()
            )));
        }

        let next_pairs = rest
            .iter()
            .filter(|p| next.contains(&p.a) && next.contains(&p.b))
            .copied()
            .collect();
        pairs.push(*pair);
        cells.push(Cell { vertices: cell });
        worklist.push((next, next_pairs));
    }

    debug!(cells = cells.len(), pairs = pairs.len(), "cut polygon into cells");
    Ok(CellDecomposition {
        boundary,
        pairs,
        cells,
    })
}
