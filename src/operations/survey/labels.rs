use std::collections::HashSet;

use super::cells::{Cell, CorrespondingPair};
use super::classify::Classification;
use crate::geometry::{Polyline, VertexId};

/// Role of a cell edge, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeRole {
    /// Lies on the longest Following polyline.
    Direction,
    /// Is one of the accepted cuts.
    Corresponding,
    /// Lies on a Heading polyline.
    Heading,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabeledEdge {
    pub start: VertexId,
    pub end: VertexId,
    pub role: EdgeRole,
}

/// A cell with every edge labeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledCell {
    /// Position of the cell in cut order.
    pub index: usize,
    pub vertices: Vec<VertexId>,
    /// Edges in boundary order; edge `i` starts at `vertices[i]`.
    pub edges: Vec<LabeledEdge>,
}

impl LabeledCell {
    /// Edges with the given role, in boundary order.
    pub fn edges_with(&self, role: EdgeRole) -> impl Iterator<Item = &LabeledEdge> + '_ {
        self.edges.iter().filter(move |e| e.role == role)
    }

    /// Number of edges with the given role.
    #[must_use]
    pub fn count(&self, role: EdgeRole) -> usize {
        self.edges_with(role).count()
    }
}

fn key(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Labels every edge of every cell by vertex identity.
#[must_use]
pub fn label_cells(
    cells: &[Cell],
    polylines: &[Polyline],
    classification: &Classification,
    pairs: &[CorrespondingPair],
) -> Vec<LabeledCell> {
    let direction: HashSet<_> = classification
        .primary()
        .map(|i| polylines[i].edges().map(|(u, v)| key(u, v)).collect())
        .unwrap_or_default();
    let corresponding: HashSet<_> = pairs.iter().map(|p| key(p.a, p.b)).collect();
    let heading: HashSet<_> = classification
        .heading
        .iter()
        .flat_map(|&i| polylines[i].edges())
        .map(|(u, v)| key(u, v))
        .collect();

    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let edges = cell
                .edges()
                .map(|(start, end)| {
                    let k = key(start, end);
                    let role = if direction.contains(&k) {
                        EdgeRole::Direction
                    } else if corresponding.contains(&k) {
                        EdgeRole::Corresponding
                    } else if heading.contains(&k) {
                        EdgeRole::Heading
                    } else {
                        EdgeRole::Other
                    };
                    LabeledEdge { start, end, role }
                })
                .collect();
            LabeledCell {
                index,
                vertices: cell.vertices.clone(),
                edges,
            }
        })
        .collect()
}
