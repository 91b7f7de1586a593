use std::ops::Index;

use slotmap::SlotMap;

use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the vertex store.
    pub struct VertexId;
}

/// Append-only arena owning every planar vertex of a planning run.
///
/// Polygons, polylines, pairs and cells reference vertices by [`VertexId`],
/// so identity comparison is a key comparison. Vertices are never moved or
/// removed once inserted; equalization only appends.
#[derive(Debug, Default, Clone)]
pub struct VertexStore {
    points: SlotMap<VertexId, Point2>,
}

impl VertexStore {
    /// Creates a new, empty vertex store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex and returns its ID.
    pub fn insert(&mut self, point: Point2) -> VertexId {
        self.points.insert(point)
    }

    /// Returns the position of a vertex, or `None` if the ID is foreign.
    #[must_use]
    pub fn get(&self, id: VertexId) -> Option<Point2> {
        self.points.get(id).copied()
    }

    /// Resolves a sequence of IDs to positions.
    #[must_use]
    pub fn resolve(&self, ids: &[VertexId]) -> Vec<Point2> {
        ids.iter().map(|&id| self[id]).collect()
    }

    /// Number of vertices stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the store holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Index<VertexId> for VertexStore {
    type Output = Point2;

    fn index(&self, id: VertexId) -> &Point2 {
        &self.points[id]
    }
}
