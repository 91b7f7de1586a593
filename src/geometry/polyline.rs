use super::vertex::{VertexId, VertexStore};
use crate::math::Point2;

/// Role of a boundary run relative to the survey direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolylineRole {
    /// Runs parallel to the survey lines.
    Following,
    /// Turn-around run between the following polylines.
    Heading,
}

/// One near-straight run of the polygon boundary.
///
/// Holds vertex IDs only; consecutive IDs form the run's edges. The role is
/// `None` until the classifier has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub vertices: Vec<VertexId>,
    pub role: Option<PolylineRole>,
}

impl Polyline {
    /// Creates an unclassified polyline.
    #[must_use]
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self {
            vertices,
            role: None,
        }
    }

    /// First vertex of the run.
    #[must_use]
    pub fn first(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }

    /// Last vertex of the run.
    #[must_use]
    pub fn last(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }

    /// Number of points in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the run has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Points strictly between the two endpoints.
    #[must_use]
    pub fn interior(&self) -> &[VertexId] {
        if self.vertices.len() < 3 {
            return &[];
        }
        &self.vertices[1..self.vertices.len() - 1]
    }

    /// Consecutive vertex pairs along the run.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }

    /// Sum of edge lengths.
    #[must_use]
    pub fn length(&self, store: &VertexStore) -> f64 {
        self.edges()
            .map(|(a, b)| nalgebra::distance(&store[a], &store[b]))
            .sum()
    }

    /// Returns `true` if this run contains `id`.
    #[must_use]
    pub fn contains(&self, id: VertexId) -> bool {
        self.vertices.contains(&id)
    }

    /// Returns `true` if the two runs share at least one vertex.
    #[must_use]
    pub fn shares_vertex(&self, other: &Polyline) -> bool {
        self.vertices.iter().any(|&v| other.contains(v))
    }

    /// Returns `true` if the run's endpoints are exactly `{a, b}`.
    #[must_use]
    pub fn joins(&self, a: VertexId, b: VertexId) -> bool {
        match (self.first(), self.last()) {
            (Some(f), Some(l)) => (f == a && l == b) || (f == b && l == a),
            _ => false,
        }
    }
}

/// Orders polylines longest first; exact ties fall back to the lexicographic
/// position of each run's first point so the order never depends on input
/// rotation.
pub fn sort_by_length_desc(polylines: &mut [Polyline], store: &VertexStore) {
    let start = |pl: &Polyline| pl.first().map_or_else(Point2::origin, |v| store[v]);
    polylines.sort_by(|a, b| {
        let (sa, sb) = (start(a), start(b));
        b.length(store)
            .total_cmp(&a.length(store))
            .then_with(|| sa.x.total_cmp(&sb.x))
            .then_with(|| sa.y.total_cmp(&sb.y))
    });
}
