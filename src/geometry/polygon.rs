use super::vertex::{VertexId, VertexStore};
use crate::error::GeometryError;
use crate::math::polygon_2d::{perimeter_2d, signed_area_2d, validate_simple_2d};
use crate::math::Point2;

/// A simple polygon: a closed, cyclic sequence of vertex IDs.
///
/// The last vertex connects back to the first; the closing vertex is not
/// repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<VertexId>,
}

impl Polygon {
    /// Validates `points` and inserts them into `store` as a new polygon.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPolygon` if the points do not form a
    /// simple polygon with non-zero area.
    pub fn from_points(store: &mut VertexStore, points: &[Point2]) -> Result<Self, GeometryError> {
        validate_simple_2d(points)?;
        let vertices = points.iter().map(|&p| store.insert(p)).collect();
        Ok(Self { vertices })
    }

    /// Vertex IDs in boundary order.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of boundary vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Boundary positions in order.
    #[must_use]
    pub fn points(&self, store: &VertexStore) -> Vec<Point2> {
        store.resolve(&self.vertices)
    }

    /// Unsigned enclosed area.
    #[must_use]
    pub fn area(&self, store: &VertexStore) -> f64 {
        signed_area_2d(&self.points(store)).abs()
    }

    /// Length of the closed boundary.
    #[must_use]
    pub fn perimeter(&self, store: &VertexStore) -> f64 {
        perimeter_2d(&self.points(store))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_points_inserts_every_vertex() {
        let mut store = VertexStore::new();
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 3.0),
        ];
        let poly = Polygon::from_points(&mut store, &pts).unwrap();
        assert_eq!(poly.len(), 3);
        assert_eq!(store.len(), 3);
        assert!((poly.area(&store) - 6.0).abs() < 1e-12);
        assert!((poly.perimeter(&store) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_points_leave_store_untouched() {
        let mut store = VertexStore::new();
        let err = Polygon::from_points(&mut store, &[Point2::new(0.0, 0.0)]);
        assert!(matches!(err, Err(GeometryError::InvalidPolygon(_))));
        assert!(store.is_empty());
    }
}
