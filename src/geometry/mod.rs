pub mod polygon;
pub mod polyline;
pub mod vertex;

pub use polygon::Polygon;
pub use polyline::{Polyline, PolylineRole};
pub use vertex::{VertexId, VertexStore};
