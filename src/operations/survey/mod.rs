pub mod cells;
pub mod classify;
pub mod decompose;
pub mod equalize;
pub mod labels;
pub mod lawnmower;
mod params;
pub mod sequence;
pub mod slice;

use tracing::{debug, warn};

use crate::error::{PlanningError, PlanningWarning, Result};
use crate::geometry::{Polygon, Polyline, VertexStore};
use crate::math::Point2;

pub use cells::CorrespondingPair;
pub use classify::Classification;
pub use labels::{EdgeRole, LabeledCell};
pub use lawnmower::LawnmowerLine;
pub use params::{SurveyParams, DEFAULT_CONNECTION_TOLERANCE, DEFAULT_TARGET_POLYLINES};
pub use sequence::Waypoint;
pub use slice::SlicingSegment;

/// Everything produced by one planning run.
///
/// Alongside the waypoints, the plan keeps each intermediate stage so callers
/// can draw or inspect them. All vertex IDs resolve against `store`.
#[derive(Debug, Clone)]
pub struct SurveyPlan {
    pub store: VertexStore,
    pub polygon: Polygon,
    /// Boundary runs, longest first, after equalization.
    pub polylines: Vec<Polyline>,
    pub classification: Classification,
    /// Angle threshold (degrees) chosen by the adaptive search.
    pub threshold: f64,
    /// Cuts actually used, in cut order.
    pub pairs: Vec<CorrespondingPair>,
    pub cells: Vec<LabeledCell>,
    pub segments: Vec<SlicingSegment>,
    pub lines: Vec<LawnmowerLine>,
    pub waypoints: Vec<Waypoint>,
    pub warnings: Vec<PlanningWarning>,
}

impl SurveyPlan {
    /// Length of the flown path, transitions included.
    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| nalgebra::distance(&w[0].position(), &w[1].position()))
            .sum()
    }
}

/// Plans a boustrophedon coverage path over a simple polygon.
///
/// The polygon is split into near-straight boundary runs, cut into cells
/// between its two longest opposite runs, and each cell is sliced into
/// parallel survey lines that are chained and ordered into waypoints.
#[derive(Debug, Clone)]
pub struct SurveyGrid {
    params: SurveyParams,
}

impl SurveyGrid {
    /// Creates a planner with the given parameters.
    #[must_use]
    pub fn new(params: SurveyParams) -> Self {
        Self { params }
    }

    /// Runs the full pipeline on `points`, given in boundary order.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidParameters` for unusable parameters,
    /// `GeometryError::InvalidPolygon` if `points` is not a simple polygon,
    /// `PlanningError::InsufficientPolylines` if the boundary yields fewer
    /// than 2 runs, or `PlanningError::InvalidDecomposition` if the cell cut
    /// degenerates.
    pub fn execute(&self, points: &[Point2]) -> Result<SurveyPlan> {
        let params = &self.params;
        params.validate()?;

        let mut store = VertexStore::new();
        let polygon = Polygon::from_points(&mut store, points)?;
        let mut warnings = Vec::new();

        // Step 1: Split the boundary into polylines.
        let decomposition = decompose::AdaptiveSearch::new(params.target_polylines)
            .with_steps(params.initial_angle_step, params.min_angle_step)
            .execute(&store, &polygon);
        let mut polylines = decomposition.polylines;
        debug!(
            threshold = decomposition.threshold,
            count = polylines.len(),
            exact = decomposition.exact,
            "decomposed boundary"
        );

        // Step 2: Following and Heading roles.
        let classification = classify::classify(&mut polylines)?;
        let reference = classification
            .primary()
            .and_then(|i| Some((polylines[i].first()?, polylines[i].last()?)))
            .map(|(a, b)| (store[a], store[b]))
            .ok_or(PlanningError::InsufficientPolylines {
                found: polylines.len(),
            })?;

        // Step 3: Equal point counts on both Following polylines.
        if let Some(pair) = classification.following_pair() {
            let equalization =
                equalize::equalize(&mut store, &mut polylines, pair, params.connection_tolerance);
            debug!(inserted = equalization.inserted.len(), "equalized following polylines");
            if let Some(warning) = equalization.warning {
                warn!(?warning, "following polylines keep a point-count mismatch");
                warnings.push(warning);
            }
        }

        // Step 4: Cut into cells.
        let cut = cells::decompose_cells(&store, &polylines, &classification)?;

        // Step 5: Label cell edges.
        let labeled = labels::label_cells(&cut.cells, &polylines, &classification, &cut.pairs);

        // Step 6: Slice each cell.
        let mut segments = Vec::new();
        for cell in &labeled {
            match slice::slice_cell(&store, cell, params.line_spacing, params.start_offset) {
                Some(cell_segments) => segments.extend(cell_segments),
                None => {
                    warn!(cell = cell.index, "cell has no edge to slice along, skipping");
                    warnings.push(PlanningWarning::CellSkipped { cell: cell.index });
                }
            }
        }

        // Step 7: Chain touching segments.
        let lines = lawnmower::build_lines(&segments, params.connection_tolerance);

        // Step 8: Order lines into waypoints.
        let waypoints = sequence::sequence(&lines, reference, params.altitude, params.start_opposite_end);
        debug!(
            cells = labeled.len(),
            segments = segments.len(),
            lines = lines.len(),
            waypoints = waypoints.len(),
            "survey planned"
        );

        Ok(SurveyPlan {
            store,
            polygon,
            polylines,
            classification,
            threshold: decomposition.threshold,
            pairs: cut.pairs,
            cells: labeled,
            segments,
            lines,
            waypoints,
            warnings,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, SurveyError};
    use approx::assert_relative_eq;

    fn pts(points: &[(f64, f64)]) -> Vec<Point2> {
        points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn rectangle_plan() {
        let plan = SurveyGrid::new(SurveyParams::new(40.0, 10.0))
            .execute(&pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 40.0), (0.0, 40.0)]))
            .unwrap();
        assert_eq!(plan.cells.len(), 1);
        assert_eq!(plan.lines.len(), 5);
        assert_eq!(plan.waypoints.len(), 10);
        assert!(plan.warnings.is_empty());
        assert!(plan.waypoints.iter().all(|w| (w.altitude - 40.0).abs() < f64::EPSILON));
        assert_relative_eq!(plan.path_length(), 540.0, epsilon = 0.01);
    }

    #[test]
    fn stepped_plan_chains_across_cells() {
        let plan = SurveyGrid::new(SurveyParams::new(40.0, 5.0))
            .execute(&pts(&[
                (0.0, 0.0),
                (20.0, 0.0),
                (40.0, 2.0),
                (60.0, 2.0),
                (60.0, 30.0),
                (0.0, 30.0),
            ]))
            .unwrap();
        assert_eq!(plan.classification.following.len(), 2);
        assert_eq!(plan.classification.heading.len(), 2);
        assert_eq!(plan.cells.len(), plan.pairs.len() + 1);
        assert_eq!(plan.cells.len(), 3);
        assert_eq!(plan.segments.len(), 19);
        // Six legs span all three cells; the top line of the first cell is alone.
        assert_eq!(plan.lines.len(), 7);
        assert_eq!(plan.lines.iter().filter(|l| l.segments.len() == 3).count(), 6);
    }

    #[test]
    fn invalid_polygon_is_rejected() {
        let err = SurveyGrid::new(SurveyParams::default())
            .execute(&pts(&[(0.0, 0.0), (1.0, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, SurveyError::Geometry(GeometryError::InvalidPolygon(_))));
    }

    #[test]
    fn invalid_parameters_are_rejected_before_geometry() {
        let err = SurveyGrid::new(SurveyParams::new(40.0, -1.0))
            .execute(&pts(&[(0.0, 0.0), (1.0, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, SurveyError::Planning(PlanningError::InvalidParameters(_))));
    }
}
