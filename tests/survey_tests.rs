//! End-to-end tests for the survey planner.
//!
//! Covers the documented scenarios and the structural properties every plan
//! must satisfy: boundary and area coverage, the cell count law, segment
//! connectivity and path completeness.

use approx::assert_relative_eq;
use coverage_planner::geometry::PolylineRole;
use coverage_planner::math::Point2;
use coverage_planner::operations::survey::{EdgeRole, DEFAULT_CONNECTION_TOLERANCE};
use coverage_planner::{PlanningError, SurveyError, SurveyGrid, SurveyParams, SurveyPlan};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn pts(points: &[(f64, f64)]) -> Vec<Point2> {
    points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

fn plan(points: &[(f64, f64)], params: SurveyParams) -> SurveyPlan {
    init_tracing();
    SurveyGrid::new(params).execute(&pts(points)).unwrap()
}

/// Rectangle whose bottom edge bends twice, giving two interior points.
fn stepped() -> Vec<(f64, f64)> {
    vec![
        (0.0, 0.0),
        (20.0, 0.0),
        (40.0, 2.0),
        (60.0, 2.0),
        (60.0, 30.0),
        (0.0, 30.0),
    ]
}

/// Bottom run of 6 points facing a top run of 3 points.
fn uneven_runs() -> Vec<(f64, f64)> {
    vec![
        (0.0, 0.0),
        (10.0, 0.5),
        (20.0, 0.0),
        (30.0, 0.5),
        (40.0, 0.0),
        (50.0, 0.0),
        (50.0, 20.0),
        (25.0, 20.5),
        (0.0, 20.0),
    ]
}

fn rectangle() -> Vec<(f64, f64)> {
    vec![(0.0, 0.0), (100.0, 0.0), (100.0, 40.0), (0.0, 40.0)]
}

fn shapes() -> Vec<(&'static str, Vec<(f64, f64)>, f64)> {
    vec![
        ("stepped", stepped(), 5.0),
        ("uneven runs", uneven_runs(), 4.0),
        ("rectangle", rectangle(), 10.0),
        ("triangle", vec![(0.0, 0.0), (60.0, 0.0), (20.0, 40.0)], 10.0),
        (
            "hexagon",
            vec![
                (10.0, 0.0),
                (30.0, 0.0),
                (40.0, 17.0),
                (30.0, 34.0),
                (10.0, 34.0),
                (0.0, 17.0),
            ],
            6.0,
        ),
        (
            "trapezoid",
            vec![(0.0, 0.0), (80.0, 0.0), (60.0, 30.0), (15.0, 30.0)],
            7.5,
        ),
    ]
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    /// Uses a bent rectangle rather than a rectilinear L: every turn of an L is
    /// 90°, so no threshold yields 4 runs.
    #[test]
    fn stepped_polygon_splits_into_three_connected_cells() {
        let plan = plan(&stepped(), SurveyParams::new(40.0, 5.0));

        let roles: Vec<_> = plan.polylines.iter().map(|p| p.role).collect();
        assert_eq!(roles.iter().filter(|r| **r == Some(PolylineRole::Following)).count(), 2);
        assert_eq!(roles.iter().filter(|r| **r == Some(PolylineRole::Heading)).count(), 2);

        assert_eq!(plan.cells.len(), 3);
        let corresponding: Vec<usize> = plan.cells.iter().map(|c| c.count(EdgeRole::Corresponding)).collect();
        assert_eq!(corresponding, vec![1, 2, 1]);

        // Legs cross both cuts.
        let spanning: Vec<_> = plan
            .lines
            .iter()
            .filter(|l| {
                let mut cells: Vec<usize> = l.segments.iter().map(|s| s.cell).collect();
                cells.dedup();
                cells.len() == 3
            })
            .collect();
        assert_eq!(spanning.len(), 6);
        for line in spanning {
            for w in line.segments.windows(2) {
                assert!(nalgebra::distance(&w[0].end, &w[1].start) < DEFAULT_CONNECTION_TOLERANCE);
            }
        }
    }

    #[test]
    fn shorter_following_run_gets_projected_points() {
        let plan = plan(&uneven_runs(), SurveyParams::new(40.0, 4.0));
        assert!(plan.warnings.is_empty(), "{:?}", plan.warnings);

        let (f1, f2) = plan.classification.following_pair().unwrap();
        let (bottom, top) = (&plan.polylines[f1], &plan.polylines[f2]);
        assert_eq!(bottom.len(), 6);
        assert_eq!(top.len(), 6);

        // Endpoints are the original corners.
        let first = plan.store[top.first().unwrap()];
        let last = plan.store[top.last().unwrap()];
        assert_relative_eq!(first.x, 50.0);
        assert_relative_eq!(last.x, 0.0);

        // The three new points lie on the original top edges.
        let original = pts(&[(50.0, 20.0), (25.0, 20.5), (0.0, 20.0)]);
        let inserted: Vec<Point2> = top
            .vertices
            .iter()
            .map(|&v| plan.store[v])
            .filter(|p| original.iter().all(|o| nalgebra::distance(o, p) > 1e-9))
            .collect();
        assert_eq!(inserted.len(), 3);
        for p in inserted {
            let on_edge = original.windows(2).any(|w| {
                let along = nalgebra::distance(&w[0], &p) + nalgebra::distance(&p, &w[1]);
                (along - nalgebra::distance(&w[0], &w[1])).abs() < 1e-9
            });
            assert!(on_edge, "{p:?}");
        }

        assert_eq!(plan.cells.len(), plan.pairs.len() + 1);
        assert_eq!(plan.pairs.len(), 4);
    }

    #[test]
    fn rectilinear_u_shape_has_no_following_pair() {
        init_tracing();
        // Eight 90° turns: 1 run is closer to 4 than 8 runs, so one run is kept.
        let u_shape = pts(&[
            (0.0, 0.0),
            (30.0, 0.0),
            (30.0, 30.0),
            (20.0, 30.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 30.0),
            (0.0, 30.0),
        ]);
        let err = SurveyGrid::new(SurveyParams::new(40.0, 5.0))
            .execute(&u_shape)
            .unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Planning(PlanningError::InsufficientPolylines { found: 1 })
        ));
    }

    #[test]
    fn opposite_end_changes_only_the_start() {
        let base = SurveyParams::new(40.0, 10.0);
        let normal = plan(&rectangle(), base.clone());
        let flipped = plan(&rectangle(), base.with_start_opposite_end(true));

        assert_eq!(normal.lines.len(), 5);
        assert_eq!(normal.lines.len(), flipped.lines.len());
        assert_relative_eq!(normal.path_length(), flipped.path_length(), epsilon = 1e-9);

        let (a, b) = (normal.waypoints[0].position(), flipped.waypoints[0].position());
        assert!(nalgebra::distance(&a, &b) > 50.0);
    }
}

// ============================================================================
// Structural properties
// ============================================================================

mod properties {
    use super::*;

    #[test]
    fn polylines_cover_the_boundary() {
        for (name, points, spacing) in shapes() {
            let plan = plan(&points, SurveyParams::new(40.0, spacing));
            let total: f64 = plan.polylines.iter().map(|p| p.length(&plan.store)).sum();
            assert_relative_eq!(total, plan.polygon.perimeter(&plan.store), epsilon = 1e-6);
            assert!(plan.polylines.len() >= 2, "{name}");
        }
    }

    #[test]
    fn cells_tile_the_polygon() {
        for (name, points, spacing) in shapes() {
            let plan = plan(&points, SurveyParams::new(40.0, spacing));
            let areas: Vec<f64> = plan
                .cells
                .iter()
                .map(|c| {
                    let pts = plan.store.resolve(&c.vertices);
                    coverage_planner::math::polygon_2d::signed_area_2d(&pts).abs()
                })
                .collect();
            assert!(areas.iter().all(|a| *a > 0.0), "{name}: {areas:?}");
            assert_relative_eq!(
                areas.iter().sum::<f64>(),
                plan.polygon.area(&plan.store),
                epsilon = 1e-6
            );
            assert_eq!(plan.cells.len(), plan.pairs.len() + 1, "{name}");
        }
    }

    #[test]
    fn touching_segments_share_a_line() {
        for (name, points, spacing) in shapes() {
            let plan = plan(&points, SurveyParams::new(40.0, spacing));
            for (i, a) in plan.lines.iter().enumerate() {
                for b in &plan.lines[i + 1..] {
                    for sa in &a.segments {
                        for sb in &b.segments {
                            for pa in [sa.start, sa.end] {
                                for pb in [sb.start, sb.end] {
                                    assert!(
                                        nalgebra::distance(&pa, &pb) >= DEFAULT_CONNECTION_TOLERANCE,
                                        "{name}: {pa:?} touches {pb:?} across lines"
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn every_segment_is_flown() {
        for (name, points, spacing) in shapes() {
            let plan = plan(&points, SurveyParams::new(40.0, spacing));
            assert!(!plan.segments.is_empty(), "{name}");
            let chained: usize = plan.lines.iter().map(|l| l.segments.len()).sum();
            assert_eq!(chained, plan.segments.len(), "{name}");

            let flown: usize = plan.lines.iter().map(|l| l.points().len()).sum();
            assert_eq!(plan.waypoints.len(), flown, "{name}");
            assert!(plan.waypoints.len() >= 2 * plan.lines.len(), "{name}");

            // Every line endpoint appears in the path.
            for line in &plan.lines {
                for end in [line.start().unwrap(), line.end().unwrap()] {
                    assert!(
                        plan.waypoints.iter().any(|w| nalgebra::distance(&w.position(), &end) < 1e-12),
                        "{name}: {end:?} never visited"
                    );
                }
            }
        }
    }

    #[test]
    fn rectangle_falls_back_to_heading_edges() {
        let plan = plan(&rectangle(), SurveyParams::new(40.0, 10.0));
        assert_eq!(plan.cells.len(), 1);
        assert_eq!(plan.cells[0].count(EdgeRole::Corresponding), 0);
        assert!(plan.warnings.is_empty());
        assert_eq!(plan.segments.len(), 5);
    }
}
