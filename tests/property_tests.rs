//! Property-based tests for order independence of the planner.

use std::f64::consts::PI;

use coverage_planner::math::Point2;
use coverage_planner::{SurveyGrid, SurveyParams};
use proptest::prelude::*;

/// Star-shaped polygon around the origin: strictly increasing angles with
/// per-vertex jitter, so it is always simple.
fn star(jitter: &[f64], radii: &[f64]) -> Vec<Point2> {
    #[allow(clippy::cast_precision_loss)]
    let n = jitter.len() as f64;
    jitter
        .iter()
        .zip(radii)
        .enumerate()
        .map(|(i, (j, r))| {
            #[allow(clippy::cast_precision_loss)]
            let theta = 2.0 * PI * (i as f64 + j) / n;
            Point2::new(r * theta.cos(), r * theta.sin())
        })
        .collect()
}

/// Rectangle whose bottom edge bends at two interior points, so it splits into
/// four runs and three cells.
fn bent_quad(width: f64, height: f64, xs: (f64, f64), ys: (f64, f64)) -> Vec<Point2> {
    vec![
        Point2::new(0.0, 0.0),
        Point2::new(xs.0 * width, ys.0),
        Point2::new(xs.1 * width, ys.1),
        Point2::new(width, 0.0),
        Point2::new(width, height),
        Point2::new(0.0, height),
    ]
}

fn bent_quad_params() -> impl Strategy<Value = (f64, f64, (f64, f64), (f64, f64), usize)> {
    (
        50.0_f64..80.0,
        15.0_f64..35.0,
        (0.2_f64..0.4, 0.6_f64..0.8),
        (-2.0_f64..2.0, -2.0_f64..2.0),
        0_usize..6,
    )
}

fn star_params() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, usize)> {
    (5_usize..=10).prop_flat_map(|n| {
        (
            prop::collection::vec(0.0_f64..0.5, n),
            prop::collection::vec(5.0_f64..10.0, n),
            0..n,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn plan_ignores_starting_vertex((jitter, radii, shift) in star_params()) {
        let points = star(&jitter, &radii);
        let mut rotated = points.clone();
        rotated.rotate_left(shift);

        let grid = SurveyGrid::new(SurveyParams::new(30.0, 1.5));
        let a = grid.execute(&points);
        let b = grid.execute(&rotated);
        prop_assert_eq!(a.is_ok(), b.is_ok());

        if let (Ok(a), Ok(b)) = (a, b) {
            prop_assert_eq!(a.polylines.len(), b.polylines.len());
            prop_assert_eq!(a.cells.len(), b.cells.len());
            prop_assert_eq!(a.lines.len(), b.lines.len());
            prop_assert_eq!(a.waypoints, b.waypoints);
        }
    }

    #[test]
    fn plan_respects_cell_count_law((jitter, radii, _shift) in star_params()) {
        let points = star(&jitter, &radii);
        if let Ok(plan) = SurveyGrid::new(SurveyParams::new(30.0, 2.0)).execute(&points) {
            prop_assert_eq!(plan.cells.len(), plan.pairs.len() + 1);
            let chained: usize = plan.lines.iter().map(|l| l.segments.len()).sum();
            prop_assert_eq!(chained, plan.segments.len());
        }
    }

    #[test]
    fn multi_cell_plan_ignores_starting_vertex(
        (width, height, xs, ys, shift) in bent_quad_params()
    ) {
        let points = bent_quad(width, height, xs, ys);
        let mut rotated = points.clone();
        rotated.rotate_left(shift);

        let grid = SurveyGrid::new(SurveyParams::new(30.0, 2.5));
        let a = grid.execute(&points);
        let b = grid.execute(&rotated);
        prop_assert!(a.is_ok() && b.is_ok());

        if let (Ok(a), Ok(b)) = (a, b) {
            prop_assert_eq!(a.polylines.len(), 4);
            prop_assert_eq!(a.cells.len(), 3);
            prop_assert_eq!(b.cells.len(), 3);
            prop_assert_eq!(a.lines.len(), b.lines.len());
            prop_assert_eq!(a.waypoints, b.waypoints);
        }
    }
}
