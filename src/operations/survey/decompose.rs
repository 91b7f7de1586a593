use tracing::debug;

use crate::geometry::polyline::sort_by_length_desc;
use crate::geometry::{Polygon, Polyline, VertexStore};
use crate::math::distance_2d::turning_angle_deg;
use crate::math::polygon_2d::leftmost_bottom_index;

/// Hard cap on threshold evaluations in the adaptive search.
const MAX_SEARCH_ITERATIONS: usize = 200;

/// Indices into the polygon boundary of every vertex whose turning angle is
/// at least `threshold` degrees.
#[must_use]
pub fn find_corners(store: &VertexStore, polygon: &Polygon, threshold: f64) -> Vec<usize> {
    let ids = polygon.vertices();
    let n = ids.len();
    (0..n)
        .filter(|&i| {
            let prev = &store[ids[(i + n - 1) % n]];
            let curr = &store[ids[i]];
            let next = &store[ids[(i + 1) % n]];
            turning_angle_deg(prev, curr, next) >= threshold
        })
        .collect()
}

/// Splits the polygon boundary into polylines at every corner.
///
/// All corners are collected before any polyline is built, and each polyline
/// runs forward from one corner to the next (both corners included), so the
/// runs do not depend on which vertex the polygon starts at. Without corners
/// the whole boundary becomes one closed run starting at the leftmost-bottom
/// vertex. Polylines are returned in boundary order.
#[must_use]
pub fn decompose(store: &VertexStore, polygon: &Polygon, threshold: f64) -> Vec<Polyline> {
    let ids = polygon.vertices();
    let n = ids.len();
    if n == 0 {
        return Vec::new();
    }

    let corners = find_corners(store, polygon, threshold);
    if corners.is_empty() {
        let start = leftmost_bottom_index(&polygon.points(store));
        let run = (0..=n).map(|k| ids[(start + k) % n]).collect();
        return vec![Polyline::new(run)];
    }

    let mut polylines = Vec::with_capacity(corners.len());
    for (i, &start) in corners.iter().enumerate() {
        let end = corners[(i + 1) % corners.len()];
        let mut run = vec![ids[start]];
        let mut k = start;
        loop {
            k = (k + 1) % n;
            run.push(ids[k]);
            if k == end {
                break;
            }
        }
        polylines.push(Polyline::new(run));
    }
    polylines
}

/// Result of the adaptive threshold search.
#[derive(Debug, Clone)]
pub struct AdaptiveDecomposition {
    /// Polylines sorted by length, longest first.
    pub polylines: Vec<Polyline>,
    /// Angle threshold (degrees) that produced them.
    pub threshold: f64,
    /// Whether the target count was reached exactly.
    pub exact: bool,
}

/// Searches for the angle threshold whose decomposition has a target number
/// of polylines.
///
/// The threshold starts at 180° and decreases by `initial_step`. When the
/// count jumps from below the target to above it, the step is halved and the
/// search backs up to the last undershooting threshold. Once the step reaches
/// `min_step` (or the iteration cap is hit) the closest decomposition seen is
/// returned.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveSearch {
    target: usize,
    initial_step: f64,
    min_step: f64,
}

impl AdaptiveSearch {
    /// Creates a search with the default 5° initial and 0.5° minimum steps.
    #[must_use]
    pub fn new(target: usize) -> Self {
        Self {
            target,
            initial_step: 5.0,
            min_step: 0.5,
        }
    }

    /// Overrides the step sizes (degrees).
    #[must_use]
    pub fn with_steps(mut self, initial_step: f64, min_step: f64) -> Self {
        self.initial_step = initial_step;
        self.min_step = min_step;
        self
    }

    /// Runs the search.
    #[must_use]
    pub fn execute(&self, store: &VertexStore, polygon: &Polygon) -> AdaptiveDecomposition {
        // A triangle can never split into more than three runs.
        let target = if polygon.len() == 3 { 3 } else { self.target };

        let mut threshold = 180.0_f64;
        let mut step = self.initial_step;
        let mut prev: Option<(f64, usize)> = None;
        let mut best: Option<(usize, f64, Vec<Polyline>)> = None;

        for _ in 0..MAX_SEARCH_ITERATIONS {
            if threshold <= 0.0 {
                break;
            }

            let polylines = decompose(store, polygon, threshold);
            let count = polylines.len();
            let diff = count.abs_diff(target);
            debug!(threshold, step, count, "evaluated angle threshold");

            let improves = best
                .as_ref()
                .is_none_or(|(best_diff, _, _)| diff < *best_diff || (diff == *best_diff && count >= target));
            if improves {
                best = Some((diff, threshold, polylines));
            }

            if count == target {
                break;
            }

            if let Some((prev_threshold, prev_count)) = prev {
                if prev_count < target && count > target {
                    if step > self.min_step {
                        step /= 2.0;
                        threshold = prev_threshold;
                        prev = None;
                        debug!(step, threshold, "overshot target, refining");
                        continue;
                    }
                    break;
                }
            }

            prev = Some((threshold, count));
            threshold -= step;
        }

        let (diff, threshold, mut polylines) = best.unwrap_or_else(|| {
            // Only reachable with a non-positive starting threshold.
            let fallback = decompose(store, polygon, self.initial_step);
            (fallback.len().abs_diff(target), self.initial_step, fallback)
        });
        sort_by_length_desc(&mut polylines, store);
        debug!(threshold, count = polylines.len(), target, "selected decomposition");

        AdaptiveDecomposition {
            polylines,
            threshold,
            exact: diff == 0,
        }
    }
}
