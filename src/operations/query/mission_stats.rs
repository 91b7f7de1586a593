use super::footprint::Footprint;
use crate::error::{PlanningError, Result};
use crate::operations::survey::Waypoint;

/// Summary figures for a waypoint path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MissionStats {
    /// Planar path length.
    pub total_distance: f64,
    /// Flight time in seconds at the requested speed.
    pub flight_time: f64,
    pub photo_count: usize,
    pub waypoint_count: usize,
}

/// Computes distance, flight time and photo count for a path.
pub struct MissionSummary<'a> {
    waypoints: &'a [Waypoint],
    speed: f64,
    photo_distance: f64,
}

impl<'a> MissionSummary<'a> {
    /// Creates a summary at `speed` (distance units per second) without photo
    /// triggering.
    #[must_use]
    pub fn new(waypoints: &'a [Waypoint], speed: f64) -> Self {
        Self {
            waypoints,
            speed,
            photo_distance: 0.0,
        }
    }

    /// Sets the distance between photo triggers.
    #[must_use]
    pub fn with_photo_distance(mut self, photo_distance: f64) -> Self {
        self.photo_distance = photo_distance;
        self
    }

    /// Takes the photo distance from a camera footprint.
    #[must_use]
    pub fn with_footprint(self, footprint: &Footprint) -> Self {
        self.with_photo_distance(footprint.photo_distance)
    }

    /// Executes the summary.
    ///
    /// Paths with fewer than 2 waypoints give zeroed stats.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidParameters` if the speed is not
    /// positive.
    pub fn execute(&self) -> Result<MissionStats> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(PlanningError::InvalidParameters(format!(
                "speed must be positive, got {}",
                self.speed
            ))
            .into());
        }
        if self.waypoints.len() < 2 {
            return Ok(MissionStats::default());
        }

        let total_distance: f64 = self
            .waypoints
            .windows(2)
            .map(|w| nalgebra::distance(&w[0].position(), &w[1].position()))
            .sum();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let photo_count = if self.photo_distance > 0.0 {
            (total_distance / self.photo_distance).floor() as usize
        } else {
            0
        };

        Ok(MissionStats {
            total_distance,
            flight_time: total_distance / self.speed,
            photo_count,
            waypoint_count: self.waypoints.len(),
        })
    }
}
