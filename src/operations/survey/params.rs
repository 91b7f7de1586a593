use serde::{Deserialize, Serialize};

use crate::error::PlanningError;

/// Default connection tolerance for chaining slicing segments (1 cm in metres).
pub const DEFAULT_CONNECTION_TOLERANCE: f64 = 0.01;

/// Default number of polylines the adaptive search aims for.
pub const DEFAULT_TARGET_POLYLINES: usize = 4;

/// Flight and search parameters for one planning run.
///
/// Deserializes with per-field defaults, so a settings file only needs the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyParams {
    /// Altitude attached to every emitted waypoint.
    pub altitude: f64,
    /// Distance between adjacent survey lines.
    pub line_spacing: f64,
    /// Distance of the first survey line from the direction edge.
    pub start_offset: f64,
    /// Enter the first lawnmower line from its far end.
    pub start_opposite_end: bool,
    /// Polyline count the adaptive threshold search converges towards.
    pub target_polylines: usize,
    /// Maximum endpoint gap for two segments to chain into one line.
    pub connection_tolerance: f64,
    /// Initial angle-threshold step in degrees.
    pub initial_angle_step: f64,
    /// Smallest angle-threshold step in degrees before the search gives up.
    pub min_angle_step: f64,
}

impl Default for SurveyParams {
    fn default() -> Self {
        Self {
            altitude: 50.0,
            line_spacing: 20.0,
            start_offset: 0.0,
            start_opposite_end: false,
            target_polylines: DEFAULT_TARGET_POLYLINES,
            connection_tolerance: DEFAULT_CONNECTION_TOLERANCE,
            initial_angle_step: 5.0,
            min_angle_step: 0.5,
        }
    }
}

impl SurveyParams {
    /// Creates parameters for the given altitude and line spacing, with
    /// defaults for everything else.
    #[must_use]
    pub fn new(altitude: f64, line_spacing: f64) -> Self {
        Self {
            altitude,
            line_spacing,
            ..Self::default()
        }
    }

    /// Sets the offset of the first survey line.
    #[must_use]
    pub fn with_start_offset(mut self, start_offset: f64) -> Self {
        self.start_offset = start_offset;
        self
    }

    /// Starts the path from the far end of the closest lawnmower line.
    #[must_use]
    pub fn with_start_opposite_end(mut self, start_opposite_end: bool) -> Self {
        self.start_opposite_end = start_opposite_end;
        self
    }

    /// Sets the polyline count targeted by the adaptive search.
    #[must_use]
    pub fn with_target_polylines(mut self, target_polylines: usize) -> Self {
        self.target_polylines = target_polylines;
        self
    }

    /// Sets the segment connection tolerance.
    #[must_use]
    pub fn with_connection_tolerance(mut self, connection_tolerance: f64) -> Self {
        self.connection_tolerance = connection_tolerance;
        self
    }

    /// Sets the initial and minimum angle-threshold steps.
    #[must_use]
    pub fn with_angle_steps(mut self, initial: f64, min: f64) -> Self {
        self.initial_angle_step = initial;
        self.min_angle_step = min;
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidParameters` naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), PlanningError> {
        let positive = [
            ("line_spacing", self.line_spacing),
            ("connection_tolerance", self.connection_tolerance),
            ("initial_angle_step", self.initial_angle_step),
            ("min_angle_step", self.min_angle_step),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanningError::InvalidParameters(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if !self.altitude.is_finite() {
            return Err(PlanningError::InvalidParameters(format!(
                "altitude must be finite, got {}",
                self.altitude
            )));
        }
        if !self.start_offset.is_finite() || self.start_offset < 0.0 {
            return Err(PlanningError::InvalidParameters(format!(
                "start_offset must be non-negative, got {}",
                self.start_offset
            )));
        }
        if self.target_polylines < 2 {
            return Err(PlanningError::InvalidParameters(format!(
                "target_polylines must be at least 2, got {}",
                self.target_polylines
            )));
        }
        Ok(())
    }
}
