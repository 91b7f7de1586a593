use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// Camera optics relevant to ground coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Horizontal field of view in degrees.
    pub horizontal_fov: f64,
    /// Vertical field of view in degrees.
    pub vertical_fov: f64,
    /// Image width in pixels.
    pub image_width: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            horizontal_fov: 73.4,
            vertical_fov: 52.0,
            image_width: 4000,
        }
    }
}

/// Ground coverage of one photo and the survey spacing it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Ground width covered across track.
    pub width: f64,
    /// Ground height covered along track.
    pub height: f64,
    /// Distance between survey lines for the lateral overlap.
    pub line_spacing: f64,
    /// Distance between photo triggers for the forward overlap.
    pub photo_distance: f64,
    /// Ground sampling distance in centimetres per pixel.
    pub gsd_cm: f64,
}

/// Computes a camera's ground footprint at a given altitude.
#[derive(Debug, Clone)]
pub struct CameraFootprint {
    camera: Camera,
    altitude: f64,
    lateral_overlap: f64,
    forward_overlap: f64,
}

impl CameraFootprint {
    /// Creates a footprint query with 70 % lateral and forward overlap.
    #[must_use]
    pub fn new(camera: Camera, altitude: f64) -> Self {
        Self {
            camera,
            altitude,
            lateral_overlap: 70.0,
            forward_overlap: 70.0,
        }
    }

    /// Sets the lateral and forward overlap, in percent.
    #[must_use]
    pub fn with_overlap(mut self, lateral: f64, forward: f64) -> Self {
        self.lateral_overlap = lateral;
        self.forward_overlap = forward;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidParameters` if the altitude is not
    /// positive, an overlap lies outside `[0, 100)`, a field of view lies
    /// outside `(0, 180)` degrees, or the image width is zero.
    pub fn execute(&self) -> Result<Footprint> {
        if !self.altitude.is_finite() || self.altitude <= 0.0 {
            return Err(PlanningError::InvalidParameters(format!(
                "altitude must be positive, got {}",
                self.altitude
            ))
            .into());
        }
        for (name, overlap) in [("lateral", self.lateral_overlap), ("forward", self.forward_overlap)] {
            if !(0.0..100.0).contains(&overlap) {
                return Err(PlanningError::InvalidParameters(format!(
                    "{name} overlap must be in [0, 100), got {overlap}"
                ))
                .into());
            }
        }
        for fov in [self.camera.horizontal_fov, self.camera.vertical_fov] {
            if !(fov > 0.0 && fov < 180.0) {
                return Err(PlanningError::InvalidParameters(format!(
                    "field of view must be in (0, 180) degrees, got {fov}"
                ))
                .into());
            }
        }
        if self.camera.image_width == 0 {
            return Err(PlanningError::InvalidParameters("image width must be positive".to_owned()).into());
        }

        let extent = |fov: f64| 2.0 * self.altitude * (fov.to_radians() / 2.0).tan();
        let width = extent(self.camera.horizontal_fov);
        let height = extent(self.camera.vertical_fov);

        Ok(Footprint {
            width,
            height,
            line_spacing: width * (1.0 - self.lateral_overlap / 100.0),
            photo_distance: height * (1.0 - self.forward_overlap / 100.0),
            gsd_cm: width / f64::from(self.camera.image_width) * 100.0,
        })
    }
}
