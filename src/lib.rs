pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{GeometryError, PlanningError, PlanningWarning, Result, SurveyError};
pub use operations::survey::{SurveyGrid, SurveyParams, SurveyPlan, Waypoint};
