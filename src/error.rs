use thiserror::Error;

/// Top-level error type for the coverage planner.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Planning(#[from] PlanningError),
}

/// Errors related to the input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),
}

/// Errors raised by the planning pipeline.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("at least 2 polylines are required for a following pair, found {found}")]
    InsufficientPolylines { found: usize },

    #[error("invalid cell decomposition: {0}")]
    InvalidDecomposition(String),
}

/// Non-fatal degradations recorded while planning.
///
/// These never abort a run; they are carried in the resulting plan so that
/// callers can surface partial coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanningWarning {
    /// The longer following polyline could not supply enough interior points,
    /// so the two following polylines keep a length mismatch.
    IncompletePairing { required: usize, inserted: usize },

    /// A cell had neither a corresponding edge nor a usable fallback edge and
    /// was left without survey lines.
    CellSkipped { cell: usize },
}

/// Convenience type alias for results using [`SurveyError`].
pub type Result<T> = std::result::Result<T, SurveyError>;
