mod footprint;
mod mission_stats;

pub use footprint::{Camera, CameraFootprint, Footprint};
pub use mission_stats::{MissionStats, MissionSummary};
