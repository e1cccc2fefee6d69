use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Coarse pass events as reported by the geometry adapter.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RawPass {
    pub satellite: String,
    pub rise: DateTime<Utc>,
    pub set: DateTime<Utc>,
    pub peak: DateTime<Utc>,
}

/// Look angles from the station towards a satellite, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}
