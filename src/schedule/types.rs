use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::predict::GroundStation;

/// Timestamp format used for schedule rows and trajectory requests.
pub const DISPLAY_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Satellites tracked by default when the config does not list any.
pub const DEFAULT_SATELLITES: [&str; 6] = [
    "METEOR-M2 2",
    "METEOR-M2 3",
    "NOAA 18",
    "NOAA 19",
    "METOP-B",
    "METOP-C",
];

/// Ordered, read-only list of satellites a schedule is computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SatelliteCatalog(Vec<String>);

impl SatelliteCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for SatelliteCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SATELLITES)
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub station: GroundStation,
    pub min_elevation_deg: f64,
    pub min_apogee_deg: f64,
    pub start: DateTime<Utc>,
    pub duration: Duration,
}

/// A pass narrowed to the part above the minimum elevation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RefinedPass {
    pub satellite: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub peak: DateTime<Utc>,
    pub apogee_elevation_deg: f64,
    pub conflict: bool,
}

/// Passes of every satellite for one query, ordered by start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub(crate) passes: Vec<RefinedPass>,
}

impl Schedule {
    pub fn passes(&self) -> &[RefinedPass] {
        &self.passes
    }

    pub fn conflict_count(&self) -> usize {
        self.passes.iter().filter(|p| p.conflict).count()
    }

    pub fn rows(&self) -> Vec<ScheduleRow> {
        self.passes.iter().map(ScheduleRow::from).collect()
    }
}

/// Display form of a [`RefinedPass`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScheduleRow {
    pub satellite: String,
    pub start_time: String,
    pub end_time: String,
    pub apogee_elevation_deg: f64,
    pub conflict: bool,
}

impl From<&RefinedPass> for ScheduleRow {
    fn from(pass: &RefinedPass) -> Self {
        ScheduleRow {
            satellite: pass.satellite.clone(),
            start_time: pass.start.format(DISPLAY_FORMAT).to_string(),
            end_time: pass.end.format(DISPLAY_FORMAT).to_string(),
            apogee_elevation_deg: round2(pass.apogee_elevation_deg),
            conflict: pass.conflict,
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
