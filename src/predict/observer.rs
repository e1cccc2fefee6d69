use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::geometry::ObserverGeometry;
use crate::predict::ground_station::GroundStation;
use crate::predict::pass_finder::find_passes;
use crate::predict::propagation::look_angles;
use crate::predict::tle_loader::TleLoader;
use crate::predict::types::{Look, RawPass};

/// [`ObserverGeometry`] backed by SGP4 propagation of loaded TLEs.
pub struct Sgp4Observer {
    tles: TleLoader,
}

impl Sgp4Observer {
    pub fn new(tles: TleLoader) -> Self {
        Self { tles }
    }
}

impl ObserverGeometry for Sgp4Observer {
    fn next_events(
        &self,
        satellite: &str,
        start: DateTime<Utc>,
        window: Duration,
        station: &GroundStation,
    ) -> Result<Vec<RawPass>, PredictError> {
        let entry = self.tles.get(satellite)?;
        let end = start.checked_add_signed(window).ok_or_else(|| {
            PredictError::WindowOutOfRange(format!("{} + {}s", start, window.num_seconds()))
        })?;
        find_passes(satellite, start, end, |t| {
            look_angles(station, &entry.elements, &entry.constants, t).map(|l| l.elevation_deg)
        })
    }

    fn observer_look(
        &self,
        satellite: &str,
        instant: DateTime<Utc>,
        station: &GroundStation,
    ) -> Result<Look, PredictError> {
        let entry = self.tles.get(satellite)?;
        look_angles(station, &entry.elements, &entry.constants, instant)
    }
}
