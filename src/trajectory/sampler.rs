use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::{GroundStation, Look, ObserverGeometry, PredictError};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrajectorySample {
    pub time: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

/// One sample per second from `start` to `end`, both inclusive.
///
/// Each sample carries the look angles fetched on the previous step: the
/// first two samples both hold the angles at `start`, sample `k` those at
/// `start + (k - 1)s`. The iterator stops for good after the last sample or
/// the first error.
pub struct TrajectorySampler<'a, G: ?Sized> {
    geometry: &'a G,
    satellite: String,
    station: GroundStation,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: i64,
    lagged: Option<Look>,
    finished: bool,
}

impl<'a, G: ObserverGeometry + ?Sized> TrajectorySampler<'a, G> {
    pub fn new(
        geometry: &'a G,
        satellite: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        station: GroundStation,
    ) -> Self {
        Self {
            geometry,
            satellite: satellite.to_string(),
            station,
            start,
            end,
            offset: 0,
            lagged: None,
            finished: false,
        }
    }

    fn look(&self, instant: DateTime<Utc>) -> Result<Look, PredictError> {
        self.geometry
            .observer_look(&self.satellite, instant, &self.station)
    }

    fn step(&mut self, time: DateTime<Utc>) -> Result<TrajectorySample, PredictError> {
        let look = match self.lagged.take() {
            Some(look) => look,
            None => self.look(self.start)?,
        };
        self.lagged = Some(self.look(time)?);
        self.offset += 1;

        Ok(TrajectorySample {
            time,
            azimuth_deg: look.azimuth_deg,
            elevation_deg: look.elevation_deg,
        })
    }
}

impl<G: ObserverGeometry + ?Sized> Iterator for TrajectorySampler<'_, G> {
    type Item = Result<TrajectorySample, PredictError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let time = self.start + Duration::seconds(self.offset);
        if time > self.end {
            self.finished = true;
            return None;
        }

        let result = self.step(time);
        self.finished = result.is_err();
        Some(result)
    }
}
