//! Deterministic [`ObserverGeometry`] for tests: every pass is a linear
//! tent rising from 0 deg at `rise` to `top` at `peak` and back to 0 deg at
//! `set`, continuing downward outside the pass.

use chrono::{DateTime, Duration, Utc};

use crate::predict::{GroundStation, Look, ObserverGeometry, PredictError, RawPass};

struct Tent {
    pass: RawPass,
    top: f64,
}

impl Tent {
    fn elevation(&self, t: DateTime<Utc>) -> f64 {
        let secs = |d: Duration| d.num_seconds() as f64;
        let RawPass {
            rise, peak, set, ..
        } = self.pass;
        if t <= peak {
            self.top * secs(t - rise) / secs(peak - rise)
        } else {
            self.top * secs(set - t) / secs(set - peak)
        }
    }
}

#[derive(Default)]
pub(crate) struct ScriptedGeometry {
    satellites: Vec<(String, Vec<Tent>)>,
}

impl ScriptedGeometry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_pass(
        mut self,
        satellite: &str,
        rise: DateTime<Utc>,
        peak: DateTime<Utc>,
        set: DateTime<Utc>,
        top: f64,
    ) -> Self {
        let tent = Tent {
            pass: RawPass {
                satellite: satellite.to_string(),
                rise,
                set,
                peak,
            },
            top,
        };
        match self.satellites.iter_mut().find(|(name, _)| name == satellite) {
            Some((_, tents)) => tents.push(tent),
            None => self.satellites.push((satellite.to_string(), vec![tent])),
        }
        self
    }

    fn tents(&self, satellite: &str) -> Result<&[Tent], PredictError> {
        self.satellites
            .iter()
            .find(|(name, _)| name == satellite)
            .map(|(_, tents)| tents.as_slice())
            .ok_or_else(|| PredictError::UnknownSatellite(satellite.to_string()))
    }
}

impl ObserverGeometry for ScriptedGeometry {
    fn next_events(
        &self,
        satellite: &str,
        start: DateTime<Utc>,
        window: Duration,
        _station: &GroundStation,
    ) -> Result<Vec<RawPass>, PredictError> {
        let end = start + window;
        Ok(self
            .tents(satellite)?
            .iter()
            .filter(|tent| tent.pass.rise >= start && tent.pass.rise <= end)
            .map(|tent| tent.pass.clone())
            .collect())
    }

    /// Azimuth is the second-of-day modulo 360 so samples are traceable.
    fn observer_look(
        &self,
        satellite: &str,
        instant: DateTime<Utc>,
        _station: &GroundStation,
    ) -> Result<Look, PredictError> {
        let elevation_deg = self
            .tents(satellite)?
            .iter()
            .map(|tent| tent.elevation(instant))
            .fold(-90.0, f64::max);
        Ok(Look {
            azimuth_deg: (instant.timestamp().rem_euclid(86_400) % 360) as f64,
            elevation_deg,
        })
    }
}
