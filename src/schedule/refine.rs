use chrono::{DateTime, Duration, Utc};

use crate::predict::{GroundStation, ObserverGeometry, PredictError};
use crate::schedule::filter::KeptPass;
use crate::schedule::types::RefinedPass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    Found(DateTime<Utc>),
    NotFound,
}

impl Crossing {
    fn or(self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Crossing::Found(t) => t,
            Crossing::NotFound => fallback,
        }
    }
}

/// Tighten a pass to the seconds where `floor(elevation) >= min_elevation_deg`.
///
/// Start is searched forward from rise for `peak - rise` seconds, end
/// backward from set for `set - peak` seconds. When a search finds nothing
/// the coarse rise (or set) is kept as is, so the edges of the result are
/// not guaranteed to satisfy the threshold.
pub fn refine_window<G: ObserverGeometry + ?Sized>(
    geometry: &G,
    pass: KeptPass,
    min_elevation_deg: f64,
    station: &GroundStation,
) -> Result<RefinedPass, PredictError> {
    let KeptPass {
        raw,
        apogee_elevation_deg,
    } = pass;

    let start = first_crossing(
        geometry,
        &raw.satellite,
        raw.rise,
        Duration::seconds(1),
        (raw.peak - raw.rise).num_seconds(),
        min_elevation_deg,
        station,
    )?;
    let end = first_crossing(
        geometry,
        &raw.satellite,
        raw.set,
        Duration::seconds(-1),
        (raw.set - raw.peak).num_seconds(),
        min_elevation_deg,
        station,
    )?;

    if start == Crossing::NotFound || end == Crossing::NotFound {
        log::debug!(
            "{}: no {:.1} deg crossing within pass at {}, keeping coarse boundary",
            raw.satellite,
            min_elevation_deg,
            raw.peak
        );
    }

    Ok(RefinedPass {
        start: start.or(raw.rise),
        end: end.or(raw.set),
        peak: raw.peak,
        satellite: raw.satellite,
        apogee_elevation_deg,
        conflict: false,
    })
}

/// Bounded linear scan of `origin + k * step` for `k in 0..steps`.
fn first_crossing<G: ObserverGeometry + ?Sized>(
    geometry: &G,
    satellite: &str,
    origin: DateTime<Utc>,
    step: Duration,
    steps: i64,
    min_elevation_deg: f64,
    station: &GroundStation,
) -> Result<Crossing, PredictError> {
    let mut instant = origin;
    for _ in 0..steps {
        let elevation = geometry
            .observer_look(satellite, instant, station)?
            .elevation_deg;
        if elevation.floor() >= min_elevation_deg {
            return Ok(Crossing::Found(instant));
        }
        instant += step;
    }
    Ok(Crossing::NotFound)
}
