use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::types::{Look, RawPass};

/// Observer-side view of an orbit propagator.
///
/// `next_events` reports every pass that rises within
/// `[start, start + window]`, in chronological order. `observer_look` is a
/// pure function of its arguments; negative elevations are valid.
///
/// Both fail with [`PredictError::UnknownSatellite`] when no orbital elements
/// are available for `satellite`.
pub trait ObserverGeometry {
    fn next_events(
        &self,
        satellite: &str,
        start: DateTime<Utc>,
        window: Duration,
        station: &GroundStation,
    ) -> Result<Vec<RawPass>, PredictError>;

    fn observer_look(
        &self,
        satellite: &str,
        instant: DateTime<Utc>,
        station: &GroundStation,
    ) -> Result<Look, PredictError>;
}
