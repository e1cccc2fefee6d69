use std::sync::Arc;

use crate::predict::{ObserverGeometry, PredictError};
use crate::schedule::error::ScheduleError;
use crate::schedule::filter::filter_by_apogee;
use crate::schedule::merge::merge;
use crate::schedule::refine::refine_window;
use crate::schedule::types::{RefinedPass, SatelliteCatalog, Schedule, ScheduleRequest};

/// Events -> apogee filter -> window refinement, for one satellite.
pub fn satellite_passes<G: ObserverGeometry + ?Sized>(
    geometry: &G,
    satellite: &str,
    request: &ScheduleRequest,
) -> Result<Vec<RefinedPass>, PredictError> {
    let station = &request.station;
    let raw = geometry.next_events(satellite, request.start, request.duration, station)?;
    let found = raw.len();

    let kept = filter_by_apogee(geometry, raw, request.min_apogee_deg, station)?;
    log::debug!(
        "{}: {} passes, {} above {:.1} deg apogee",
        satellite,
        found,
        kept.len(),
        request.min_apogee_deg
    );

    kept.into_iter()
        .map(|pass| refine_window(geometry, pass, request.min_elevation_deg, station))
        .collect()
}

/// Build the merged schedule for every satellite in `catalog`.
///
/// Any satellite failing aborts the whole computation.
pub fn compute_schedule<G: ObserverGeometry + ?Sized>(
    geometry: &G,
    catalog: &SatelliteCatalog,
    request: &ScheduleRequest,
) -> Result<Schedule, PredictError> {
    let mut passes = Vec::new();
    for satellite in catalog.names() {
        passes.extend(satellite_passes(geometry, satellite, request)?);
    }

    let schedule = merge(passes);
    log_summary(&schedule, request);
    Ok(schedule)
}

/// Same as [`compute_schedule`], with one blocking task per satellite.
///
/// Handles are joined in catalog order so the merge input matches the
/// sequential version exactly.
pub async fn compute_schedule_concurrent<G>(
    geometry: Arc<G>,
    catalog: &SatelliteCatalog,
    request: ScheduleRequest,
) -> Result<Schedule, ScheduleError>
where
    G: ObserverGeometry + Send + Sync + ?Sized + 'static,
{
    let request = Arc::new(request);

    let handles: Vec<_> = catalog
        .names()
        .iter()
        .cloned()
        .map(|satellite| {
            let geometry = geometry.clone();
            let request = request.clone();
            tokio::task::spawn_blocking(move || {
                satellite_passes(geometry.as_ref(), &satellite, &request)
            })
        })
        .collect();

    let mut passes = Vec::new();
    for handle in handles {
        passes.extend(handle.await??);
    }

    let schedule = merge(passes);
    log_summary(&schedule, &request);
    Ok(schedule)
}

fn log_summary(schedule: &Schedule, request: &ScheduleRequest) {
    log::info!(
        "Schedule from {} for {}h at ({:.4}, {:.4}): {} passes, {} in conflict",
        request.start,
        request.duration.num_hours(),
        request.station.latitude_deg,
        request.station.longitude_deg,
        schedule.passes().len(),
        schedule.conflict_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::scripted::ScriptedGeometry;
    use crate::predict::GroundStation;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    fn geometry() -> ScriptedGeometry {
        ScriptedGeometry::new()
            // low pass, filtered out at 20 deg apogee
            .with_pass("NOAA 18", at(9, 0, 0), at(9, 5, 0), at(9, 10, 0), 12.0)
            .with_pass("NOAA 18", at(10, 0, 0), at(10, 5, 0), at(10, 10, 0), 40.0)
            .with_pass("NOAA 19", at(10, 3, 0), at(10, 8, 0), at(10, 13, 0), 60.0)
            .with_pass("METOP-B", at(13, 0, 0), at(13, 6, 0), at(13, 12, 0), 72.0)
            // rises after the window
            .with_pass("METOP-B", at(20, 0, 0), at(20, 6, 0), at(20, 12, 0), 72.0)
    }

    fn request(min_elevation_deg: f64, min_apogee_deg: f64) -> ScheduleRequest {
        ScheduleRequest {
            station: GroundStation::new(55.75, 37.61, 150.0),
            min_elevation_deg,
            min_apogee_deg,
            start: at(8, 0, 0),
            duration: Duration::hours(8),
        }
    }

    fn catalog() -> SatelliteCatalog {
        SatelliteCatalog::new(["NOAA 18", "NOAA 19", "METOP-B"])
    }

    #[test]
    fn builds_merged_schedule_across_satellites() {
        let schedule = compute_schedule(&geometry(), &catalog(), &request(0.0, 20.0)).unwrap();
        let rows = schedule.rows();

        let satellites: Vec<_> = rows.iter().map(|r| r.satellite.as_str()).collect();
        assert_eq!(satellites, ["NOAA 18", "NOAA 19", "METOP-B"]);

        assert!(rows[0].conflict && rows[1].conflict);
        assert_eq!(rows[1].start_time, "2024.03.01 10:10:01");
        assert!(!rows[2].conflict);
        assert_eq!(rows[2].apogee_elevation_deg, 72.0);
    }

    #[test]
    fn refinement_removes_overlap_before_merge() {
        // At 20 deg NOAA 18 ends 10:07:30 and NOAA 19 starts 10:04:40.
        let schedule = compute_schedule(&geometry(), &catalog(), &request(20.0, 20.0)).unwrap();
        let passes = schedule.passes();
        assert_eq!(passes[0].end, at(10, 7, 30));
        assert_eq!(passes[1].start, at(10, 7, 31));

        // At 35 deg they no longer touch.
        let schedule = compute_schedule(&geometry(), &catalog(), &request(35.0, 20.0)).unwrap();
        assert_eq!(schedule.conflict_count(), 0);
        assert_eq!(schedule.passes()[0].end, at(10, 5, 37));
    }

    #[test]
    fn apogee_above_zenith_empties_schedule() {
        let schedule = compute_schedule(&geometry(), &catalog(), &request(0.0, 90.5)).unwrap();
        assert!(schedule.passes().is_empty());
    }

    #[test]
    fn unknown_satellite_aborts_request() {
        let catalog = SatelliteCatalog::new(["NOAA 18", "METEOR-M2 3", "NOAA 19"]);
        let result = compute_schedule(&geometry(), &catalog, &request(0.0, 0.0));
        assert!(matches!(
            result,
            Err(PredictError::UnknownSatellite(name)) if name == "METEOR-M2 3"
        ));
    }

    #[tokio::test]
    async fn concurrent_matches_sequential() {
        let geometry = Arc::new(geometry());
        let sequential =
            compute_schedule(geometry.as_ref(), &catalog(), &request(5.0, 20.0)).unwrap();
        let concurrent = compute_schedule_concurrent(geometry, &catalog(), request(5.0, 20.0))
            .await
            .unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn concurrent_propagates_configuration_error() {
        let catalog = SatelliteCatalog::new(["NOAA 18", "METEOR-M2 3"]);
        let result =
            compute_schedule_concurrent(Arc::new(geometry()), &catalog, request(0.0, 0.0)).await;
        assert!(matches!(
            result,
            Err(ScheduleError::Predict(PredictError::UnknownSatellite(_)))
        ));
    }
}
