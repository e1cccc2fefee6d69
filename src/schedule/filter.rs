use crate::predict::{GroundStation, ObserverGeometry, PredictError, RawPass};

/// A raw pass that cleared the apogee threshold, with its peak elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct KeptPass {
    pub raw: RawPass,
    pub apogee_elevation_deg: f64,
}

/// Keep passes whose elevation at the coarse peak is at least `min_apogee_deg`.
pub fn filter_by_apogee<G: ObserverGeometry + ?Sized>(
    geometry: &G,
    passes: Vec<RawPass>,
    min_apogee_deg: f64,
    station: &GroundStation,
) -> Result<Vec<KeptPass>, PredictError> {
    let mut kept = Vec::with_capacity(passes.len());

    for raw in passes {
        let apogee = geometry
            .observer_look(&raw.satellite, raw.peak, station)?
            .elevation_deg;
        if apogee >= min_apogee_deg {
            kept.push(KeptPass {
                raw,
                apogee_elevation_deg: apogee,
            });
        } else {
            log::trace!(
                "{}: pass peaking at {} below apogee threshold ({:.2} < {:.2})",
                raw.satellite,
                raw.peak,
                apogee,
                min_apogee_deg
            );
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::scripted::ScriptedGeometry;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::rstest;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn geometry() -> ScriptedGeometry {
        ScriptedGeometry::new()
            .with_pass("NOAA 18", at(10, 0), at(10, 5), at(10, 10), 25.0)
            .with_pass("NOAA 18", at(12, 0), at(12, 6), at(12, 12), 30.0)
            .with_pass("NOAA 18", at(14, 0), at(14, 7), at(14, 14), 82.5)
    }

    fn raw_passes(geometry: &ScriptedGeometry) -> Vec<RawPass> {
        geometry
            .next_events("NOAA 18", at(9, 0), Duration::hours(6), &GroundStation::default())
            .unwrap()
    }

    #[rstest]
    #[case(-90.0, 3)]
    #[case(0.0, 3)]
    #[case(25.0, 3)]
    #[case(30.0, 2)]
    #[case(30.01, 1)]
    #[case(82.5, 1)]
    #[case(90.01, 0)]
    fn keeps_passes_at_or_above_threshold(#[case] min_apogee: f64, #[case] expected: usize) {
        let geometry = geometry();
        let kept = filter_by_apogee(
            &geometry,
            raw_passes(&geometry),
            min_apogee,
            &GroundStation::default(),
        )
        .unwrap();

        assert_eq!(kept.len(), expected);
        assert!(kept.iter().all(|p| p.apogee_elevation_deg >= min_apogee));
    }

    #[test]
    fn dropped_passes_peak_below_threshold() {
        let geometry = geometry();
        let station = GroundStation::default();
        let all = raw_passes(&geometry);
        let kept = filter_by_apogee(&geometry, all.clone(), 30.0, &station).unwrap();

        for raw in all.iter().filter(|r| !kept.iter().any(|k| &k.raw == *r)) {
            let look = geometry.observer_look(&raw.satellite, raw.peak, &station).unwrap();
            assert!(look.elevation_deg < 30.0);
        }
        assert_eq!(kept[0].apogee_elevation_deg, 30.0);
    }
}
