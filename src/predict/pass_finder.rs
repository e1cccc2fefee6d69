use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::predict::error::PredictError;
use crate::predict::types::RawPass;

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const HORIZON_ELEVATION: f64 = 0.0;
const MAX_OVERRUN_MINUTES: i64 = 30;

/// Find horizon-to-horizon passes that rise within `[start, end]`.
///
/// `elevation_at` maps an instant to the elevation of the satellite in
/// degrees. Rise is the first visible second, set the last. A pass still up
/// at `end` is followed for up to `MAX_OVERRUN_MINUTES` to find its set.
pub fn find_passes<F>(
    satellite: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    mut elevation_at: F,
) -> Result<Vec<RawPass>, PredictError>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let overrun = Duration::minutes(MAX_OVERRUN_MINUTES);
    let limit = shift(end, overrun)?;

    let mut passes = Vec::new();
    let mut cursor = start.trunc_subsecs(0);
    let first = cursor;
    let mut prev_visible = false;
    let mut rise: Option<DateTime<Utc>> = None;
    let mut max_el = f64::NEG_INFINITY;
    let mut max_el_time = cursor;

    while cursor <= limit {
        if rise.is_none() && cursor > end {
            break;
        }

        let elevation = elevation_at(cursor)?;
        let visible = elevation >= HORIZON_ELEVATION;

        if visible && cursor == first {
            // Already up at the window start: walk back to the real rise
            let (aos, peak_time, peak_el) =
                rise_before(&mut elevation_at, cursor, elevation, shift(cursor, -overrun)?)?;
            rise = Some(aos);
            max_el = peak_el;
            max_el_time = peak_time;
        } else if visible && !prev_visible {
            // AOS detected - refine to find exact crossing
            rise = Some(refine_crossing(
                &mut elevation_at,
                cursor - coarse_step,
                cursor,
                true,
            )?);
            max_el = elevation;
            max_el_time = cursor;
        } else if visible {
            if elevation > max_el {
                max_el = elevation;
                max_el_time = cursor;
            }
        } else if let Some(aos) = rise.take() {
            let los = refine_crossing(&mut elevation_at, cursor - coarse_step, cursor, false)?;
            passes.extend(close_pass(satellite, aos, los, max_el_time, &mut elevation_at)?);
            max_el = f64::NEG_INFINITY;
        }

        prev_visible = visible;
        cursor += coarse_step;
    }

    // Still up after the overrun limit: cut the pass there
    if let Some(aos) = rise {
        passes.extend(close_pass(satellite, aos, limit, max_el_time, &mut elevation_at)?);
    }

    Ok(passes)
}

fn shift(instant: DateTime<Utc>, by: Duration) -> Result<DateTime<Utc>, PredictError> {
    instant
        .checked_add_signed(by)
        .ok_or_else(|| PredictError::WindowOutOfRange(format!("{} + {}s", instant, by.num_seconds())))
}

/// Coarse backward scan from a visible `start` down to `earliest`.
///
/// Returns the bisected rise plus the highest sample seen on the way. A
/// satellite still up at `earliest` gets its rise cut there.
fn rise_before<F>(
    elevation_at: &mut F,
    start: DateTime<Utc>,
    start_elevation: f64,
    earliest: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>, f64), PredictError>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let mut best_time = start;
    let mut best_el = start_elevation;
    let mut cursor = start;

    while cursor > earliest {
        let before = cursor - coarse_step;
        let elevation = elevation_at(before)?;
        if elevation < HORIZON_ELEVATION {
            let rise = refine_crossing(elevation_at, before, cursor, true)?;
            return Ok((rise, best_time, best_el));
        }
        if elevation > best_el {
            best_el = elevation;
            best_time = before;
        }
        cursor = before;
    }

    Ok((cursor, best_time, best_el))
}

fn close_pass<F>(
    satellite: &str,
    rise: DateTime<Utc>,
    set: DateTime<Utc>,
    coarse_peak: DateTime<Utc>,
    elevation_at: &mut F,
) -> Result<Option<RawPass>, PredictError>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let Some(peak) = refine_peak(elevation_at, rise, set, coarse_peak)? else {
        log::debug!("{}: dropping degenerate pass at {}", satellite, rise);
        return Ok(None);
    };

    Ok(Some(RawPass {
        satellite: satellite.to_string(),
        rise,
        set,
        peak,
    }))
}

/// Binary search to find exact horizon crossing time
fn refine_crossing<F>(
    elevation_at: &mut F,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    is_aos: bool, // true = rising, false = setting
) -> Result<DateTime<Utc>, PredictError>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + Duration::seconds((high - low).num_seconds() / 2);
        let above = elevation_at(mid)? >= HORIZON_ELEVATION;
        if above == is_aos {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(if is_aos { high } else { low })
}

/// Second-resolution scan around the best coarse sample, kept strictly
/// inside `(rise, set)`. `None` when the pass is too short for that.
fn refine_peak<F>(
    elevation_at: &mut F,
    rise: DateTime<Utc>,
    set: DateTime<Utc>,
    coarse_peak: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, PredictError>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let fine_step = Duration::seconds(FINE_STEP_SECONDS);
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let low = (coarse_peak - coarse_step).max(rise + fine_step);
    let high = (coarse_peak + coarse_step).min(set - fine_step);
    if low > high {
        return Ok(None);
    }

    let mut best = low;
    let mut best_el = f64::NEG_INFINITY;
    let mut cursor = low;
    while cursor <= high {
        let elevation = elevation_at(cursor)?;
        if elevation > best_el {
            best_el = elevation;
            best = cursor;
        }
        cursor += fine_step;
    }

    Ok(Some(best))
}
