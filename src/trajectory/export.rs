use chrono::{DateTime, Utc};

use crate::predict::PredictError;
use crate::trajectory::sampler::TrajectorySample;

pub const EXPORT_FILE_NAME: &str = "trajectory.txt";

/// Render the line-oriented trajectory document.
pub fn render_trajectory<I>(
    satellite: &str,
    start: DateTime<Utc>,
    samples: I,
) -> Result<String, PredictError>
where
    I: IntoIterator<Item = Result<TrajectorySample, PredictError>>,
{
    let mut content = format!(
        "Satellite {}\nStart date & time {}\n\nTime (UTC) Azimuth Elevation\n\n",
        satellite,
        start.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for sample in samples {
        let sample = sample?;
        content.push_str(&format!(
            "{} {:.2} {:.2}\n",
            sample.time.format("%H:%M:%S"),
            sample.azimuth_deg,
            sample.elevation_deg
        ));
    }

    Ok(content)
}
