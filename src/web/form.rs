use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::predict::GroundStation;
use crate::schedule::{ScheduleRequest, DISPLAY_FORMAT};

const FORM_START_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Longest schedule window accepted, one month.
pub const MAX_DURATION_HOURS: i64 = 31 * 24;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Missing field '{0}'")]
    Missing(&'static str),
    #[error("Field '{field}' is not a number: '{value}'")]
    Number { field: &'static str, value: String },
    #[error("Field '{field}' is not a valid time: '{value}'")]
    Time { field: &'static str, value: String },
    #[error("Field '{field}' is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

/// Fields of the HTML schedule form, exactly as posted.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleForm {
    #[serde(rename = "lat-input")]
    pub lat: Option<String>,
    #[serde(rename = "lon-input")]
    pub lon: Option<String>,
    /// Meters.
    #[serde(rename = "alt-input")]
    pub alt: Option<String>,
    #[serde(rename = "min-elevation-input")]
    pub min_elevation: Option<String>,
    #[serde(rename = "min-apogee-input")]
    pub min_apogee: Option<String>,
    #[serde(rename = "start-time-input")]
    pub start_time: Option<String>,
    /// Whole hours.
    #[serde(rename = "duration-input")]
    pub duration: Option<String>,
}

impl ScheduleForm {
    pub fn parse(&self) -> Result<ScheduleRequest, InputError> {
        let lat = parse_number("lat-input", required("lat-input", &self.lat)?)?;
        let lon = parse_number("lon-input", required("lon-input", &self.lon)?)?;
        let alt = parse_number("alt-input", required("alt-input", &self.alt)?)?;
        let min_elevation = parse_number(
            "min-elevation-input",
            required("min-elevation-input", &self.min_elevation)?,
        )?;
        let min_apogee = parse_number(
            "min-apogee-input",
            required("min-apogee-input", &self.min_apogee)?,
        )?;
        let start = parse_form_start(
            "start-time-input",
            required("start-time-input", &self.start_time)?,
        )?;
        let duration = parse_hours(
            "duration-input",
            required("duration-input", &self.duration)?,
        )?;

        Ok(ScheduleRequest {
            station: station("lat-input", lat, "lon-input", lon, alt)?,
            min_elevation_deg: min_elevation,
            min_apogee_deg: min_apogee,
            start,
            duration,
        })
    }
}

/// JSON body of `POST /api/schedule`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleQuery {
    pub lat: f64,
    pub lon: f64,
    /// Meters above the ellipsoid.
    #[serde(default)]
    pub alt: f64,
    pub min_elevation: f64,
    pub min_apogee: f64,
    /// `YYYY-MM-DDTHH:MM`, UTC.
    #[schema(example = "2024-03-01T08:00")]
    pub start_time: String,
    pub duration_hours: i64,
}

impl ScheduleQuery {
    pub fn parse(&self) -> Result<ScheduleRequest, InputError> {
        let min_elevation_deg = finite("min_elevation", self.min_elevation)?;
        let min_apogee_deg = finite("min_apogee", self.min_apogee)?;
        let duration = hours_to_duration("duration_hours", self.duration_hours)?;

        Ok(ScheduleRequest {
            station: station("lat", self.lat, "lon", self.lon, self.alt)?,
            min_elevation_deg,
            min_apogee_deg,
            start: parse_form_start("start_time", &self.start_time)?,
            duration,
        })
    }
}

/// A number the browser may send either as JSON number or as text.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    fn value(&self, field: &'static str) -> Result<f64, InputError> {
        match self {
            NumberField::Number(v) => finite(field, *v),
            NumberField::Text(s) => parse_number(field, s),
        }
    }
}

/// Body of the trajectory download and `POST /api/trajectory`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TrajectoryForm {
    pub satellite: Option<String>,
    /// `YYYY.MM.DD HH:MM:SS`, as shown in the schedule table.
    #[schema(example = "2024.03.01 10:04:40")]
    pub start: Option<String>,
    #[schema(example = "2024.03.01 10:13:20")]
    pub end: Option<String>,
    pub lat: Option<NumberField>,
    pub lon: Option<NumberField>,
    /// Meters.
    pub alt: Option<NumberField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRequest {
    pub satellite: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub station: GroundStation,
}

impl TrajectoryForm {
    pub fn parse(&self) -> Result<TrajectoryRequest, InputError> {
        let satellite = required("satellite", &self.satellite)?.trim();
        if satellite.is_empty() {
            return Err(InputError::Missing("satellite"));
        }

        let start = parse_display_time("start", required("start", &self.start)?)?;
        let end = parse_display_time("end", required("end", &self.end)?)?;
        let lat = self.lat.as_ref().ok_or(InputError::Missing("lat"))?.value("lat")?;
        let lon = self.lon.as_ref().ok_or(InputError::Missing("lon"))?.value("lon")?;
        let alt = self.alt.as_ref().ok_or(InputError::Missing("alt"))?.value("alt")?;

        Ok(TrajectoryRequest {
            satellite: satellite.to_string(),
            start,
            end,
            station: station("lat", lat, "lon", lon, alt)?,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, InputError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(InputError::Missing(field)),
    }
}

pub(crate) fn parse_number(field: &'static str, value: &str) -> Result<f64, InputError> {
    let parsed: f64 = value.trim().parse().map_err(|_| InputError::Number {
        field,
        value: value.to_string(),
    })?;
    finite(field, parsed)
}

fn finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::Number {
            field,
            value: value.to_string(),
        })
    }
}

fn parse_hours(field: &'static str, value: &str) -> Result<Duration, InputError> {
    let hours: i64 = value.trim().parse().map_err(|_| InputError::Number {
        field,
        value: value.to_string(),
    })?;
    hours_to_duration(field, hours)
}

fn hours_to_duration(field: &'static str, hours: i64) -> Result<Duration, InputError> {
    if !(0..=MAX_DURATION_HOURS).contains(&hours) {
        return Err(InputError::OutOfRange {
            field,
            value: hours.to_string(),
        });
    }
    check_duration(field, Duration::hours(hours))
}

/// Rejects negative windows and windows longer than [`MAX_DURATION_HOURS`].
pub(crate) fn check_duration(
    field: &'static str,
    duration: Duration,
) -> Result<Duration, InputError> {
    if duration < Duration::zero() || duration > Duration::hours(MAX_DURATION_HOURS) {
        return Err(InputError::OutOfRange {
            field,
            value: format!("{}s", duration.num_seconds()),
        });
    }
    Ok(duration)
}

/// Range and finiteness checks shared by every observer input.
pub(crate) fn station(
    lat_field: &'static str,
    lat: f64,
    lon_field: &'static str,
    lon: f64,
    alt: f64,
) -> Result<GroundStation, InputError> {
    let lat = finite(lat_field, lat)?;
    let lon = finite(lon_field, lon)?;
    let alt = finite("alt", alt)?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(InputError::OutOfRange {
            field: lat_field,
            value: lat.to_string(),
        });
    }
    if !(-180.0..=360.0).contains(&lon) {
        return Err(InputError::OutOfRange {
            field: lon_field,
            value: lon.to_string(),
        });
    }
    Ok(GroundStation::new(lat, lon, alt))
}

/// Parses the form's naive `YYYY-MM-DDTHH:MM[:SS]` as UTC.
pub(crate) fn parse_form_start(field: &'static str, value: &str) -> Result<DateTime<Utc>, InputError> {
    let value = value.trim();
    FORM_START_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| InputError::Time {
            field,
            value: value.to_string(),
        })
}

/// Parses a schedule row timestamp back into an instant.
pub(crate) fn parse_display_time(
    field: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, InputError> {
    NaiveDateTime::parse_from_str(value.trim(), DISPLAY_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| InputError::Time {
            field,
            value: value.to_string(),
        })
}
