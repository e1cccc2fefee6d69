use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::{Timelike, Utc};

use crate::schedule::{compute_schedule_concurrent, ScheduleError};
use crate::web::api::error::ApiError;
use crate::web::form::{InputError, ScheduleForm};
use crate::web::state::AppState;

use super::templates::{ErrorTemplate, FormValues, IndexTemplate};

/// Failed page request, rendered as the error page.
pub struct UiError(ApiError);

impl From<InputError> for UiError {
    fn from(e: InputError) -> Self {
        UiError(e.into())
    }
}

impl From<ScheduleError> for UiError {
    fn from(e: ScheduleError) -> Self {
        UiError(e.into())
    }
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let message = self.0.body().message.unwrap_or_default();
        if status.is_server_error() {
            log::error!("Schedule page failed: {}", message);
        }
        (status, ErrorTemplate { message }).into_response()
    }
}

pub async fn index(State(state): State<AppState>) -> IndexTemplate {
    IndexTemplate {
        form: default_values(&state),
        satellites: state.config.catalog.satellites.names().to_vec(),
        passes: None,
        conflicts: 0,
    }
}

pub async fn schedule(
    State(state): State<AppState>,
    Form(form): Form<ScheduleForm>,
) -> Result<IndexTemplate, UiError> {
    let request = form.parse()?;
    let schedule = compute_schedule_concurrent(
        state.geometry.clone(),
        &state.config.catalog.satellites,
        request,
    )
    .await?;

    Ok(IndexTemplate {
        form: echo_values(form),
        satellites: state.config.catalog.satellites.names().to_vec(),
        conflicts: schedule.conflict_count(),
        passes: Some(schedule.rows()),
    })
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ErrorTemplate {
            message: "Page not found".to_string(),
        },
    )
}

fn default_values(state: &AppState) -> FormValues {
    let defaults = &state.config.defaults;
    let station = state.config.ground_station().ok().flatten().unwrap_or_default();
    let now = Utc::now();
    let now = now.with_second(0).unwrap_or(now);

    FormValues {
        lat: station.latitude_deg.to_string(),
        lon: station.longitude_deg.to_string(),
        alt: station.altitude_m.to_string(),
        min_elevation: defaults.min_elevation_deg.to_string(),
        min_apogee: defaults.min_apogee_deg.to_string(),
        start_time: now.format("%Y-%m-%dT%H:%M").to_string(),
        duration: defaults.duration_hours.to_string(),
    }
}

fn echo_values(form: ScheduleForm) -> FormValues {
    FormValues {
        lat: form.lat.unwrap_or_default(),
        lon: form.lon.unwrap_or_default(),
        alt: form.alt.unwrap_or_default(),
        min_elevation: form.min_elevation.unwrap_or_default(),
        min_apogee: form.min_apogee.unwrap_or_default(),
        start_time: form.start_time.unwrap_or_default(),
        duration: form.duration.unwrap_or_default(),
    }
}
