use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::predict::PredictError;
use crate::trajectory::{render_trajectory, TrajectorySample, TrajectorySampler, EXPORT_FILE_NAME};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::form::{TrajectoryForm, TrajectoryRequest};
use crate::web::state::{AppState, DynGeometry, SharedGeometry};

#[utoipa::path(
    post,
    path = "/api/trajectory",
    tag = "trajectory",
    request_body = TrajectoryForm,
    responses(
        (status = 200, description = "One look angle per second of the window", body = Vec<TrajectorySample>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Missing orbital elements", body = ErrorResponse)
    )
)]
pub async fn samples(
    State(state): State<AppState>,
    Json(form): Json<TrajectoryForm>,
) -> ApiResult<Json<Vec<TrajectorySample>>> {
    let request = form.parse()?;
    let samples = with_geometry(state.geometry.clone(), move |geometry| {
        sampler(geometry, &request).collect()
    })
    .await?;
    Ok(Json(samples))
}

#[utoipa::path(
    post,
    path = "/download_trajectory",
    tag = "trajectory",
    request_body = TrajectoryForm,
    responses(
        (status = 200, description = "Trajectory text file", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Missing orbital elements", body = ErrorResponse)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Json(form): Json<TrajectoryForm>,
) -> ApiResult<Response> {
    let request = form.parse()?;
    log::info!(
        "Trajectory export for {} from {} to {}",
        request.satellite,
        request.start,
        request.end
    );

    let content = with_geometry(state.geometry.clone(), move |geometry| {
        render_trajectory(&request.satellite, request.start, sampler(geometry, &request))
    })
    .await?;

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

fn sampler<'a>(
    geometry: &'a DynGeometry,
    request: &TrajectoryRequest,
) -> TrajectorySampler<'a, DynGeometry> {
    TrajectorySampler::new(
        geometry,
        &request.satellite,
        request.start,
        request.end,
        request.station,
    )
}

/// Runs a propagation-heavy closure on the blocking pool.
async fn with_geometry<T, F>(geometry: SharedGeometry, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&DynGeometry) -> Result<T, PredictError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(geometry.as_ref()))
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))?;
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::form::NumberField;
    use crate::web::state::tests::{at, state};
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    fn form(satellite: &str, start: &str, end: &str) -> TrajectoryForm {
        TrajectoryForm {
            satellite: Some(satellite.into()),
            start: Some(start.into()),
            end: Some(end.into()),
            lat: Some(NumberField::Number(55.75)),
            lon: Some(NumberField::Text("37.61".into())),
            alt: Some(NumberField::Number(150.0)),
        }
    }

    #[tokio::test]
    async fn samples_every_second_inclusive() {
        let Json(samples) = samples(
            State(state()),
            Json(form("NOAA 19", "2024.03.01 10:05:00", "2024.03.01 10:05:09")),
        )
        .await
        .unwrap();
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0].time, at(10, 5, 0));
        assert_eq!(samples[9].time, at(10, 5, 9));
    }

    #[tokio::test]
    async fn download_is_text_attachment() {
        let response = download(
            State(state()),
            Json(form("NOAA 19", "2024.03.01 10:05:00", "2024.03.01 10:05:02")),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"trajectory.txt\""
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Satellite NOAA 19");
        assert_eq!(lines[1], "Start date & time 2024-03-01 10:05:00 UTC");
        assert_eq!(lines[3], "Time (UTC) Azimuth Elevation");
        assert_eq!(lines.len(), 8);
        assert!(lines[5].starts_with("10:05:00 "));
        assert!(lines[7].starts_with("10:05:02 "));
    }

    #[tokio::test]
    async fn unknown_satellite_is_configuration_error() {
        let err = download(
            State(state()),
            Json(form("NOAA 15", "2024.03.01 10:05:00", "2024.03.01 10:05:02")),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Predict(PredictError::UnknownSatellite(_))
        ));
    }
}
