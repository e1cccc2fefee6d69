use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::schedule::{compute_schedule_concurrent, ScheduleRow};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::form::ScheduleQuery;
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub passes: Vec<ScheduleRow>,
    pub conflicts: usize,
}

#[utoipa::path(
    post,
    path = "/api/schedule",
    tag = "schedule",
    request_body = ScheduleQuery,
    responses(
        (status = 200, description = "Merged pass schedule", body = ScheduleResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Missing orbital elements", body = ErrorResponse)
    )
)]
pub async fn compute(
    State(state): State<AppState>,
    Json(query): Json<ScheduleQuery>,
) -> ApiResult<Json<ScheduleResponse>> {
    let request = query.parse()?;
    let schedule = compute_schedule_concurrent(
        state.geometry.clone(),
        &state.config.catalog.satellites,
        request,
    )
    .await?;

    Ok(Json(ScheduleResponse {
        conflicts: schedule.conflict_count(),
        passes: schedule.rows(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    tag = "schedule",
    responses(
        (status = 200, description = "Tracked satellites, in schedule order", body = Vec<String>)
    )
)]
pub async fn list_satellites(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.config.catalog.satellites.names().to_vec())
}
