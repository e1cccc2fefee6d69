use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::schedule::ScheduleResponse;
use super::form::{NumberField, ScheduleQuery, TrajectoryForm};
use crate::schedule::ScheduleRow;
use crate::trajectory::TrajectorySample;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::schedule::compute,
        super::api::schedule::list_satellites,
        super::api::trajectory::samples,
        super::api::trajectory::download,
    ),
    components(
        schemas(
            ScheduleQuery,
            ScheduleResponse,
            ScheduleRow,
            TrajectoryForm,
            NumberField,
            TrajectorySample,
            ErrorResponse,
        )
    ),
    info(
        title = "wx-pass API",
        description = "Weather satellite pass schedules and trajectories",
        version = "0.1.0"
    ),
    tags(
        (name = "schedule", description = "Pass schedule computation"),
        (name = "trajectory", description = "Per-second look angles of a pass")
    )
)]
pub struct ApiDoc;
