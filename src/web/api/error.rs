use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::PredictError;
use crate::schedule::ScheduleError;
use crate::web::form::InputError;

#[derive(Debug)]
pub enum ApiError {
    Input(InputError),
    Predict(PredictError),
    Worker(String),
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::Input(e)
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}

impl From<ScheduleError> for ApiError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::Predict(e) => ApiError::Predict(e),
            ScheduleError::Worker(msg) => ApiError::Worker(msg),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Input(_) | ApiError::Predict(PredictError::WindowOutOfRange(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Predict(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Input(e) => ErrorResponse::with_message("invalid_input", &e.to_string()),
            ApiError::Predict(e) => ErrorResponse::with_message(predict_code(e), &e.to_string()),
            ApiError::Worker(msg) => ErrorResponse::with_message("internal_error", msg),
        }
    }
}

fn predict_code(e: &PredictError) -> &'static str {
    match e {
        PredictError::UnknownSatellite(_)
        | PredictError::FileNotFound(_)
        | PredictError::FileRead(_)
        | PredictError::InvalidTle { .. } => "configuration_error",
        PredictError::Propagation(_) => "propagation_error",
        PredictError::WindowOutOfRange(_) => "invalid_input",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.body().message.unwrap_or_default());
        }
        (status, Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
