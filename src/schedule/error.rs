use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("Satellite worker failed: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for ScheduleError {
    fn from(err: tokio::task::JoinError) -> Self {
        ScheduleError::Worker(err.to_string())
    }
}
