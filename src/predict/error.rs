use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE file not found: {0}")]
    FileNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("No orbital elements for satellite '{0}'")]
    UnknownSatellite(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Search window out of range: {0}")]
    WindowOutOfRange(String),
}

impl From<sgp4::Error> for PredictError {
    fn from(err: sgp4::Error) -> Self {
        PredictError::Propagation(err.to_string())
    }
}
