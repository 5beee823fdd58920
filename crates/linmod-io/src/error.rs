use linmod_core::MlError;
use thiserror::Error;

/// Failures while reading or writing model files and datasets.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed file: {0}")]
    Format(String),

    #[error(transparent)]
    Ml(#[from] MlError),
}
