use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NdviError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Earth Engine returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Error processing NDVI data: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Missing {field}")]
    MissingParameter { field: String },
}

impl NdviError {
    /// 對應的 HTTP 狀態碼
    pub fn status_code(&self) -> StatusCode {
        match self {
            NdviError::ValidationError { .. } | NdviError::MissingParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

pub type Result<T> = std::result::Result<T, NdviError>;
