use thiserror::Error;

use crate::external::backend::BackendError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed period label: {label:?}")]
    MalformedLabel { label: String },
    #[error("Non-finite value for {label:?}")]
    NonFiniteValue { label: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Backend error: {0}")]
    Backend(BackendError),
}

impl AppError {
    pub(crate) fn malformed(label: impl Into<String>) -> Self {
        AppError::MalformedLabel { label: label.into() }
    }
}

impl From<BackendError> for AppError {
    fn from(value: BackendError) -> Self {
        AppError::Backend(value)
    }
}

impl From<url::ParseError> for AppError {
    fn from(value: url::ParseError) -> Self {
        AppError::Config(value.to_string())
    }
}
