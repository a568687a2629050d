//! API error type and its JSON rendering.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use santri_core::{FieldError, SantriError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error body: `{ message }`, plus `errors` for validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("Student not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("upload failed: {0}")]
    Upload(#[from] MultipartError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Too many requests")]
    RateLimited,

    /// The message is returned to the client; the source is only logged.
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: SantriError,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, source: SantriError) -> Self {
        Self::Internal { message, source }
    }

    /// Failure reading an uploaded workbook. A workbook without sheets is
    /// the client's mistake; anything else is reported as an import failure.
    pub fn import(err: SantriError) -> Self {
        match err {
            SantriError::NoWorksheet => Self::BadRequest("No worksheet found"),
            other => Self::internal("Failed to import data", other),
        }
    }
}

impl From<SantriError> for ApiError {
    fn from(err: SantriError) -> Self {
        match err {
            SantriError::Validation(errors) => Self::Validation(errors),
            SantriError::NotFound(_) => Self::NotFound,
            other => Self::internal("Internal server error", other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, message, errors),
            ApiError::NotFound => (StatusCode::NOT_FOUND, message, Vec::new()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, message, Vec::new()),
            ApiError::Upload(err) => (err.status(), err.body_text(), Vec::new()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, message, Vec::new()),
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, message, Vec::new()),
            ApiError::Internal { source, .. } => {
                error!(error = %source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message, Vec::new())
            }
        };

        (status, Json(ErrorBody { message, errors })).into_response()
    }
}
