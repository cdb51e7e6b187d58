use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    NotCollected,
    InvalidRequest(String),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotCollected => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message) = match self {
            ApiError::NotCollected => (
                "not_collected",
                "No articles collected yet. Collect articles first.".to_string(),
            ),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone()),
            ApiError::InternalError(msg) => ("internal_error", msg.clone()),
        };
        ErrorResponse {
            error_type: error_type.to_string(),
            message,
        }
    }
}

impl From<nf_core::Error> for ApiError {
    fn from(err: nf_core::Error) -> Self {
        match err {
            nf_core::Error::InvalidDateRange { .. } | nf_core::Error::Config(_) => {
                ApiError::InvalidRequest(err.to_string())
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
