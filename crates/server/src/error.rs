//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medbot_core::MedbotError;
use serde::Serialize;

const STORE_APOLOGY: &str =
    "Sorry, the doctor directory is unavailable right now. Please try again in a few minutes.";
const INTERNAL_APOLOGY: &str = "Sorry, something went wrong while answering your question.";

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error body
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Store and internal details are logged, never returned
        let (status, error, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.as_str()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.as_str()),
            AppError::TooManyRequests(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "too_many_requests", msg.as_str())
            }
            AppError::StoreUnavailable(detail) => {
                tracing::error!(error = %detail, "Record store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", STORE_APOLOGY)
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", INTERNAL_APOLOGY)
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<MedbotError> for AppError {
    fn from(err: MedbotError) -> Self {
        match err {
            MedbotError::StoreUnavailable(msg) | MedbotError::Dataset(msg) => AppError::StoreUnavailable(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_hide_details() {
        let response = AppError::from(MedbotError::StoreUnavailable("/data/x.csv: permission denied".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn other_errors_are_internal() {
        let err = AppError::from(MedbotError::Query("syntax error".into()));
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
