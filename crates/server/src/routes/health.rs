//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::AppState;
use crate::ai::TextGenerator;
use crate::db::DoctorStore;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

/// GET /health - Check that the record store answers
pub async fn check<S, G>(State(state): State<AppState<S, G>>) -> impl IntoResponse
where
    S: DoctorStore + 'static,
    G: TextGenerator + 'static,
{
    match state.assistant.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                reason: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    reason: Some("Record store unreachable"),
                }),
            )
        }
    }
}
