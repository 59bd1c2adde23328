//! Chat endpoints

use axum::{Json, extract::State};
use medbot_core::DoctorRecord;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::ai::TextGenerator;
use crate::db::DoctorStore;
use crate::error::AppError;

/// Request body shared by both chat endpoints
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub facts: Option<String>,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub reply: String,
    pub query: Option<String>,
    pub params: Vec<String>,
    pub rows: Vec<DoctorRecord>,
}

/// Trimmed message, rejected when empty or longer than `max_chars`
pub fn validate_message(message: &str, max_chars: usize) -> Result<&str, AppError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("Message must not be empty.".to_string()));
    }
    if message.chars().count() > max_chars {
        return Err(AppError::BadRequest(format!(
            "Message must be at most {max_chars} characters."
        )));
    }
    Ok(message)
}

/// POST /chat - Phrased answer grounded in the doctor directory
pub async fn reply<S, G>(
    State(state): State<AppState<S, G>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError>
where
    S: DoctorStore + 'static,
    G: TextGenerator + 'static,
{
    let message = validate_message(&request.message, state.max_input_chars)?;
    let reply = state.assistant.get_reply(message).await?;

    Ok(Json(ChatResponse {
        reply: reply.reply,
        facts: reply.facts,
        degraded: reply.degraded,
    }))
}

/// POST /chat/query - Answer through the fixed SQL template
pub async fn query<S, G>(
    State(state): State<AppState<S, G>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<QueryResponse>, AppError>
where
    S: DoctorStore + 'static,
    G: TextGenerator + 'static,
{
    let message = validate_message(&request.message, state.max_input_chars)?;
    let reply = state.assistant.get_structured_reply(message).await?;

    Ok(Json(QueryResponse {
        reply: reply.reply,
        query: reply.query,
        params: reply.params,
        rows: reply.rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_trimmed_and_bounded() {
        assert_eq!(validate_message("  I have fever \n", 200).unwrap(), "I have fever");
        assert!(validate_message("   ", 200).is_err());
        assert!(validate_message(&"a".repeat(201), 200).is_err());
        assert!(validate_message(&"é".repeat(200), 200).is_ok());
    }
}
