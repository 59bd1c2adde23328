pub mod chat;
pub mod health;
pub mod metrics;
pub mod ui;

use axum::{Router, routing::post};

use crate::AppState;
use crate::ai::TextGenerator;
use crate::db::DoctorStore;

/// Routes that reach the assistant (authenticated and rate limited)
pub fn chat_routes<S, G>() -> Router<AppState<S, G>>
where
    S: DoctorStore + 'static,
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/chat", post(chat::reply::<S, G>))
        .route("/chat/query", post(chat::query::<S, G>))
        .route("/ask", post(ui::ask::<S, G>))
}
