//! REST endpoints for the chat widget.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::widget::ChatRegistry;

/// Shared state for chat routes.
#[derive(Clone)]
pub struct ChatRouteState {
    pub registry: Arc<ChatRegistry>,
}

/// POST /api/chat
///
/// Opens a new widget: creates the session (if a credential is configured)
/// and returns the greeting transcript.
async fn open_chat(State(state): State<ChatRouteState>) -> impl IntoResponse {
    let widget = state.registry.open_widget().await;
    let live = widget.is_live().await;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": widget.id,
            "live": live,
            "messages": widget.transcript().await,
        })),
    )
}

#[derive(Deserialize)]
struct SendRequest {
    text: String,
}

/// POST /api/chat/{id}/messages
async fn send_message(
    State(state): State<ChatRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SendRequest>,
) -> impl IntoResponse {
    let Some(widget) = state.registry.get(id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Chat not found"})),
        );
    };

    match widget.send(&body.text).await {
        Some(reply) => (StatusCode::OK, Json(serde_json::json!({"reply": reply}))),
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Message is empty"})),
        ),
    }
}

/// GET /api/chat/{id}/messages
async fn list_messages(
    State(state): State<ChatRouteState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.registry.get(id).await {
        Some(widget) => Json(serde_json::json!(widget.transcript().await)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Chat not found"})),
        )
            .into_response(),
    }
}

/// DELETE /api/chat/{id}
async fn close_chat(State(state): State<ChatRouteState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.registry.remove(id).await {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Chat not found"})),
        )
            .into_response(),
    }
}

/// Build the chat REST routes.
pub fn chat_routes(state: ChatRouteState) -> Router {
    Router::new()
        .route("/api/chat", post(open_chat))
        .route("/api/chat/{id}", delete(close_chat))
        .route(
            "/api/chat/{id}/messages",
            post(send_message).get(list_messages),
        )
        .with_state(state)
}
