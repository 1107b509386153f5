//! REST + WebSocket endpoints for the presentation deck.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::controller::{Key, Modal};
use super::presenter::{DeckEvent, Presenter};
use crate::share::{Clipboard, ShareOutcome};

/// Shared state for deck routes.
#[derive(Clone)]
pub struct DeckRouteState {
    pub presenter: Arc<Presenter>,
    pub clipboard: Arc<dyn Clipboard>,
    /// Link copied by the share action.
    pub share_url: String,
}

/// Build the deck REST and WebSocket routes.
pub fn deck_routes(state: DeckRouteState) -> Router {
    Router::new()
        .route("/ws/deck", get(ws_handler))
        .route("/api/deck", get(get_deck))
        .route("/api/deck/next", post(next))
        .route("/api/deck/previous", post(previous))
        .route("/api/deck/jump", post(jump))
        .route("/api/deck/key", post(key))
        .route("/api/deck/export", post(export))
        .route("/api/deck/modal", post(open_modal).delete(close_modal))
        .route("/api/deck/share", post(share))
        .with_state(state)
}

// ── WebSocket ───────────────────────────────────────────────────────────

/// Commands a deck client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum DeckCommand {
    Next,
    Previous,
    Jump { index: usize },
    Key { key: String },
    Export { enabled: bool },
    CloseModal,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<DeckRouteState>) -> impl IntoResponse {
    info!("Deck client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state.presenter))
}

async fn send_sync(socket: &mut WebSocket, presenter: &Presenter) -> bool {
    let sync = DeckEvent::Sync {
        state: presenter.snapshot().await,
    };
    match serde_json::to_string(&sync) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(_) => true,
    }
}

async fn handle_socket(mut socket: WebSocket, presenter: Arc<Presenter>) {
    // Subscribe before the initial sync so no change slips in between
    let mut rx = presenter.subscribe();

    if !send_sync(&mut socket, &presenter).await {
        warn!("Failed to send initial deck sync, client disconnected");
        return;
    }
    info!("Deck client connected");

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if socket.send(Message::Text(json.into())).await.is_err() {
                                debug!("Deck client disconnected during send");
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "Deck client lagged behind broadcast");
                        if !send_sync(&mut socket, &presenter).await {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Deck broadcast channel closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&text, &presenter).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Deck client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Deck WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("Deck connection closed");
}

async fn handle_client_message(text: &str, presenter: &Presenter) {
    match serde_json::from_str::<DeckCommand>(text) {
        Ok(command) => {
            debug!(?command, "Deck command via WS");
            match command {
                DeckCommand::Next => {
                    presenter.next().await;
                }
                DeckCommand::Previous => {
                    presenter.previous().await;
                }
                DeckCommand::Jump { index } => {
                    presenter.jump_to(index).await;
                }
                DeckCommand::Key { key } => {
                    presenter.handle_key(&Key::from(key.as_str())).await;
                }
                DeckCommand::Export { enabled } => {
                    presenter.set_export_mode(enabled).await;
                }
                DeckCommand::CloseModal => {
                    presenter.close_modal().await;
                }
            }
        }
        Err(e) => {
            debug!(error = %e, text = text, "Unrecognized WS message from deck client");
        }
    }
}

// ── REST Endpoints ──────────────────────────────────────────────────────

/// GET /api/deck: current state plus slide content.
async fn get_deck(State(state): State<DeckRouteState>) -> impl IntoResponse {
    let snapshot = state.presenter.snapshot().await;
    Json(serde_json::json!({
        "state": snapshot,
        "slides": state.presenter.deck().slides(),
    }))
}

async fn next(State(state): State<DeckRouteState>) -> impl IntoResponse {
    Json(state.presenter.next().await)
}

async fn previous(State(state): State<DeckRouteState>) -> impl IntoResponse {
    Json(state.presenter.previous().await)
}

#[derive(Deserialize)]
struct JumpRequest {
    index: usize,
}

/// POST /api/deck/jump: out-of-range indices leave the deck where it is.
async fn jump(State(state): State<DeckRouteState>, Json(body): Json<JumpRequest>) -> impl IntoResponse {
    Json(state.presenter.jump_to(body.index).await)
}

#[derive(Deserialize)]
struct KeyRequest {
    key: String,
}

async fn key(State(state): State<DeckRouteState>, Json(body): Json<KeyRequest>) -> impl IntoResponse {
    Json(state.presenter.handle_key(&Key::from(body.key.as_str())).await)
}

#[derive(Deserialize)]
struct ExportRequest {
    enabled: bool,
}

async fn export(State(state): State<DeckRouteState>, Json(body): Json<ExportRequest>) -> impl IntoResponse {
    Json(state.presenter.set_export_mode(body.enabled).await)
}

#[derive(Deserialize)]
struct ModalRequest {
    modal: Modal,
}

/// POST /api/deck/modal
async fn open_modal(State(state): State<DeckRouteState>, Json(body): Json<ModalRequest>) -> impl IntoResponse {
    Json(state.presenter.open_modal(body.modal).await)
}

async fn close_modal(State(state): State<DeckRouteState>) -> impl IntoResponse {
    Json(state.presenter.close_modal().await)
}

/// POST /api/deck/share
async fn share(State(state): State<DeckRouteState>) -> impl IntoResponse {
    let outcome = state.presenter.share(state.clipboard.as_ref(), &state.share_url).await;
    let status = match outcome {
        ShareOutcome::Copied => StatusCode::OK,
        ShareOutcome::ManualCopy { .. } => StatusCode::ACCEPTED,
    };
    (status, Json(outcome))
}
