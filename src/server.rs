//! HTTP server: page routes plus the deck, intake and chat APIs.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::{ChatRegistry, ChatRouteState, chat_routes};
use crate::config::AppConfig;
use crate::deck::{Deck, DeckRouteState, DisplayMode, Presenter, deck_routes};
use crate::error::Result;
use crate::intake::{IntakeRegistry, IntakeRouteState, SimulatedSubmitter, intake_routes};
use crate::llm::create_provider;
use crate::share::{Clipboard, SystemClipboard};
use crate::ui::{ViewMode, render_deck_page, render_export_page, render_landing_page};

/// How often idle visitor state is checked.
const PRUNE_INTERVAL: Duration = Duration::from_secs(600);

/// Long-lived services behind the router.
#[derive(Clone)]
pub struct AppState {
    pub presenter: Arc<Presenter>,
    pub intake: Arc<IntakeRegistry>,
    pub chat: Arc<ChatRegistry>,
    pub clipboard: Arc<dyn Clipboard>,
    pub share_url: String,
}

impl AppState {
    /// Wire up the production services from config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            presenter: Presenter::new(Arc::new(Deck::pitch()), config.print_settle),
            intake: IntakeRegistry::new(Arc::new(SimulatedSubmitter::new(config.submit_delay))),
            chat: ChatRegistry::new(create_provider(config)?),
            clipboard: Arc::new(SystemClipboard),
            share_url: config.public_url.clone(),
        })
    }
}

/// Build the full router.
pub fn build_router(state: AppState) -> Router {
    let deck = deck_routes(DeckRouteState {
        presenter: Arc::clone(&state.presenter),
        clipboard: Arc::clone(&state.clipboard),
        share_url: state.share_url.clone(),
    });
    let intake = intake_routes(IntakeRouteState {
        registry: Arc::clone(&state.intake),
    });
    let chat = chat_routes(ChatRouteState {
        registry: Arc::clone(&state.chat),
    });

    Router::new()
        .route("/health", get(health))
        .route("/", get(deck_page))
        .route("/export", get(export_page))
        .route("/landing", get(landing_page))
        .with_state(state)
        .merge(deck)
        .merge(intake)
        .merge(chat)
        .layer(CorsLayer::permissive())
}

/// Bind `0.0.0.0:{port}` and serve until the process exits.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let pruning_handle = spawn_idle_pruning(&state, config.session_idle_timeout, PRUNE_INTERVAL);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!(port = config.port, live_chat = config.has_credential(), "EstateFlow server started");
    let served = axum::serve(listener, build_router(state)).await;

    pruning_handle.abort();
    served?;
    Ok(())
}

/// Drop intake flows and chat widgets idle longer than `idle_timeout`,
/// checking every `every`.
pub fn spawn_idle_pruning(state: &AppState, idle_timeout: Duration, every: Duration) -> JoinHandle<()> {
    let intake = Arc::clone(&state.intake);
    let chat = Arc::clone(&state.chat);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // Skip immediate first tick
        loop {
            interval.tick().await;
            let flows = intake.prune_idle(idle_timeout).await;
            let widgets = chat.prune_idle(idle_timeout).await;
            debug!(flows, widgets, "Idle pruning pass");
        }
    })
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "estate-flow"
    }))
}

/// GET /: the deck as it currently stands; stacked when in export mode.
async fn deck_page(State(state): State<AppState>) -> Html<String> {
    let html = state
        .presenter
        .with_controller(|c| match c.mode() {
            DisplayMode::Normal => render_deck_page(c),
            DisplayMode::Export => render_export_page(c.visible_slides()),
        })
        .await;
    Html(html)
}

/// GET /export: every slide, without touching the shared display mode.
async fn export_page(State(state): State<AppState>) -> Html<String> {
    Html(render_export_page(state.presenter.deck().slides()))
}

#[derive(Deserialize)]
struct LandingParams {
    #[serde(default)]
    view: ViewMode,
    lead: Option<Uuid>,
    chat: Option<Uuid>,
}

/// GET /landing?view=client|pitch&lead=<uuid>&chat=<uuid>
async fn landing_page(State(state): State<AppState>, Query(params): Query<LandingParams>) -> Html<String> {
    let flow = match params.lead {
        Some(id) => state.intake.get(id).await,
        None => None,
    };
    let widget = match params.chat {
        Some(id) => state.chat.get(id).await,
        None => None,
    };
    let transcript = match &widget {
        Some(widget) => widget.transcript().await,
        None => Vec::new(),
    };
    let chat = widget.as_ref().map(|w| (w.id, transcript.as_slice()));
    Html(render_landing_page(params.view, flow.as_ref(), chat))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::error::ShareError;

    struct NoClipboard;

    impl Clipboard for NoClipboard {
        fn write_text(&self, _text: &str) -> std::result::Result<(), ShareError> {
            Err(ShareError::Unavailable("headless".into()))
        }
    }

    fn test_state() -> AppState {
        AppState {
            presenter: Presenter::new(Arc::new(Deck::pitch()), Duration::from_secs(60)),
            intake: IntakeRegistry::new(Arc::new(SimulatedSubmitter::new(Duration::from_millis(5)))),
            chat: ChatRegistry::new(None),
            clipboard: Arc::new(NoClipboard),
            share_url: "http://deck.test".into(),
        }
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("estate-flow"));
    }

    #[tokio::test]
    async fn root_follows_display_mode() {
        let state = test_state();
        let router = build_router(state.clone());

        let html = body_string(router.clone().oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap()).await;
        assert_eq!(html.matches("data-slide=").count(), 1);

        state.presenter.set_export_mode(true).await;
        let html = body_string(router.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap()).await;
        assert_eq!(html.matches("data-slide=").count(), 6);
        assert!(html.contains("Exit PDF View"));
    }

    #[tokio::test]
    async fn jump_out_of_range_keeps_index() {
        let router = build_router(test_state());
        let response = router
            .oneshot(post_json("/api/deck/jump", serde_json::json!({"index": 99})))
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["index"], 0);
        assert_eq!(json["position"], "1 / 6");
    }

    #[tokio::test]
    async fn share_without_clipboard_opens_modal() {
        let state = test_state();
        let response = build_router(state.clone())
            .oneshot(Request::post("/api/deck/share").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["outcome"], "manual_copy");
        assert_eq!(json["url"], "http://deck.test");
        assert!(state.presenter.snapshot().await.modal.is_some());
    }

    #[tokio::test]
    async fn landing_renders_lead_and_chat() {
        let state = test_state();
        let flow = state.intake.start().await;
        let widget = state.chat.open_widget().await;
        let uri = format!("/landing?view=pitch&lead={}&chat={}", flow.id, widget.id);

        let html = body_string(
            build_router(state)
                .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Step 1 of 3"));
        assert!(html.contains("pitch-overlay"));
        assert!(html.contains("Hello! I&#x27;m Sarah"));
    }

    #[tokio::test]
    async fn demo_mode_chat_round_trip() {
        let router = build_router(test_state());
        let response = router.clone().oneshot(post_json("/api/chat", serde_json::json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let opened: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(opened["live"], false);

        let uri = format!("/api/chat/{}/messages", opened["id"].as_str().unwrap());
        let response = router
            .oneshot(post_json(&uri, serde_json::json!({"text": "Hi"})))
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["reply"], crate::chat::prompts::DEMO_MODE_REPLY);
    }

    #[tokio::test]
    async fn delete_discards_lead_and_chat() {
        let state = test_state();
        let flow = state.intake.start().await;
        let widget = state.chat.open_widget().await;
        let router = build_router(state.clone());

        for uri in [format!("/api/leads/{}", flow.id), format!("/api/chat/{}", widget.id)] {
            let response = router
                .clone()
                .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);

            let again = router
                .clone()
                .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(again.status(), StatusCode::NOT_FOUND);
        }
        assert!(state.intake.is_empty().await);
        assert!(state.chat.is_empty().await);
    }

    #[tokio::test]
    async fn idle_pruning_empties_registries() {
        let state = test_state();
        state.intake.start().await;
        state.chat.open_widget().await;

        let handle = spawn_idle_pruning(&state, Duration::ZERO, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(state.intake.is_empty().await);
        assert!(state.chat.is_empty().await);
    }
}
