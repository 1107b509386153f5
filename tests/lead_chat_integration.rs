//! Integration tests for the lead intake REST flow and the chat assistant
//! against a local stand-in for the Gemini API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use estate_flow::chat::prompts::{CONNECTION_TROUBLE_REPLY, EMPTY_REPLY};
use estate_flow::chat::{ChatRegistry, SessionContext};
use estate_flow::deck::{Deck, Presenter};
use estate_flow::intake::{IntakeRegistry, SimulatedSubmitter};
use estate_flow::llm::{LlmProvider, create_gemini_provider};
use estate_flow::server::{AppState, build_router};
use estate_flow::share::SystemClipboard;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn(app: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    port
}

async fn start_server(llm: Option<Arc<dyn LlmProvider>>) -> u16 {
    let state = AppState {
        presenter: Presenter::new(Arc::new(Deck::pitch()), Duration::from_secs(60)),
        intake: IntakeRegistry::new(Arc::new(SimulatedSubmitter::new(Duration::from_millis(20)))),
        chat: ChatRegistry::new(llm),
        clipboard: Arc::new(SystemClipboard),
        share_url: "http://deck.test".into(),
    };
    spawn(build_router(state)).await
}

// ── Gemini stand-in ──────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum StubMode {
    Reply,
    Empty,
    Fail,
}

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn stub_generate(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    // The key may travel as a header or as the `key` query parameter
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            uri.query()?
                .split('&')
                .find_map(|pair| pair.strip_prefix("key="))
                .map(str::to_string)
        });
    let turn = body["contents"]
        .as_array()
        .map(|c| c.iter().filter(|m| m["role"] == "user").count())
        .unwrap_or(0);
    state.requests.lock().unwrap().push((uri.path().to_string(), key, body));

    match state.mode {
        StubMode::Reply => (StatusCode::OK, Json(candidate(&format!("reply {turn}")))),
        StubMode::Empty => (StatusCode::OK, Json(candidate(""))),
        StubMode::Fail => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "backend unavailable"}})),
        ),
    }
}

fn candidate(text: &str) -> Value {
    json!({
        "responseId": "stub",
        "modelVersion": "gemini-2.5-flash",
        "candidates": [{
            "index": 0,
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 3, "totalTokenCount": 13}
    })
}

async fn start_stub(mode: StubMode) -> (Arc<dyn LlmProvider>, StubState) {
    let state = StubState {
        mode,
        requests: Arc::default(),
    };
    let port = spawn(Router::new().fallback(stub_generate).with_state(state.clone())).await;
    let provider = create_gemini_provider(
        &SecretString::from("test-key"),
        "gemini-2.5-flash",
        Some(&format!("http://127.0.0.1:{port}")),
    )
    .unwrap();
    (provider, state)
}

// ── Lead intake ──────────────────────────────────────────────────────

#[tokio::test]
async fn lead_flow_reaches_success_over_rest() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(None).await;
        let client = reqwest::Client::new();
        let base = format!("http://127.0.0.1:{port}/api/leads");

        let resp = client.post(&base).send().await.unwrap();
        assert_eq!(resp.status(), 201);
        let flow: Value = resp.json().await.unwrap();
        assert_eq!(flow["step"], "address");
        assert_eq!(flow["step_number"], 1);
        let id = flow["id"].as_str().unwrap().to_string();

        let flow: Value = client
            .post(format!("{base}/{id}/address"))
            .json(&json!({"address": "12 Harbor View Rd"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(flow["step"], "details");

        let flow: Value = client
            .post(format!("{base}/{id}/property-type"))
            .json(&json!({"property_type": "condo"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(flow["step"], "details");
        assert_eq!(flow["record"]["property_type"], "condo");

        let flow: Value = client
            .post(format!("{base}/{id}/timeline"))
            .json(&json!({"timeline": "1-3 Months"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(flow["step"], "contact");

        let resp = client
            .post(format!("{base}/{id}/submit"))
            .json(&json!({"name": "Jane Doe", "email": "jane@example.com", "phone": "(555) 123-4567"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 202);

        loop {
            let flow: Value = client
                .get(format!("{base}/{id}"))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if flow["step"] == "success" {
                // Contact details are not kept once the lead is handed off
                assert!(flow["record"]["email"].is_null());
                assert!(flow["record"]["name"].is_null());
                assert!(flow["record"]["address"].is_null());
                break;
            }
            assert_eq!(flow["step"], "submitting");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn lead_errors_map_to_status_codes() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(None).await;
        let client = reqwest::Client::new();
        let base = format!("http://127.0.0.1:{port}/api/leads");

        let unknown = client
            .get(format!("{base}/{}", uuid::Uuid::new_v4()))
            .send()
            .await
            .unwrap();
        assert_eq!(unknown.status(), 404);

        let flow: Value = client.post(&base).send().await.unwrap().json().await.unwrap();
        let id = flow["id"].as_str().unwrap().to_string();

        let early = client
            .post(format!("{base}/{id}/timeline"))
            .json(&json!({"timeline": "ASAP"}))
            .send()
            .await
            .unwrap();
        assert_eq!(early.status(), 409);

        client
            .post(format!("{base}/{id}/address"))
            .json(&json!({"address": "1 Elm St"}))
            .send()
            .await
            .unwrap();

        let bad_timeline = client
            .post(format!("{base}/{id}/timeline"))
            .json(&json!({"timeline": "Next Decade"}))
            .send()
            .await
            .unwrap();
        assert_eq!(bad_timeline.status(), 400);

        client
            .post(format!("{base}/{id}/timeline"))
            .json(&json!({"timeline": "ASAP"}))
            .send()
            .await
            .unwrap();

        let bad_email = client
            .post(format!("{base}/{id}/submit"))
            .json(&json!({"name": "Al", "email": "not-an-email", "phone": "555"}))
            .send()
            .await
            .unwrap();
        assert_eq!(bad_email.status(), 400);

        let flow: Value = client.get(format!("{base}/{id}")).send().await.unwrap().json().await.unwrap();
        assert_eq!(flow["step"], "contact");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn reset_during_submission_returns_to_address() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(None).await;
        let client = reqwest::Client::new();
        let base = format!("http://127.0.0.1:{port}/api/leads");

        let flow: Value = client.post(&base).send().await.unwrap().json().await.unwrap();
        let id = flow["id"].as_str().unwrap().to_string();
        client
            .post(format!("{base}/{id}/address"))
            .json(&json!({"address": "1 Elm St"}))
            .send()
            .await
            .unwrap();
        client
            .post(format!("{base}/{id}/timeline"))
            .json(&json!({"timeline": "ASAP"}))
            .send()
            .await
            .unwrap();
        client
            .post(format!("{base}/{id}/submit"))
            .json(&json!({"name": "Al", "email": "al@example.com", "phone": "555"}))
            .send()
            .await
            .unwrap();

        let flow: Value = client
            .post(format!("{base}/{id}/reset"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(flow["step"], "address");

        tokio::time::sleep(Duration::from_millis(60)).await;
        let flow: Value = client.get(format!("{base}/{id}")).send().await.unwrap().json().await.unwrap();
        assert_eq!(flow["step"], "address");
        assert!(flow["record"]["address"].is_null());
    })
    .await
    .expect("test timed out");
}

// ── Chat ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn live_chat_carries_history_and_persona() {
    timeout(TEST_TIMEOUT, async {
        let (llm, stub) = start_stub(StubMode::Reply).await;
        let port = start_server(Some(llm)).await;
        let client = reqwest::Client::new();

        let opened: Value = client
            .post(format!("http://127.0.0.1:{port}/api/chat"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(opened["live"], true);
        let url = format!("http://127.0.0.1:{port}/api/chat/{}/messages", opened["id"].as_str().unwrap());

        for (text, expected) in [("I want to sell", "reply 1"), ("In two months", "reply 2")] {
            let reply: Value = client
                .post(&url)
                .json(&json!({"text": text}))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            assert_eq!(reply["reply"], expected);
        }

        let requests = stub.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        let (path, key, body) = &requests[1];
        assert!(path.ends_with("models/gemini-2.5-flash:generateContent"));
        assert_eq!(key.as_deref(), Some("test-key"));
        assert!(body.to_string().contains("EstateAI"));
        let contents = body["contents"].as_array().unwrap();
        assert!(contents.iter().any(|c| c["role"] == "model"));
        assert_eq!(contents.last().unwrap()["parts"][0]["text"], "In two months");

        let transcript: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
        // greeting + two exchanges
        assert_eq!(transcript.as_array().unwrap().len(), 5);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn server_error_degrades_to_connection_trouble() {
    timeout(TEST_TIMEOUT, async {
        let (llm, _stub) = start_stub(StubMode::Fail).await;
        let context = SessionContext::new(Some(llm));
        assert!(context.init_session().await);

        assert_eq!(context.send_message("Hello?").await, CONNECTION_TROUBLE_REPLY);
        assert_eq!(context.turn_count().await, 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn empty_candidates_degrade_to_apology() {
    timeout(TEST_TIMEOUT, async {
        let (llm, _stub) = start_stub(StubMode::Empty).await;
        let context = SessionContext::new(Some(llm));
        context.init_session().await;

        assert_eq!(context.send_message("Hello?").await, EMPTY_REPLY);
    })
    .await
    .expect("test timed out");
}
