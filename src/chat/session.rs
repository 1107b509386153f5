//! Session context: owns at most one live dialogue with the remote model.
//!
//! Each widget holds its own `SessionContext`; nothing is shared at module
//! level. `init_session()` is the only place a session is (re)created, and
//! the session lives until the context is dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::prompts::{CONNECTION_TROUBLE_REPLY, DEMO_MODE_REPLY, EMPTY_REPLY, PERSONA_INSTRUCTION};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// A remote dialogue: the persona plus every completed turn.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: Uuid,
    pub system_prompt: String,
    pub history: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Request carrying the full history followed by `text`.
    fn request_for(&self, text: &str) -> CompletionRequest {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(text));
        CompletionRequest::new(messages).with_system(&self.system_prompt)
    }

    fn record_turn(&mut self, user: &str, assistant: &str) {
        self.history.push(ChatMessage::user(user));
        self.history.push(ChatMessage::assistant(assistant));
    }
}

/// Owner of the (optional) live session for one chat widget.
pub struct SessionContext {
    llm: Option<Arc<dyn LlmProvider>>,
    session: RwLock<Option<ChatSession>>,
}

impl SessionContext {
    /// `llm = None` means no credential is configured (demo mode).
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            llm,
            session: RwLock::new(None),
        }
    }

    /// Create a fresh session with the fixed persona, replacing any previous
    /// one. Returns `false` in demo mode, where no session is ever created.
    pub async fn init_session(&self) -> bool {
        let Some(llm) = &self.llm else {
            debug!("No chat credential configured, staying in demo mode");
            *self.session.write().await = None;
            return false;
        };

        let session = ChatSession::new(PERSONA_INSTRUCTION);
        info!(session_id = %session.id, model = %llm.model_name(), "Chat session created");
        *self.session.write().await = Some(session);
        true
    }

    /// Whether a live session exists.
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Number of completed turns in the live session.
    pub async fn turn_count(&self) -> usize {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.history.len() / 2)
            .unwrap_or(0)
    }

    /// Forward `text` to the remote model and return the assistant's reply.
    ///
    /// Never fails: demo mode, empty responses and transport errors each map
    /// to a fixed reply. The session lock is not held across the round trip,
    /// so concurrent sends are not queued.
    pub async fn send_message(&self, text: &str) -> String {
        let Some(llm) = &self.llm else {
            return DEMO_MODE_REPLY.to_string();
        };

        let (session_id, request) = {
            let guard = self.session.read().await;
            match guard.as_ref() {
                Some(session) => (session.id, session.request_for(text)),
                None => return DEMO_MODE_REPLY.to_string(),
            }
        };

        match llm.complete(request).await {
            Ok(response) => {
                let Some(reply) = response.content.filter(|c| !c.trim().is_empty()) else {
                    debug!(session_id = %session_id, "Model returned no text");
                    return EMPTY_REPLY.to_string();
                };

                let mut guard = self.session.write().await;
                match guard.as_mut() {
                    Some(session) if session.id == session_id => session.record_turn(text, &reply),
                    _ => debug!(session_id = %session_id, "Session replaced mid-flight, turn not recorded"),
                }
                reply
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Chat request failed");
                CONNECTION_TROUBLE_REPLY.to_string()
            }
        }
    }
}
