//! Chat widget: the append-only transcript shown to a visitor, plus the
//! registry that gives every visitor their own widget.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::prompts::GREETING;
use super::session::SessionContext;
use crate::llm::{LlmProvider, Role};

/// One line of the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptMessage {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl TranscriptMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// A visitor's chat window.
pub struct ChatWidget {
    pub id: Uuid,
    context: SessionContext,
    transcript: RwLock<Vec<TranscriptMessage>>,
    last_active: RwLock<DateTime<Utc>>,
}

impl ChatWidget {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            context: SessionContext::new(llm),
            transcript: RwLock::new(Vec::new()),
            last_active: RwLock::new(Utc::now()),
        }
    }

    /// Open the widget. The first open creates the session and seeds the
    /// greeting; reopening an active conversation changes nothing.
    /// Returns whether a live session backs the widget.
    pub async fn open(&self) -> bool {
        let is_new = self.transcript.read().await.is_empty();
        if is_new {
            self.context.init_session().await;
            self.push(Role::Assistant, GREETING).await;
        }
        self.context.has_session().await
    }

    /// Send visitor text and append both sides to the transcript.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        self.push(Role::User, text).await;
        let reply = self.context.send_message(text).await;
        self.push(Role::Assistant, reply.clone()).await;
        Some(reply)
    }

    /// Snapshot of the transcript, oldest first.
    pub async fn transcript(&self) -> Vec<TranscriptMessage> {
        self.transcript.read().await.clone()
    }

    /// Whether a live session backs the widget.
    pub async fn is_live(&self) -> bool {
        self.context.has_session().await
    }

    /// When a message was last added.
    pub async fn last_active(&self) -> DateTime<Utc> {
        *self.last_active.read().await
    }

    async fn push(&self, role: Role, text: impl Into<String>) {
        let message = TranscriptMessage::new(role, text);
        *self.last_active.write().await = message.at;
        self.transcript.write().await.push(message);
    }
}

/// All open chat widgets, keyed by widget id.
pub struct ChatRegistry {
    llm: Option<Arc<dyn LlmProvider>>,
    widgets: RwLock<HashMap<Uuid, Arc<ChatWidget>>>,
}

impl ChatRegistry {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Arc<Self> {
        Arc::new(Self {
            llm,
            widgets: RwLock::new(HashMap::new()),
        })
    }

    /// Create and open a new widget.
    pub async fn open_widget(&self) -> Arc<ChatWidget> {
        let widget = Arc::new(ChatWidget::new(self.llm.clone()));
        let live = widget.open().await;
        info!(widget_id = %widget.id, live, "Chat widget opened");
        self.widgets
            .write()
            .await
            .insert(widget.id, Arc::clone(&widget));
        widget
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<ChatWidget>> {
        self.widgets.read().await.get(&id).cloned()
    }

    /// Close a widget, dropping its session and transcript.
    pub async fn remove(&self, id: Uuid) -> Option<Arc<ChatWidget>> {
        let removed = self.widgets.write().await.remove(&id);
        if removed.is_some() {
            info!(widget_id = %id, "Chat widget closed");
        }
        removed
    }

    /// Drop widgets with no messages for `max_idle`. Returns how many went.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };

        let widgets: Vec<Arc<ChatWidget>> = self.widgets.read().await.values().cloned().collect();
        let mut stale = Vec::new();
        for widget in widgets {
            if widget.last_active().await <= cutoff {
                stale.push(widget.id);
            }
        }

        let mut map = self.widgets.write().await;
        for id in &stale {
            map.remove(id);
        }
        if !stale.is_empty() {
            info!(count = stale.len(), "Pruned idle chat widgets");
        }
        stale.len()
    }

    pub async fn len(&self) -> usize {
        self.widgets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.widgets.read().await.is_empty()
    }
}
