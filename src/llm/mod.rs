//! LLM integration for EstateFlow.
//!
//! Supports:
//! - **Gemini**: `generateContent` via rig-core
//!
//! Uses the rig-core crate for HTTP transport and the `RigAdapter` to bridge
//! rig's `CompletionModel` trait to our `LlmProvider` trait. Callers depend
//! on `LlmProvider` so tests can substitute stubs.

pub mod gemini;
pub mod provider;
mod rig_adapter;

pub use gemini::create_gemini_provider;
pub use provider::*;
pub use rig_adapter::RigAdapter;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::LlmError;

/// Create the chat provider from configuration.
///
/// Returns `Ok(None)` when no credential is configured; the chat assistant
/// then runs in demo mode.
pub fn create_provider(config: &AppConfig) -> Result<Option<Arc<dyn LlmProvider>>, LlmError> {
    let Some(api_key) = &config.api_key else {
        return Ok(None);
    };
    tracing::info!("Using Gemini (model: {})", config.model);
    create_gemini_provider(api_key, &config.model, config.api_base_url.as_deref()).map(Some)
}
