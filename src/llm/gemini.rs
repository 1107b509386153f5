//! Gemini provider built on rig's Gemini client.
//!
//! The remote service keeps no server-side chat state, so the caller sends
//! the whole history on every turn.

use std::sync::Arc;

use rig::client::CompletionClient;
use rig::providers::gemini;
use secrecy::{ExposeSecret, SecretString};

use super::provider::LlmProvider;
use super::rig_adapter::RigAdapter;
use crate::error::LlmError;

const PROVIDER: &str = "gemini";

/// Build a Gemini-backed provider. `base_url` replaces the public host,
/// which tests use to point at a local stand-in.
pub fn create_gemini_provider(
    api_key: &SecretString,
    model: &str,
    base_url: Option<&str>,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let builder = gemini::Client::builder().api_key(api_key.expose_secret());
    let builder = match base_url {
        Some(url) => builder.base_url(url.trim_end_matches('/')),
        None => builder,
    };
    let client: rig::client::Client<gemini::client::GeminiExt> =
        builder.build().map_err(|e| LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("Failed to create Gemini client: {}", e),
        })?;

    let completion_model = client.completion_model(model);
    Ok(Arc::new(
        RigAdapter::new(completion_model, model).with_provider(PROVIDER),
    ))
}
