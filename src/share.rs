//! Share-link copying with a manual fallback.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::ShareError;

/// Somewhere a share link can be written.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

/// The presenting host's system clipboard.
///
/// A fresh `arboard::Clipboard` is opened per write; headless hosts fail
/// here and the caller falls back to the share modal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ShareError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| ShareError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ShareError::WriteFailed(e.to_string()))
    }
}

/// What happened to a share request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShareOutcome {
    Copied,
    /// The write failed; show `url` so it can be copied by hand.
    ManualCopy { url: String },
}

/// Copy `url` to `clipboard`. Never fails: a clipboard error degrades to
/// `ManualCopy`.
pub fn share_link(clipboard: &dyn Clipboard, url: &str) -> ShareOutcome {
    match clipboard.write_text(url) {
        Ok(()) => {
            info!(url = url, "Share link copied to clipboard");
            ShareOutcome::Copied
        }
        Err(e) => {
            warn!(error = %e, "Clipboard write failed, falling back to manual copy");
            ShareOutcome::ManualCopy { url: url.to_string() }
        }
    }
}
