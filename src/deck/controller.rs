//! Presentation controller: a bounded slide index plus display mode.
//!
//! Every operation is synchronous and total: out-of-range moves are no-ops
//! and report `false` instead of failing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::slide::{Deck, Slide, SlideId};

/// How the deck is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// One slide at a time with navigation controls.
    #[default]
    Normal,
    /// Every slide stacked vertically for print/PDF capture.
    Export,
}

/// Overlays that take keyboard focus away from the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modal {
    /// Manual-copy fallback when the clipboard write failed.
    Share { url: String },
    PrintInstructions,
}

/// A key event as reported by the browser (`KeyboardEvent.key`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        match key {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Serializable view of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSnapshot {
    pub index: usize,
    pub slide_id: SlideId,
    pub count: usize,
    pub position: String,
    pub mode: DisplayMode,
    pub modal: Option<Modal>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

pub struct PresentationController {
    deck: Arc<Deck>,
    index: usize,
    mode: DisplayMode,
    modal: Option<Modal>,
}

impl PresentationController {
    pub fn new(deck: Arc<Deck>) -> Self {
        Self {
            deck,
            index: 0,
            mode: DisplayMode::Normal,
            modal: None,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn current(&self) -> &Slide {
        &self.deck.slides()[self.index]
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index < self.deck.last_index()
    }

    /// Advance one slide. No-op on the last slide.
    pub fn next(&mut self) -> bool {
        if self.can_go_forward() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Go back one slide. No-op on the first slide.
    pub fn previous(&mut self) -> bool {
        if self.can_go_back() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.deck.len() && index != self.index {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Switch display mode. Returns whether the mode changed. The index is
    /// left alone so leaving export mode returns to the same slide.
    pub fn set_export_mode(&mut self, enabled: bool) -> bool {
        let mode = if enabled {
            DisplayMode::Export
        } else {
            DisplayMode::Normal
        };
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) -> bool {
        self.modal.take().is_some()
    }

    /// Whether key events currently drive navigation.
    pub fn accepts_keys(&self) -> bool {
        self.mode == DisplayMode::Normal && self.modal.is_none()
    }

    /// Route a key event. Ignored while a modal is open or in export mode.
    pub fn handle_key(&mut self, key: &Key) -> bool {
        if !self.accepts_keys() {
            return false;
        }
        match key {
            Key::ArrowRight => self.next(),
            Key::ArrowLeft => self.previous(),
            Key::Other(_) => false,
        }
    }

    /// Slides to render: the current one in normal mode, all of them in
    /// sequence order in export mode.
    pub fn visible_slides(&self) -> &[Slide] {
        match self.mode {
            DisplayMode::Normal => std::slice::from_ref(self.current()),
            DisplayMode::Export => self.deck.slides(),
        }
    }

    /// "3 / 6"
    pub fn position(&self) -> String {
        format!("{} / {}", self.index + 1, self.deck.len())
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            index: self.index,
            slide_id: self.current().id,
            count: self.deck.len(),
            position: self.position(),
            mode: self.mode,
            modal: self.modal.clone(),
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
        }
    }
}
