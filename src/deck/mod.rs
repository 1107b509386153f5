//! Presentation deck: a fixed slide sequence driven by keys, buttons and
//! the export (print) layout.

pub mod controller;
pub mod export;
pub mod presenter;
pub mod routes;
pub mod slide;

pub use controller::{DeckSnapshot, DisplayMode, Key, Modal, PresentationController};
pub use export::{PrintHandle, PrintTarget, schedule_print};
pub use presenter::{DeckEvent, Presenter};
pub use routes::{DeckRouteState, deck_routes};
pub use slide::{Deck, Slide, SlideId, SlidePoint};
