//! Chat assistant: a thin pass-through to the hosted model.
//!
//! `SessionContext` owns the optional live session and turns every failure
//! into a fixed reply. `ChatWidget` owns the visitor-facing transcript.

pub mod prompts;
pub mod routes;
pub mod session;
pub mod widget;

pub use routes::{ChatRouteState, chat_routes};
pub use session::{ChatSession, SessionContext};
pub use widget::{ChatRegistry, ChatWidget, TranscriptMessage};
