//! EstateFlow: pitch deck, lead-capture landing page and chat assistant.

pub mod chat;
pub mod config;
pub mod deck;
pub mod error;
pub mod intake;
pub mod llm;
pub mod server;
pub mod share;
pub mod ui;
