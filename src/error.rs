//! Error types for EstateFlow.

use crate::intake::IntakeStep;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),

    #[error("Share error: {0}")]
    Share(#[from] ShareError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lead intake errors.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Action requires step {expected}, flow is at {actual}")]
    WrongStep {
        expected: IntakeStep,
        actual: IntakeStep,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Unknown timeline option: {0}")]
    UnknownTimeline(String),

    #[error("Unknown property type: {0}")]
    UnknownPropertyType(String),

    #[error("Lead flow {0} not found")]
    NotFound(uuid::Uuid),
}

/// Presentation errors.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("Deck has no slides")]
    Empty,

    #[error("Duplicate slide id: {0}")]
    DuplicateSlide(String),
}

/// Clipboard errors.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write denied: {0}")]
    WriteFailed(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
