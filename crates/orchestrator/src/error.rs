//! Error types for presentation orchestration.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single external generation call.
///
/// These never abort a presentation: a failed slide is replaced by a
/// placeholder and a failed structure call falls back to registry metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("generation request timed out")]
    Timeout,

    #[error("no recorded response for slide {slide_number}")]
    MissingSlide { slide_number: usize },

    #[error("no recorded presentation structure")]
    MissingStructure,
}

/// Errors surfaced to callers of the orchestrator.
#[derive(Error, Debug)]
pub enum Error {
    /// The prompt was empty or whitespace.
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid fixture file: {0}")]
    FixtureError(#[from] serde_json::Error),
}
