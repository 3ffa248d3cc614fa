//! Error types for the tally-core library.

use thiserror::Error;

/// Main error type for the tally library.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Receipt assembly error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error raised by an OCR or document-model collaborator.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the recognition collaborators.
///
/// The core never produces these itself; engine implementations return them
/// and the assembler folds them into an error outcome.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Document-model inference or decoding failed.
    #[error("document model failed: {0}")]
    Inference(String),
}

/// Faults during receipt assembly.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Input text is larger than the configured limit.
    #[error("input of {len} characters exceeds limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    /// The audit trail could not be rendered.
    #[error("failed to render raw text: {0}")]
    RawText(#[from] serde_json::Error),

    /// The extraction configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for the tally library.
pub type Result<T> = std::result::Result<T, TallyError>;
