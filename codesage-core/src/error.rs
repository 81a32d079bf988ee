use std::time::Duration;
use thiserror::Error;

/// Failure to turn a PDF on disk into text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Failed to extract text: {0}")]
    Extract(String),
}

/// Failure of the single outbound chat-completion call.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Question generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// `body` is capped at 2 KiB; a cut body ends with `... (truncated)`.
    #[error("Error generating questions: provider returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Error generating questions: {0}")]
    Transport(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("{0} is not a valid header value")]
    InvalidHeader(&'static str),
}

pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
