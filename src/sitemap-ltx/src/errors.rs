//! Error types for sitemap resolution, page cleaning and summarization.

use thiserror::Error;

/// Main error type for llms.txt generation operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A JSON body could not be encoded or decoded.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error: prompt substitution failed.
    #[error("Failed to create prompt: {0}")]
    PromptCreationFailure(#[from] subst::Error),

    /// Interactive terminal input failed.
    #[error("Failed to read operator input: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// The completion service answered with a non-200 status and no structured error.
    #[error("{status} - {body}")]
    CompletionStatus { status: u16, body: String },

    /// The completion service reported an error in its response body.
    #[error("{code} - {message}")]
    CompletionService { code: String, message: String },

    /// The completion service answered, but the first choice carried no content.
    #[error("completion response contained no message content")]
    EmptyCompletion,

    /// A page was fetched, but it had no textual body.
    #[error("no textual content was returned")]
    EmptyPage,
}

/// Type alias for Result with the crate's Error.
pub type Result<T> = std::result::Result<T, Error>;
