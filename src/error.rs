//! Custom error types for rag-em-ingest

use thiserror::Error;

/// Main error type for ingestion operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("RAG API call failed: {}", error_chain(.0))]
    ApiCall(#[source] reqwest::Error),

    #[error("Invalid document bundle: {0}")]
    InvalidBundle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for rag-em-ingest
pub type Result<T> = std::result::Result<T, Error>;

/// Render an error and every `source()` below it as `outer: inner: ...`.
///
/// reqwest hides the transport cause (e.g. "Connection refused") behind a
/// generic "error sending request" message, so the chain has to be walked.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}
