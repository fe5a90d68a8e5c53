//! Error types for the cloning pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scraping, generating or tracking a clone
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or drive the WebDriver session
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    /// Failed to navigate to the target page
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// In-page script evaluation failed or returned an unexpected shape
    #[error("Script evaluation failed: {0}")]
    Script(String),

    /// Transport-level HTTP error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Both scrape paths failed
    #[error("Scraping failed: {0}")]
    Scrape(String),

    /// Generation capability failed (transport, quota, empty response)
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Job store rejected a write
    #[error("Job store error: {0}")]
    Store(String),

    /// No job with this id
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Emergency document could not be built
    #[error("Emergency fallback failed: {0}")]
    Emergency(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<fantoccini::error::CmdError> for Error {
    fn from(err: fantoccini::error::CmdError) -> Self {
        Error::WebDriver(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for Error {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        Error::WebDriver(err.to_string())
    }
}
