//! Error types for the package search library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while searching the package index.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The index answered with a non-success status.
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A snippet header had no space between name and import path.
    #[error("Malformed snippet header: {0:?}")]
    MalformedHeader(String),

    /// The search was cancelled before it completed.
    #[error("Search cancelled")]
    Cancelled,

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Writing rendered output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// The index URL cannot carry a search path.
    #[error("Invalid index URL: {0}")]
    InvalidIndexUrl(String),
}
