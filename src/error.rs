//! Error types for the entity graph pipeline
//!
//! Fetch failures are fatal to a run. Search failures are recovered inside the
//! resolver and never reach the pipeline.

use thiserror::Error;

/// Failure while retrieving the source document
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Element '{selector}' not found in document")]
    MissingElement { selector: String },

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Failure of a single knowledge-base search attempt
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Search endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Search failed: {0}")]
    Other(String),
}

/// Errors that stop a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("No text could be retrieved from {url}")]
    NoText { url: String },

    #[error("Failed to write graph to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
