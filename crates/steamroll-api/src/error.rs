/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for API access.

use thiserror::Error;

/// Result type alias for steamroll-api operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{method} {url} failed with status {status}: {body}")]
    Request {
        /// HTTP method
        method: String,
        /// Full request URL
        url: String,
        /// Request body as sent (empty for GET and DELETE)
        sent: String,
        /// Response status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// The request could not be sent or the response not read.
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        /// Request body as sent (empty for GET and DELETE)
        sent: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not valid JSON.
    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response is JSON but not shaped as expected.
    #[error("Unexpected response from {url}: {message}")]
    Unexpected { url: String, message: String },

    /// No credentials are configured for the API base URL.
    #[error("No credentials configured for {base}")]
    MissingAuth { base: String },

    /// The credentials file or a header in it is invalid.
    #[error("Invalid API configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// The response status, for errors returned by the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
