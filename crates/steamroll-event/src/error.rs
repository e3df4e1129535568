/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for event export and import.

use steamroll_api::ApiError;
use steamroll_tree::TreeError;
use thiserror::Error;

/// Result type alias for steamroll-event operations.
pub type Result<T> = std::result::Result<T, EventError>;

#[derive(Debug, Error)]
pub enum EventError {
    /// Path, reference, merge or YAML failure.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The remote API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A required top-level field is absent from the document.
    #[error("Document has no '{0}' section")]
    MissingField(String),

    /// A section has the wrong shape.
    #[error("Section '{section}' must be a {expected}")]
    InvalidSection {
        section: String,
        expected: &'static str,
    },

    /// A create response carries no usable id.
    #[error("Response from {resource} has no id")]
    MissingId { resource: String },
}
