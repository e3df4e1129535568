/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for document tree operations.

use crate::node::ConcretePath;
use thiserror::Error;

/// Result type alias for steamroll-tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while parsing paths, walking, linking, merging or
/// (de)serializing a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// The path text could not be parsed.
    #[error("Malformed path '{path}': {reason}")]
    MalformedPath {
        /// The offending path text
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// A required path segment is absent and was not marked optional.
    #[error("Path {path} not found: no '{segment}' at {at}")]
    MissingPath {
        /// The path being walked
        path: String,
        /// Concrete location reached before the lookup failed
        at: ConcretePath,
        /// The segment that could not be resolved
        segment: String,
    },

    /// A reference points at a location that does not exist in the document.
    #[error("Dangling reference: {target} does not resolve")]
    DanglingReference {
        /// The reference's target path
        target: ConcretePath,
    },

    /// Following references did not reach a value within the hop limit.
    #[error("Reference chain starting at {target} exceeds {limit} hops")]
    ReferenceCycle {
        /// Where the chain started
        target: ConcretePath,
        /// The hop or nesting limit that was exceeded
        limit: usize,
    },

    /// A mapping key was used to address a sequence but is not an index.
    #[error("'{key}' is not a valid sequence index")]
    InvalidIndex {
        /// The key that failed to parse
        key: String,
    },

    /// The YAML input could not be loaded.
    #[error("YAML error at line {line}, column {col}: {message}")]
    Yaml {
        /// Error message
        message: String,
        /// Line of the error (1-based)
        line: usize,
        /// Column of the error (1-based)
        col: usize,
    },

    /// The document could not be written as YAML.
    #[error("Failed to write YAML: {0}")]
    Emit(String),

    /// The default rule document has the wrong shape.
    #[error("Invalid default rules: {0}")]
    InvalidRules(String),
}

impl TreeError {
    /// Create a malformed path error.
    pub fn malformed_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        TreeError::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from a missing location (path or reference).
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            TreeError::MissingPath { .. } | TreeError::DanglingReference { .. }
        )
    }
}
