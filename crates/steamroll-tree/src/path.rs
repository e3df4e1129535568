/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Path query language
 */

//! Path expressions.
//!
//! A path is written as dot-separated tokens, e.g. `.items.*.category`. The
//! first token (empty in the usual spelling) stands for the document root and
//! is discarded. Remaining tokens:
//!
//! - `*` matches every element of a sequence or every value of a mapping
//! - `key?` matches `key` if present and matches nothing otherwise
//! - anything else matches that mapping key or sequence index
//!
//! Paths are parsed once and then reused for any number of walks.

use crate::error::{Result, TreeError};
use std::fmt;
use std::str::FromStr;

/// One matcher of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Exact mapping key or sequence index
    Literal(String),

    /// Every child of a mapping or sequence
    Wildcard,

    /// Like `Literal`, but a missing key yields no match instead of an error
    OptionalLiteral(String),
}

impl Segment {
    fn parse(token: &str, text: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(TreeError::malformed_path(text, "empty segment"));
        }
        if token == "*" {
            return Ok(Segment::Wildcard);
        }
        match token.strip_suffix('?') {
            Some("") => Err(TreeError::malformed_path(text, "'?' without a key")),
            Some(key) => Ok(Segment::OptionalLiteral(key.to_string())),
            None => Ok(Segment::Literal(token.to_string())),
        }
    }

    /// The key of a literal or optional segment.
    pub fn key(&self) -> Option<&str> {
        match self {
            Segment::Literal(key) | Segment::OptionalLiteral(key) => Some(key),
            Segment::Wildcard => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(key) => write!(f, "{}", key),
            Segment::Wildcard => write!(f, "*"),
            Segment::OptionalLiteral(key) => write!(f, "{}?", key),
        }
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Parse a dotted path expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use steamroll_tree::{Path, Segment};
    ///
    /// let path = Path::parse(".items.*.addons?").unwrap();
    /// assert_eq!(
    ///     path.segments(),
    ///     &[
    ///         Segment::Literal("items".into()),
    ///         Segment::Wildcard,
    ///         Segment::OptionalLiteral("addons".into()),
    ///     ]
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// [`TreeError::MalformedPath`] if nothing follows the root marker or a
    /// token is empty.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split('.');
        // root marker
        tokens.next();

        let segments = tokens
            .map(|token| Segment::parse(token, text))
            .collect::<Result<Vec<_>>>()?;

        if segments.is_empty() {
            return Err(TreeError::malformed_path(
                text,
                "no segments after the root marker",
            ));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a parsed path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for Path {
    type Err = TreeError;

    fn from_str(text: &str) -> Result<Self> {
        Path::parse(text)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_and_wildcard() {
        let path = Path::parse(".items.*.category").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Literal("items".into()),
                Segment::Wildcard,
                Segment::Literal("category".into()),
            ]
        );
    }

    #[test]
    fn test_parse_optional() {
        let path = Path::parse(".subevents?.*").unwrap();
        assert_eq!(path.segments()[0], Segment::OptionalLiteral("subevents".into()));
        assert_eq!(path.segments()[0].key(), Some("subevents"));
    }

    #[test]
    fn test_first_token_is_discarded() {
        let path = Path::parse("root.id").unwrap();
        assert_eq!(path.segments(), &[Segment::Literal("id".into())]);
    }

    #[test]
    fn test_display_round_trips() {
        for text in [".items.*.category", ".subevents?.*.id?", ".0.x"] {
            assert_eq!(Path::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_empty_path_is_malformed() {
        for text in ["", ".", "items"] {
            let err = Path::parse(text).unwrap_err();
            assert!(
                matches!(err, TreeError::MalformedPath { .. }),
                "expected malformed path for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_empty_segment_is_malformed() {
        assert!(Path::parse(".items..id").is_err());
        assert!(Path::parse(".items.").is_err());
        assert!(Path::parse(".items.?").is_err());
    }

    #[test]
    fn test_from_str() {
        let path: Path = ".id".parse().unwrap();
        assert_eq!(path.len(), 1);
    }
}
