/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! # steamroll-tree
//!
//! The document engine behind `steamroll event fetch/create`.
//!
//! An exported event is one untyped [`Node`] tree. This crate provides the
//! operations the export and import pipelines run over that tree:
//!
//! - [`Path`]: a small query language (`.items.*.category`, `.subevents?.*`)
//!   parsed once and reused
//! - [`walk`]: resolves a path to every matching location, optionally
//!   wrapping matches in references or deleting them
//! - [`Reference`]: a foreign-key value that points at another location of the
//!   same document and is dereferenced against the current root
//! - [`link`]: turns literal identifiers into references to the entity that
//!   carries them
//! - [`strip_defaults`]: removes fields that still hold their default value
//! - [`merge`]: folds server responses back into the local document
//!
//! Documents are stored as YAML ([`yaml::load`] / [`yaml::dump`]), with
//! references written as `!ref`-tagged sequences, and sent to the API as JSON
//! ([`json::to_json`]), which is the point where references are resolved.
//!
//! ## Example
//!
//! ```rust
//! use steamroll_tree::{LinkRule, Node, json, link, yaml};
//!
//! let mut doc = Node::from(serde_json::json!({
//!     "items": [{"id": 5}],
//!     "quotas": [{"items": [5]}],
//! }));
//! let rule = LinkRule::new(".quotas.*.items.*", ".items.*", ".id").unwrap();
//! link(&mut doc, &rule).unwrap();
//!
//! let text = yaml::dump(&doc).unwrap();
//! assert!(text.contains("!ref"));
//!
//! let body = json::to_json(&doc, &doc).unwrap();
//! assert_eq!(body["quotas"][0]["items"][0], 5);
//! ```

mod error;
pub mod json;
mod link;
mod merge;
mod node;
mod path;
mod reference;
mod strip;
mod walk;
pub mod yaml;

pub use error::{Result, TreeError};
pub use link::{LinkReport, LinkRule, link};
pub use merge::merge;
pub use node::{ConcretePath, Mapping, Node, Scalar, Seg};
pub use path::{Path, Segment};
pub use reference::{MAX_REFERENCE_HOPS, Reference};
pub use strip::{DefaultRules, strip_defaults};
pub use walk::{Located, WalkOptions, walk};
