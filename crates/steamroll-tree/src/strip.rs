/*
 * strip.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Default value stripping
 */

//! Removing fields that still hold their default value.
//!
//! The exported document is meant to be read and edited by hand, so fields
//! the remote system would fill in anyway are dropped. A rule set maps a path
//! to the defaults of the mappings it matches:
//!
//! ```yaml
//! .items.*:
//!   active: true
//!   tax_rule: null
//! .event:
//!   seating_plan: null
//! ```

use crate::error::{Result, TreeError};
use crate::node::{Mapping, Node};
use crate::path::Path;
use crate::walk::{WalkOptions, walk};
use crate::yaml;

/// Parsed default rules, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultRules {
    rules: Vec<(Path, Mapping)>,
}

impl DefaultRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Later rules run after earlier ones.
    pub fn push(&mut self, path: Path, defaults: Mapping) {
        self.rules.push((path, defaults));
    }

    pub fn rules(&self) -> &[(Path, Mapping)] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build rules from a mapping of path text to a mapping of defaults.
    pub fn from_node(node: &Node) -> Result<Self> {
        let entries = node.as_mapping().ok_or_else(|| {
            TreeError::InvalidRules(format!(
                "expected a mapping of paths, found {}",
                node.kind_name()
            ))
        })?;

        let mut rules = Self::new();
        for (text, defaults) in entries {
            let defaults = match defaults {
                Node::Mapping(defaults) => defaults.clone(),
                other if other.is_null() => Mapping::new(),
                other => {
                    return Err(TreeError::InvalidRules(format!(
                        "defaults for '{}' must be a mapping, found {}",
                        text,
                        other.kind_name()
                    )));
                }
            };
            rules.push(Path::parse(text)?, defaults);
        }
        Ok(rules)
    }

    /// Parse rules from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let node = yaml::load(text)?;
        if node.is_null() {
            return Ok(Self::new());
        }
        Self::from_node(&node)
    }
}

/// Remove every field that equals its default, and every mapping field whose
/// value contains all entries of a default mapping. Returns how many fields
/// were removed.
pub fn strip_defaults(document: &mut Node, rules: &DefaultRules) -> Result<usize> {
    let mut removed = 0;
    for (path, defaults) in rules.rules() {
        let victims = walk(document, path, WalkOptions::new().ignore_missing())?;
        for located in victims {
            let Node::Mapping(fields) = located.value else {
                continue;
            };
            for (field, expected) in defaults {
                let is_default = fields
                    .get(field)
                    .is_some_and(|current| current == expected || contains(current, expected));
                if is_default {
                    fields.shift_remove(field);
                    removed += 1;
                }
            }
        }
    }
    tracing::debug!(removed, "Stripped default values");
    Ok(removed)
}

/// True if both are mappings and every entry of `expected` is present in
/// `current` with an equal value.
fn contains(current: &Node, expected: &Node) -> bool {
    match (current, expected) {
        (Node::Mapping(current), Node::Mapping(expected)) => expected
            .iter()
            .all(|(key, value)| current.get(key).is_some_and(|v| v == value)),
        _ => false,
    }
}
