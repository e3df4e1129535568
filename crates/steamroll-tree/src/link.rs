/*
 * link.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reference linker
 */

//! Turning literal foreign keys into references.
//!
//! A [`LinkRule`] names three paths: where the foreign keys live (`source`),
//! which entities they may point at (`target`), and where the identifier sits
//! inside each target entity (`key`, relative to the entity). [`link`] wraps
//! every source value in a [`Reference`](crate::Reference) and points it at
//! the key of the first target entity carrying the same value.

use crate::error::Result;
use crate::node::{ConcretePath, Node};
use crate::path::Path;
use crate::walk::{WalkOptions, walk};

/// A parsed `(source, target, key)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRule {
    pub source: Path,
    pub target: Path,
    pub key: Path,
}

impl LinkRule {
    /// Parse the three paths of a rule.
    pub fn new(source: &str, target: &str, key: &str) -> Result<Self> {
        Ok(Self {
            source: Path::parse(source)?,
            target: Path::parse(target)?,
            key: Path::parse(key)?,
        })
    }
}

/// What a [`link`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Cells pointed at a target
    pub linked: usize,
    /// Cells left literal because no target carries their value
    pub unmatched: usize,
    /// Cells whose value is carried by more than one target
    pub ambiguous: usize,
}

/// Apply `rule` to `document`.
///
/// Source values are wrapped in place even when no target matches; an
/// unmatched cell keeps its literal and serializes as the plain value. When
/// several targets carry the same key value the first one in document order
/// wins and a warning is logged.
///
/// # Errors
///
/// [`TreeError::MissingPath`](crate::TreeError::MissingPath) when a required
/// segment of the source or target pattern is absent. Mark fields that may
/// be missing with `?`.
pub fn link(document: &mut Node, rule: &LinkRule) -> Result<LinkReport> {
    let index = build_index(document, rule)?;

    let mut report = LinkReport::default();
    let sources = walk(document, &rule.source, WalkOptions::new().assign_refs())?;

    for located in sources {
        let Node::Reference(cell) = located.value else {
            continue;
        };
        let Some(literal) = cell.literal() else {
            continue;
        };

        let mut matches = index.iter().filter(|(_, value)| value == literal);
        let Some((target, _)) = matches.next() else {
            report.unmatched += 1;
            continue;
        };
        let others = matches.count();
        if others > 0 {
            tracing::warn!(
                source = %rule.source,
                target = %rule.target,
                value = ?literal,
                candidates = others + 1,
                "Ambiguous reference, linking to the first match at {}",
                target
            );
            report.ambiguous += 1;
        }
        cell.point_to(target.clone());
        report.linked += 1;
    }

    tracing::debug!(
        source = %rule.source,
        linked = report.linked,
        unmatched = report.unmatched,
        "Linked references"
    );
    Ok(report)
}

/// Every target entity's key, as (absolute path of the key, key value), in
/// document order. Entities without the key are left out.
fn build_index(document: &mut Node, rule: &LinkRule) -> Result<Vec<(ConcretePath, Node)>> {
    let candidates = walk(document, &rule.target, WalkOptions::new().collect_paths())?;

    let mut index = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let base = candidate.path.unwrap_or_default();
        let keys = walk(
            candidate.value,
            &rule.key,
            WalkOptions::new().collect_paths().ignore_missing(),
        )?;
        if let Some(key) = keys.into_iter().next() {
            let relative = key.path.unwrap_or_default();
            index.push((base.join(&relative), key.value.clone()));
        }
    }
    Ok(index)
}
