/*
 * walk.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tree walker
 */

//! Resolving a [`Path`] against a document.
//!
//! [`walk`] returns every node the path matches, in document order (mapping
//! insertion order, sequence index order; never re-sorted). The reference
//! linker relies on this order for its "first match wins" rule.
//!
//! Options:
//!
//! - `assign_refs`: wrap each matched value in a [`Reference`] in place,
//!   unless it already is one
//! - `ignore_missing`: treat a missing key like an optional segment
//! - `collect_paths`: report the concrete path of each match
//! - `delete`: remove the matched nodes instead of returning them

use crate::error::{Result, TreeError};
use crate::node::{ConcretePath, Node};
use crate::path::{Path, Segment};
use crate::reference::Reference;

/// Options for [`walk`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    pub assign_refs: bool,
    pub ignore_missing: bool,
    pub collect_paths: bool,
    pub delete: bool,
}

impl WalkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign_refs(mut self) -> Self {
        self.assign_refs = true;
        self
    }

    pub fn ignore_missing(mut self) -> Self {
        self.ignore_missing = true;
        self
    }

    pub fn collect_paths(mut self) -> Self {
        self.collect_paths = true;
        self
    }

    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }
}

/// A matched node.
#[derive(Debug)]
pub struct Located<'a> {
    /// Concrete path of the match, when `collect_paths` was set.
    pub path: Option<ConcretePath>,

    /// The matched node, borrowed from the walked document.
    pub value: &'a mut Node,
}

/// Walk `node` along `path` and return every match.
///
/// # Errors
///
/// [`TreeError::MissingPath`] when a literal segment is absent (or applied to
/// something that is not a container) and neither `ignore_missing` nor an
/// optional segment allows it.
pub fn walk<'a>(node: &'a mut Node, path: &Path, options: WalkOptions) -> Result<Vec<Located<'a>>> {
    let mut walker = Walker {
        path,
        options,
        out: Vec::new(),
    };
    walker.descend(node, path.segments(), ConcretePath::new())?;
    Ok(walker.out)
}

struct Walker<'p, 'a> {
    path: &'p Path,
    options: WalkOptions,
    out: Vec<Located<'a>>,
}

impl<'p, 'a> Walker<'p, 'a> {
    fn descend(
        &mut self,
        node: &'a mut Node,
        segments: &[Segment],
        trail: ConcretePath,
    ) -> Result<()> {
        let Some((segment, rest)) = segments.split_first() else {
            self.emit(trail, node);
            return Ok(());
        };

        match segment {
            Segment::Wildcard => {
                if !node.is_container() {
                    return self.missing(false, trail, segment);
                }
                if rest.is_empty() {
                    return self.wildcard_leaf(node, trail);
                }
                for (seg, child) in node.children_mut() {
                    self.descend(child, rest, trail.child(seg))?;
                }
                Ok(())
            }
            Segment::Literal(key) | Segment::OptionalLiteral(key) => {
                let optional = matches!(segment, Segment::OptionalLiteral(_));
                let Some(seg) = node.locate(key) else {
                    return self.missing(optional, trail, segment);
                };

                if rest.is_empty() && self.options.delete {
                    node.remove(&seg);
                    return Ok(());
                }

                let trail = trail.child(seg.clone());
                let Some(child) = node.child_mut(&seg) else {
                    return self.missing(optional, trail, segment);
                };
                if rest.is_empty() {
                    if self.options.assign_refs {
                        wrap_in_place(child);
                    }
                    self.emit(trail, child);
                    Ok(())
                } else {
                    self.descend(child, rest, trail)
                }
            }
        }
    }

    fn wildcard_leaf(&mut self, node: &'a mut Node, trail: ConcretePath) -> Result<()> {
        if self.options.delete {
            node.clear();
            return Ok(());
        }
        for (seg, child) in node.children_mut() {
            if self.options.assign_refs {
                wrap_in_place(child);
            }
            self.emit(trail.child(seg), child);
        }
        Ok(())
    }

    fn emit(&mut self, trail: ConcretePath, value: &'a mut Node) {
        let path = self.options.collect_paths.then_some(trail);
        self.out.push(Located { path, value });
    }

    fn missing(&self, optional: bool, at: ConcretePath, segment: &Segment) -> Result<()> {
        if optional || self.options.ignore_missing {
            return Ok(());
        }
        Err(TreeError::MissingPath {
            path: self.path.to_string(),
            at,
            segment: segment.to_string(),
        })
    }
}

/// Replace `node` with a literal reference to its current value. Existing
/// references are left alone, so wrapping twice never nests cells.
fn wrap_in_place(node: &mut Node) {
    if matches!(node, Node::Reference(_)) {
        return;
    }
    let value = std::mem::replace(node, Node::null());
    *node = Node::Reference(Reference::new(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Seg;
    use serde_json::json;

    fn path(text: &str) -> Path {
        Path::parse(text).unwrap()
    }

    fn doc() -> Node {
        Node::from(json!({
            "items": [
                {"id": 1, "category": 10, "variations": [{"id": 100}]},
                {"id": 2, "category": null, "variations": []},
                {"id": 3, "category": 11, "variations": [{"id": 101}, {"id": 102}]},
            ],
            "settings": {"locale": "en", "timezone": "UTC"},
        }))
    }

    #[test]
    fn test_literal_path_yields_one_value() {
        let mut doc = doc();
        let found = walk(&mut doc, &path(".settings.locale"), WalkOptions::new()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(*found[0].value, Node::from("en"));
        assert!(found[0].path.is_none());
    }

    #[test]
    fn test_literal_path_missing_fails() {
        let mut doc = doc();
        let err = walk(&mut doc, &path(".settings.currency"), WalkOptions::new()).unwrap_err();
        match err {
            TreeError::MissingPath { at, segment, .. } => {
                assert_eq!(at.to_string(), ".settings");
                assert_eq!(segment, "currency");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sequence_index_as_literal() {
        let mut doc = doc();
        let found =
            walk(&mut doc, &path(".items.2.id"), WalkOptions::new().collect_paths()).unwrap();
        assert_eq!(*found[0].value, Node::from(3));
        assert_eq!(found[0].path.as_ref().unwrap().to_string(), ".items.2.id");
    }

    #[test]
    fn test_wildcard_depth_one_counts_and_orders() {
        let mut doc = doc();
        let found = walk(&mut doc, &path(".items.*"), WalkOptions::new().collect_paths()).unwrap();
        assert_eq!(found.len(), 3);
        let paths: Vec<String> = found
            .iter()
            .map(|l| l.path.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(paths, vec![".items.0", ".items.1", ".items.2"]);
    }

    #[test]
    fn test_wildcard_over_mapping_follows_insertion_order() {
        let mut doc = doc();
        let found = walk(&mut doc, &path(".settings.*"), WalkOptions::new()).unwrap();
        let values: Vec<&Node> = found.iter().map(|l| &*l.value).collect();
        assert_eq!(values, vec![&Node::from("en"), &Node::from("UTC")]);
    }

    #[test]
    fn test_nested_wildcards_flatten_in_order() {
        let mut doc = doc();
        let found = walk(
            &mut doc,
            &path(".items.*.variations.*.id"),
            WalkOptions::new().collect_paths(),
        )
        .unwrap();
        let paths: Vec<String> = found
            .iter()
            .map(|l| l.path.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                ".items.0.variations.0.id",
                ".items.2.variations.0.id",
                ".items.2.variations.1.id",
            ]
        );
    }

    #[test]
    fn test_assign_refs_wraps_once() {
        let mut doc = doc();
        let options = WalkOptions::new().assign_refs();
        walk(&mut doc, &path(".items.*.category"), options).unwrap();
        let found = walk(&mut doc, &path(".items.*.category"), options).unwrap();
        assert_eq!(found.len(), 3);
        for located in &found {
            let Node::Reference(cell) = &*located.value else {
                panic!("expected a reference, got {:?}", located.value);
            };
            assert!(!matches!(cell.literal(), Some(Node::Reference(_))));
        }
        assert_eq!(*found[0].value, Node::from(10));
    }

    #[test]
    fn test_assign_refs_on_wildcard_leaf() {
        let mut doc = Node::from(json!({"quotas": [{"items": [1, 2]}]}));
        walk(&mut doc, &path(".quotas.*.items.*"), WalkOptions::new().assign_refs()).unwrap();
        let items = doc
            .get("quotas")
            .and_then(|q| q.get("0"))
            .and_then(|q| q.get("items"))
            .unwrap();
        assert!(
            items
                .as_sequence()
                .unwrap()
                .iter()
                .all(|n| matches!(n, Node::Reference(_)))
        );
    }

    #[test]
    fn test_optional_segment_tolerates_missing() {
        let mut doc = doc();
        let found = walk(&mut doc, &path(".subevents?.*"), WalkOptions::new()).unwrap();
        assert!(found.is_empty());
        let found = walk(&mut doc, &path(".items.*.addons?"), WalkOptions::new()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_ignore_missing_tolerates_every_segment() {
        let mut doc = doc();
        let found = walk(
            &mut doc,
            &path(".items.*.addons.*"),
            WalkOptions::new().ignore_missing(),
        )
        .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_wildcard_over_scalar_is_missing() {
        let mut doc = doc();
        assert!(walk(&mut doc, &path(".items.*.category.*"), WalkOptions::new()).is_err());
        let found = walk(
            &mut doc,
            &path(".items.*.category.*"),
            WalkOptions::new().ignore_missing(),
        )
        .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_delete_literal_leaf() {
        let mut doc = doc();
        let found = walk(&mut doc, &path(".items.*.id"), WalkOptions::new().delete()).unwrap();
        assert!(found.is_empty());
        let first = doc
            .lookup(&ConcretePath::from_segments(vec![Seg::key("items"), Seg::Index(0)]))
            .unwrap();
        let keys: Vec<_> = first.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["category", "variations"]);
    }

    #[test]
    fn test_delete_wildcard_leaf_clears_container() {
        let mut doc = doc();
        walk(&mut doc, &path(".items.*.variations.*"), WalkOptions::new().delete()).unwrap();
        for item in doc.get("items").unwrap().as_sequence().unwrap() {
            assert_eq!(item.get("variations").unwrap().as_sequence().unwrap().len(), 0);
        }
    }

    #[test]
    fn test_delete_sequence_element() {
        let mut doc = Node::from(json!({"list": ["a", "b", "c"]}));
        walk(&mut doc, &path(".list.1"), WalkOptions::new().delete()).unwrap();
        assert_eq!(doc.get("list").unwrap(), &Node::from(json!(["a", "c"])));
    }

    #[test]
    fn test_matches_are_mutable() {
        let mut doc = doc();
        let found = walk(&mut doc, &path(".items.*.id"), WalkOptions::new()).unwrap();
        for Located { value, .. } in found {
            *value = Node::from(0);
        }
        let ids = walk(&mut doc, &path(".items.*.id"), WalkOptions::new()).unwrap();
        assert!(ids.iter().all(|l| *l.value == Node::from(0)));
    }
}
