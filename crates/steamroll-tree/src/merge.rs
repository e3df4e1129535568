/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Deep merge of server responses
 */

//! Deep merge.
//!
//! After an entity is created the server answers with the full object,
//! including fields it assigned (ids, positions, generated codes). [`merge`]
//! folds that answer into the local copy so references pointing at the
//! entity's `id` see the new value, while local fields the server did not
//! echo (and any reference cells inside them) are kept.

use crate::error::{Result, TreeError};
use crate::node::{Mapping, Node, Seg};

/// Merge `update` into `destination` in place and return the destination.
///
/// - mapping and sequence values recurse into the matching child, which is
///   replaced by an empty container of the right kind if it is missing or of
///   another kind
/// - other values overwrite the child
/// - sequence indices at or past the end of the destination append
///
/// ```
/// use steamroll_tree::{Node, merge};
/// use serde_json::json;
///
/// let mut dest = Node::from(json!([1, 2]));
/// merge(&mut dest, Node::from(json!({"2": "x"}))).unwrap();
/// assert_eq!(dest, Node::from(json!([1, 2, "x"])));
/// ```
///
/// # Errors
///
/// [`TreeError::InvalidIndex`] if a mapping key is used to address a sequence
/// and is not a number.
pub fn merge(destination: &mut Node, update: Node) -> Result<&mut Node> {
    match update {
        Node::Mapping(entries) => {
            coerce_root(destination, || Node::Mapping(Mapping::new()));
            for (key, value) in entries {
                merge_entry(destination, Seg::Key(key), value)?;
            }
        }
        Node::Sequence(items) => {
            coerce_root(destination, || Node::Sequence(Vec::new()));
            for (index, value) in items.into_iter().enumerate() {
                merge_entry(destination, Seg::Index(index), value)?;
            }
        }
        value => *destination = value,
    }
    Ok(destination)
}

/// A scalar (or reference) destination cannot take children.
fn coerce_root(destination: &mut Node, empty: impl FnOnce() -> Node) {
    if !destination.is_container() {
        *destination = empty();
    }
}

fn merge_entry(destination: &mut Node, seg: Seg, value: Node) -> Result<()> {
    let child = slot_mut(destination, seg)?;
    match value {
        Node::Mapping(_) => {
            if !matches!(child, Node::Mapping(_)) {
                *child = Node::Mapping(Mapping::new());
            }
            merge(child, value)?;
        }
        Node::Sequence(_) => {
            if !matches!(child, Node::Sequence(_)) {
                *child = Node::Sequence(Vec::new());
            }
            merge(child, value)?;
        }
        value => *child = value,
    }
    Ok(())
}

/// The child at `seg`, created (as null) if absent.
fn slot_mut(destination: &mut Node, seg: Seg) -> Result<&mut Node> {
    match destination {
        Node::Mapping(entries) => {
            let key = match seg {
                Seg::Key(key) => key,
                Seg::Index(index) => index.to_string(),
            };
            Ok(entries.entry(key).or_insert_with(Node::null))
        }
        Node::Sequence(items) => {
            let index = match seg {
                Seg::Index(index) => index,
                Seg::Key(key) => key
                    .parse::<usize>()
                    .map_err(|_| TreeError::InvalidIndex { key })?,
            };
            if index >= items.len() {
                items.push(Node::null());
                let last = items.len() - 1;
                return Ok(&mut items[last]);
            }
            Ok(&mut items[index])
        }
        // merge() coerces the destination before adding children
        other => {
            *other = Node::Mapping(Mapping::new());
            slot_mut(other, seg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ConcretePath;
    use crate::reference::Reference;
    use serde_json::json;

    fn merged(destination: serde_json::Value, update: serde_json::Value) -> Node {
        let mut destination = Node::from(destination);
        merge(&mut destination, Node::from(update)).unwrap();
        destination
    }

    #[test]
    fn test_index_past_end_appends() {
        assert_eq!(merged(json!([1, 2]), json!({"2": "x"})), Node::from(json!([1, 2, "x"])));
        assert_eq!(merged(json!([1, 2]), json!({"7": "x"})), Node::from(json!([1, 2, "x"])));
    }

    #[test]
    fn test_nested_mapping_is_created() {
        assert_eq!(merged(json!({}), json!({"a": {"b": 1}})), Node::from(json!({"a": {"b": 1}})));
    }

    #[test]
    fn test_siblings_survive() {
        let result = merged(
            json!({"id": 1, "name": "Ticket", "variations": [{"id": 10, "value": "S"}]}),
            json!({"id": 42, "variations": [{"id": 420}]}),
        );
        assert_eq!(
            result,
            Node::from(json!({
                "id": 42,
                "name": "Ticket",
                "variations": [{"id": 420, "value": "S"}],
            }))
        );
    }

    #[test]
    fn test_sequence_overwrites_by_index_and_appends() {
        assert_eq!(merged(json!([1, 2]), json!([9, 8, 7])), Node::from(json!([9, 8, 7])));
        assert_eq!(merged(json!([1, 2, 3]), json!([9])), Node::from(json!([9, 2, 3])));
    }

    #[test]
    fn test_kind_mismatch_is_coerced() {
        assert_eq!(
            merged(json!({"a": 1}), json!({"a": {"b": 2}})),
            Node::from(json!({"a": {"b": 2}}))
        );
        assert_eq!(
            merged(json!({"a": {"b": 2}}), json!({"a": [1]})),
            Node::from(json!({"a": [1]}))
        );
        assert_eq!(merged(json!(null), json!({"a": 1})), Node::from(json!({"a": 1})));
    }

    #[test]
    fn test_non_numeric_key_into_sequence() {
        let mut destination = Node::from(json!([1]));
        let err = merge(&mut destination, Node::from(json!({"x": 1}))).unwrap_err();
        assert_eq!(err, TreeError::InvalidIndex { key: "x".to_string() });
    }

    #[test]
    fn test_references_elsewhere_are_kept() {
        let mut destination = Node::from(json!({"id": 5, "category": null}));
        let target = ConcretePath::from_segments(vec![
            Seg::key("categories"),
            Seg::Index(0),
            Seg::key("id"),
        ]);
        destination.set("category", Reference::symbolic(target.clone()));

        merge(&mut destination, Node::from(json!({"id": 42}))).unwrap();
        assert_eq!(destination.get("id"), Some(&Node::from(42)));
        let cell = destination.get("category").and_then(Node::as_reference).unwrap();
        assert_eq!(cell.target(), Some(&target));
    }

    #[test]
    fn test_returns_destination() {
        let mut destination = Node::from(json!({}));
        let result = merge(&mut destination, Node::from(json!({"a": 1}))).unwrap();
        result.set("b", 2);
        assert_eq!(destination, Node::from(json!({"a": 1, "b": 2})));
    }
}
