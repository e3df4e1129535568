/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * JSON conversion for API bodies
 */

//! Conversion between documents and `serde_json` values.
//!
//! API responses come in as JSON and are turned into plain nodes (no
//! references). Request bodies go out as JSON, and this is where references
//! are resolved: [`to_json`] replaces every cell with the value it currently
//! points at in `root`.

use crate::error::{Result, TreeError};
use crate::node::{ConcretePath, Mapping, Node, Scalar};
use crate::reference::MAX_REFERENCE_HOPS;
use serde_json::{Map, Number, Value};

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::from(b),
            Value::Number(n) => Node::Scalar(number_to_scalar(&n)),
            Value::String(s) => Node::from(s),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect::<Mapping>(),
            ),
        }
    }
}

fn number_to_scalar(n: &Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else {
        // u64 beyond i64::MAX, or a float
        n.as_f64().map_or(Scalar::Null, Scalar::Float)
    }
}

/// Convert `node` to JSON, resolving references against `root`.
///
/// `node` is usually a part of `root` (one entity about to be posted).
/// Non-finite floats have no JSON form and become `null`.
///
/// # Errors
///
/// [`TreeError::DanglingReference`] if a cell points at a location missing
/// from `root`, [`TreeError::ReferenceCycle`] if references keep pointing at
/// references.
pub fn to_json(node: &Node, root: &Node) -> Result<Value> {
    convert(node, root, 0)
}

/// `depth` counts references entered on the way down, so a reference to a
/// container that holds a reference back to it still terminates.
fn convert(node: &Node, root: &Node, depth: usize) -> Result<Value> {
    Ok(match node {
        Node::Scalar(scalar) => scalar_to_json(scalar),
        Node::Sequence(items) => Value::Array(
            items
                .iter()
                .map(|item| convert(item, root, depth))
                .collect::<Result<Vec<_>>>()?,
        ),
        Node::Mapping(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(key.clone(), convert(value, root, depth)?);
            }
            Value::Object(object)
        }
        Node::Reference(cell) => {
            if depth >= MAX_REFERENCE_HOPS {
                return Err(TreeError::ReferenceCycle {
                    target: cell.target().cloned().unwrap_or_else(ConcretePath::new),
                    limit: MAX_REFERENCE_HOPS,
                });
            }
            convert(cell.resolve_value(root)?, root, depth + 1)?
        }
    })
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Int(i) => Value::from(*i),
        Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Scalar::String(s) => Value::String(s.clone()),
    }
}
