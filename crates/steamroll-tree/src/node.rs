/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Document tree nodes and concrete paths
 */

//! Untyped document tree.
//!
//! A document is a [`Node`]: mappings keep insertion order (it is the order
//! the API returned fields in, and the order they are written back out),
//! sequences keep index order, and foreign keys may have been replaced by
//! [`Reference`] cells.

use crate::reference::Reference;
use indexmap::IndexMap;
use std::fmt;

/// Ordered mapping of field name to value.
pub type Mapping = IndexMap<String, Node>;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A document node.
#[derive(Debug, Clone)]
pub enum Node {
    /// Leaf value
    Scalar(Scalar),

    /// Index-ordered list
    Sequence(Vec<Node>),

    /// Insertion-ordered mapping
    Mapping(Mapping),

    /// Foreign key pointing elsewhere in the same document
    Reference(Reference),
}

/// One step of a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seg {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl Seg {
    /// Create a key segment.
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, "{}", k),
            Seg::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A resolved location in a document: keys and indices only, no wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConcretePath(Vec<Seg>);

impl ConcretePath {
    /// The document root.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Return a copy of this path extended by one segment.
    pub fn child(&self, seg: Seg) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(seg);
        Self(segments)
    }

    /// Return a copy of this path followed by `other`.
    pub fn join(&self, other: &ConcretePath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConcretePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, ".");
        }
        for seg in &self.0 {
            write!(f, ".{}", seg)?;
        }
        Ok(())
    }
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    /// Check if this is a mapping or a sequence.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Mapping(_) | Node::Sequence(_))
    }

    /// Name of the node kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "bool",
            Node::Scalar(Scalar::Int(_)) => "integer",
            Node::Scalar(Scalar::Float(_)) => "float",
            Node::Scalar(Scalar::String(_)) => "string",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
            Node::Reference(_) => "reference",
        }
    }

    /// Truthiness in the sense of "has content": null, false, zero, empty
    /// strings and empty containers are false. A linked reference is true; an
    /// unlinked one is as truthy as its literal.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Scalar(Scalar::Null) => false,
            Node::Scalar(Scalar::Bool(b)) => *b,
            Node::Scalar(Scalar::Int(i)) => *i != 0,
            Node::Scalar(Scalar::Float(f)) => *f != 0.0,
            Node::Scalar(Scalar::String(s)) => !s.is_empty(),
            Node::Sequence(items) => !items.is_empty(),
            Node::Mapping(entries) => !entries.is_empty(),
            Node::Reference(cell) => {
                cell.is_symbolic() || cell.literal().is_some_and(Node::is_truthy)
            }
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Node::Reference(cell) => Some(cell),
            _ => None,
        }
    }

    /// Get a mapping value by key, or a sequence element by decimal index.
    pub fn get(&self, key: &str) -> Option<&Node> {
        let seg = self.locate(key)?;
        self.child(&seg)
    }

    /// Mutable variant of [`Node::get`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        let seg = self.locate(key)?;
        self.child_mut(&seg)
    }

    /// Resolve a textual key to the concrete segment it addresses in this
    /// node, if that child exists.
    pub fn locate(&self, key: &str) -> Option<Seg> {
        match self {
            Node::Mapping(entries) if entries.contains_key(key) => Some(Seg::key(key)),
            Node::Sequence(items) => key
                .parse::<usize>()
                .ok()
                .filter(|index| *index < items.len())
                .map(Seg::Index),
            _ => None,
        }
    }

    /// Look up a direct child by concrete segment.
    pub fn child(&self, seg: &Seg) -> Option<&Node> {
        match (self, seg) {
            (Node::Mapping(entries), Seg::Key(k)) => entries.get(k),
            (Node::Mapping(entries), Seg::Index(i)) => entries.get(&i.to_string()),
            (Node::Sequence(items), Seg::Index(i)) => items.get(*i),
            (Node::Sequence(items), Seg::Key(k)) => {
                k.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    /// Mutable variant of [`Node::child`].
    pub fn child_mut(&mut self, seg: &Seg) -> Option<&mut Node> {
        match (self, seg) {
            (Node::Mapping(entries), Seg::Key(k)) => entries.get_mut(k),
            (Node::Mapping(entries), Seg::Index(i)) => entries.get_mut(&i.to_string()),
            (Node::Sequence(items), Seg::Index(i)) => items.get_mut(*i),
            (Node::Sequence(items), Seg::Key(k)) => {
                k.parse::<usize>().ok().and_then(move |i| items.get_mut(i))
            }
            _ => None,
        }
    }

    /// Remove a direct child. Mapping removal keeps the order of the
    /// remaining keys.
    pub fn remove(&mut self, seg: &Seg) -> Option<Node> {
        match (self, seg) {
            (Node::Mapping(entries), Seg::Key(k)) => entries.shift_remove(k),
            (Node::Mapping(entries), Seg::Index(i)) => entries.shift_remove(&i.to_string()),
            (Node::Sequence(items), Seg::Index(i)) if *i < items.len() => Some(items.remove(*i)),
            (Node::Sequence(items), Seg::Key(k)) => match k.parse::<usize>() {
                Ok(i) if i < items.len() => Some(items.remove(i)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Remove every child of a container.
    pub fn clear(&mut self) {
        match self {
            Node::Mapping(entries) => entries.clear(),
            Node::Sequence(items) => items.clear(),
            _ => {}
        }
    }

    /// All direct children with the segment that reaches each, in
    /// insertion/index order. Empty for scalars and references.
    pub fn children_mut(&mut self) -> Vec<(Seg, &mut Node)> {
        match self {
            Node::Mapping(entries) => entries
                .iter_mut()
                .map(|(k, v)| (Seg::key(k.as_str()), v))
                .collect(),
            Node::Sequence(items) => items
                .iter_mut()
                .enumerate()
                .map(|(i, v)| (Seg::Index(i), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Follow a concrete path from this node.
    pub fn lookup(&self, path: &ConcretePath) -> Option<&Node> {
        path.segments()
            .iter()
            .try_fold(self, |node, seg| node.child(seg))
    }

    /// Mutable variant of [`Node::lookup`].
    pub fn lookup_mut(&mut self, path: &ConcretePath) -> Option<&mut Node> {
        let mut node = self;
        for seg in path.segments() {
            node = node.child_mut(seg)?;
        }
        Some(node)
    }

    /// Insert or replace a mapping field. Returns false when this node is
    /// not a mapping.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Node>) -> bool {
        match self {
            Node::Mapping(entries) => {
                entries.insert(key.into(), value.into());
                true
            }
            _ => false,
        }
    }
}

/// Structural equality, except that a [`Reference`] compares equal to any
/// value equal to its literal. Identifier matching therefore works the same
/// before and after a value was linked.
impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Reference(a), Node::Reference(b)) => a == b,
            (Node::Reference(cell), value) | (value, Node::Reference(cell)) => {
                cell.literal().is_some_and(|literal| literal == value)
            }
            (Node::Scalar(a), Node::Scalar(b)) => a == b,
            (Node::Sequence(a), Node::Sequence(b)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Scalar(Scalar::Float(f))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(entries: Mapping) -> Self {
        Node::Mapping(entries)
    }
}

impl From<Reference> for Node {
    fn from(cell: Reference) -> Self {
        Node::Reference(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: Vec<Seg>) -> ConcretePath {
        ConcretePath::from_segments(segments)
    }

    #[test]
    fn test_concrete_path_display() {
        assert_eq!(ConcretePath::new().to_string(), ".");
        let p = path(vec![Seg::key("items"), Seg::Index(0), Seg::key("id")]);
        assert_eq!(p.to_string(), ".items.0.id");
    }

    #[test]
    fn test_lookup_mapping_and_sequence() {
        let doc = Node::from(json!({"items": [{"id": 5}, {"id": 6}]}));
        let p = path(vec![Seg::key("items"), Seg::Index(1), Seg::key("id")]);
        assert_eq!(doc.lookup(&p), Some(&Node::from(6)));
        assert!(doc.lookup(&path(vec![Seg::key("items"), Seg::Index(2)])).is_none());
    }

    #[test]
    fn test_get_parses_sequence_index() {
        let doc = Node::from(json!(["a", "b"]));
        assert_eq!(doc.get("1"), Some(&Node::from("b")));
        assert!(doc.get("x").is_none());
        assert!(doc.get("2").is_none());
    }

    #[test]
    fn test_remove_keeps_mapping_order() {
        let mut doc = Node::from(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(doc.remove(&Seg::key("b")), Some(Node::from(2)));
        let keys: Vec<_> = doc.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_reference_equals_its_literal() {
        let cell = Node::Reference(Reference::new(Node::from(5)));
        assert_eq!(cell, Node::from(5));
        assert_eq!(Node::from(5), cell);
        assert_ne!(cell, Node::from(6));
    }

    #[test]
    fn test_symbolic_reference_without_literal_matches_nothing() {
        let cell = Node::Reference(Reference::symbolic(path(vec![Seg::key("x")])));
        assert_ne!(cell, Node::null());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Node::null().is_truthy());
        assert!(!Node::from(json!([])).is_truthy());
        assert!(Node::from(json!([1])).is_truthy());
        assert!(!Node::from("").is_truthy());
        assert!(Node::Reference(Reference::new(Node::from(1))).is_truthy());
        assert!(!Node::Reference(Reference::new(Node::null())).is_truthy());
    }
}
