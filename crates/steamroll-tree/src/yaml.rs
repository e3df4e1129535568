/*
 * yaml.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * YAML storage format
 */

//! YAML loading and dumping.
//!
//! Exported documents are stored as block-style YAML with key order kept.
//! A linked reference is written as a `!ref`-tagged sequence of the path
//! segments it points at:
//!
//! ```yaml
//! quotas:
//! - items:
//!   - !ref
//!     - items
//!     - 0
//!     - id
//! ```
//!
//! Numbers in a `!ref` sequence are sequence indices, strings are mapping
//! keys. Loading builds the tree from `yaml-rust2` events so tags and scalar
//! styles are visible; dumping goes through `serde_yaml`.

use crate::error::{Result, TreeError};
use crate::node::{ConcretePath, Mapping, Node, Scalar, Seg};
use crate::reference::Reference;
use serde_yaml::Value;
use serde_yaml::value::{Tag, TaggedValue};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag as EventTag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

const REF_TAG: &str = "ref";

/// Load a document from YAML text. Empty input loads as null.
///
/// Only the first document of a multi-document stream is read. Anchors are
/// accepted but aliases are not.
///
/// # Errors
///
/// [`TreeError::Yaml`] for syntax errors, aliases, non-scalar mapping keys and
/// malformed `!ref` values.
pub fn load(text: &str) -> Result<Node> {
    let mut parser = Parser::new_from_str(text);
    let mut builder = NodeBuilder::new();

    parser
        .load(&mut builder, false)
        .map_err(|err| yaml_error(err.info(), err.marker()))?;

    builder.finish()
}

/// Dump a document as YAML.
pub fn dump(node: &Node) -> Result<String> {
    serde_yaml::to_string(&to_value(node)).map_err(|err| TreeError::Emit(err.to_string()))
}

fn yaml_error(message: impl Into<String>, marker: &Marker) -> TreeError {
    TreeError::Yaml {
        message: message.into(),
        line: marker.line(),
        col: marker.col() + 1,
    }
}

/// A container being built.
enum Frame {
    Sequence {
        items: Vec<Node>,
        reference: bool,
        start: Marker,
    },
    Mapping {
        entries: Mapping,
        pending_key: Option<String>,
    },
}

struct NodeBuilder {
    stack: Vec<Frame>,
    root: Option<Node>,
    error: Option<TreeError>,
}

impl NodeBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    fn finish(self) -> Result<Node> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root.unwrap_or_else(Node::null)),
        }
    }

    fn fail(&mut self, message: impl Into<String>, marker: &Marker) {
        if self.error.is_none() {
            self.error = Some(yaml_error(message, marker));
        }
    }

    fn awaiting_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    fn push_complete(&mut self, node: Node, marker: &Marker) {
        let accepted = match self.stack.last_mut() {
            None => {
                self.root = Some(node);
                true
            }
            Some(Frame::Sequence { items, .. }) => {
                items.push(node);
                true
            }
            Some(Frame::Mapping {
                entries,
                pending_key,
            }) => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, node);
                    true
                }
                None => false,
            },
        };
        if !accepted {
            self.fail("mapping keys must be scalars", marker);
        }
    }

    fn on_scalar(
        &mut self,
        value: String,
        style: TScalarStyle,
        tag: Option<EventTag>,
        marker: &Marker,
    ) {
        if tag.as_ref().is_some_and(|t| t.suffix == REF_TAG) {
            self.fail("!ref must tag a sequence of path segments", marker);
            return;
        }
        if self.awaiting_key() {
            if let Some(Frame::Mapping { pending_key, .. }) = self.stack.last_mut() {
                *pending_key = Some(value);
            }
            return;
        }

        let is_str = tag.as_ref().is_some_and(|t| t.suffix == "str");
        let scalar = if is_str || style != TScalarStyle::Plain {
            Scalar::String(value)
        } else {
            resolve_plain(value)
        };
        self.push_complete(Node::Scalar(scalar), marker);
    }

    fn on_sequence_end(&mut self, marker: &Marker) {
        let Some(Frame::Sequence {
            items,
            reference,
            start,
        }) = self.stack.pop()
        else {
            self.fail("unbalanced sequence end", marker);
            return;
        };

        if !reference {
            self.push_complete(Node::Sequence(items), marker);
            return;
        }
        match reference_target(items) {
            Some(target) => {
                self.push_complete(Node::Reference(Reference::symbolic(target)), marker)
            }
            None => self.fail("!ref segments must be strings or non-negative integers", &start),
        }
    }

    fn on_mapping_end(&mut self, marker: &Marker) {
        let Some(Frame::Mapping { entries, .. }) = self.stack.pop() else {
            self.fail("unbalanced mapping end", marker);
            return;
        };
        self.push_complete(Node::Mapping(entries), marker);
    }
}

impl MarkedEventReceiver for NodeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, _anchor_id, tag) => {
                self.on_scalar(value, style, tag, &marker)
            }

            Event::SequenceStart(_anchor_id, tag) => {
                if self.awaiting_key() {
                    self.fail("mapping keys must be scalars", &marker);
                    return;
                }
                let reference = tag.is_some_and(|t| t.suffix == REF_TAG);
                self.stack.push(Frame::Sequence {
                    items: Vec::new(),
                    reference,
                    start: marker,
                });
            }
            Event::SequenceEnd => self.on_sequence_end(&marker),

            Event::MappingStart(_anchor_id, tag) => {
                if self.awaiting_key() {
                    self.fail("mapping keys must be scalars", &marker);
                    return;
                }
                if tag.is_some_and(|t| t.suffix == REF_TAG) {
                    self.fail("!ref must tag a sequence of path segments", &marker);
                    return;
                }
                self.stack.push(Frame::Mapping {
                    entries: Mapping::new(),
                    pending_key: None,
                });
            }
            Event::MappingEnd => self.on_mapping_end(&marker),

            Event::Alias(_anchor_id) => self.fail("aliases are not supported", &marker),
        }
    }
}

fn reference_target(items: Vec<Node>) -> Option<ConcretePath> {
    items
        .into_iter()
        .map(|item| match item {
            Node::Scalar(Scalar::Int(i)) => usize::try_from(i).ok().map(Seg::Index),
            Node::Scalar(Scalar::String(key)) => Some(Seg::Key(key)),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map(ConcretePath::from_segments)
}

/// Resolve an untagged plain scalar. Anything `serde_yaml` would read as
/// null, bool or number is written quoted by `dump`, so strings survive a
/// round trip.
fn resolve_plain(value: String) -> Scalar {
    match value.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => return Scalar::Null,
        "true" | "True" | "TRUE" => return Scalar::Bool(true),
        "false" | "False" | "FALSE" => return Scalar::Bool(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return Scalar::Float(f64::INFINITY);
        }
        "-.inf" | "-.Inf" | "-.INF" => return Scalar::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Scalar::Float(f64::NAN),
        _ => {}
    }

    if leading_zero(&value) {
        return Scalar::String(value);
    }
    if let Ok(i) = value.parse::<i64>() {
        return Scalar::Int(i);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Scalar::Float(f),
        _ => Scalar::String(value),
    }
}

/// Digit strings like `007` are kept as strings (zip codes, voucher codes).
fn leading_zero(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    digits.len() > 1 && digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit())
}

fn to_value(node: &Node) -> Value {
    match node {
        Node::Scalar(Scalar::Null) => Value::Null,
        Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
        Node::Scalar(Scalar::Int(i)) => Value::Number((*i).into()),
        Node::Scalar(Scalar::Float(f)) => Value::Number((*f).into()),
        Node::Scalar(Scalar::String(s)) => Value::String(s.clone()),
        Node::Sequence(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Node::Mapping(entries) => {
            let mut mapping = serde_yaml::Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                mapping.insert(Value::String(key.clone()), to_value(value));
            }
            Value::Mapping(mapping)
        }
        Node::Reference(cell) => match (cell.target(), cell.literal()) {
            (Some(target), _) => Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(REF_TAG),
                value: Value::Sequence(target.segments().iter().map(segment_value).collect()),
            })),
            (None, Some(literal)) => to_value(literal),
            (None, None) => Value::Null,
        },
    }
}

fn segment_value(seg: &Seg) -> Value {
    match seg {
        Seg::Key(key) => Value::String(key.clone()),
        Seg::Index(index) => Value::Number((*index as u64).into()),
    }
}
