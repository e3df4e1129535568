/*
 * reference.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Lazy foreign-key references
 */

//! Reference cells.
//!
//! Identifiers assigned by the remote system change when an entity is
//! recreated, so a foreign key captured at export time is stale at import
//! time. A [`Reference`] stores where the identifier lives instead (for
//! example `.items.0.id`) and is only resolved when a request body is built,
//! after the referenced entity has been created and its new id merged back.
//!
//! The document root is always passed in by the caller. A cell never holds on
//! to a copy of the document it points into.

use crate::error::{Result, TreeError};
use crate::node::{ConcretePath, Node};

/// Maximum number of reference-to-reference hops followed by
/// [`Reference::resolve_value`].
pub const MAX_REFERENCE_HOPS: usize = 64;

/// A foreign-key value: the literal that was captured, a symbolic path to the
/// value it stands for, or both.
///
/// Serialization writes the path when there is one and the literal otherwise.
/// Cells loaded from a stored document carry only the path.
#[derive(Debug, Clone)]
pub struct Reference {
    literal: Option<Box<Node>>,
    target: Option<ConcretePath>,
}

impl Reference {
    /// Wrap a literal value. The cell stays literal until it is linked.
    pub fn new(literal: Node) -> Self {
        Self {
            literal: Some(Box::new(literal)),
            target: None,
        }
    }

    /// A cell that points at `target` and has no literal fallback.
    pub fn symbolic(target: ConcretePath) -> Self {
        Self {
            literal: None,
            target: Some(target),
        }
    }

    /// The literal captured when the cell was created, if any.
    pub fn literal(&self) -> Option<&Node> {
        self.literal.as_deref()
    }

    /// The location this cell points at, if it has been linked.
    pub fn target(&self) -> Option<&ConcretePath> {
        self.target.as_ref()
    }

    pub fn is_symbolic(&self) -> bool {
        self.target.is_some()
    }

    /// Point this cell at `target`. Re-linking replaces the previous target.
    pub fn point_to(&mut self, target: ConcretePath) {
        self.target = Some(target);
    }

    /// Resolve one hop against `root`.
    ///
    /// A symbolic cell looks its path up in `root` and fails with
    /// [`TreeError::DanglingReference`] if any segment is missing; a literal
    /// cell returns its literal.
    pub fn resolve<'a>(&'a self, root: &'a Node) -> Result<&'a Node> {
        match (&self.target, &self.literal) {
            (Some(target), _) => root
                .lookup(target)
                .ok_or_else(|| TreeError::DanglingReference {
                    target: target.clone(),
                }),
            (None, Some(literal)) => Ok(&**literal),
            (None, None) => Err(TreeError::DanglingReference {
                target: ConcretePath::new(),
            }),
        }
    }

    /// Resolve until the result is not itself a reference.
    pub fn resolve_value<'a>(&'a self, root: &'a Node) -> Result<&'a Node> {
        let mut value = self.resolve(root)?;
        for _ in 0..MAX_REFERENCE_HOPS {
            match value {
                Node::Reference(next) => value = next.resolve(root)?,
                _ => return Ok(value),
            }
        }
        Err(TreeError::ReferenceCycle {
            target: self.target.clone().unwrap_or_default(),
            limit: MAX_REFERENCE_HOPS,
        })
    }
}

/// Cells compare by literal, never by where they point. A cell loaded from
/// a stored document has no literal; two of those compare by path.
impl PartialEq for Reference {
    fn eq(&self, other: &Reference) -> bool {
        match (&self.literal, &other.literal) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.target == other.target,
            _ => false,
        }
    }
}
