//! AST representation using a flat, index-linked node pool
//!
//! Nodes never hold references to each other. A parent points at its first
//! child through [`Node::child`], and siblings are chained through
//! [`Node::next`], so every variable-arity construct (a program's
//! assignments, a block's statements, call arguments) is a singly linked
//! list of arena handles.

use crate::arena::{Children, NodeArena};
use crate::error::{InvalidNodeId, TreeError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::ops::Range;

/// Type alias for the HashSet implementation used in tree walks
pub type AstHashSet<T> = FxHashSet<T>;

/// Byte range of a lexeme in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte index of the first character
    pub start: usize,
    /// Byte length
    pub len: usize,
}

impl Span {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// One past the last byte covered by the span
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Returns the text covered by this span.
    ///
    /// Panics if the span does not lie on character boundaries of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}

/// Node identifier in the arena
///
/// Stores `slot + 1` in a `NonZeroU32` so that `Option<NodeId>` costs no
/// extra space. The root of a tree occupies slot 0; "no child" and "no
/// sibling" are `None`, never a slot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Largest slot index a handle can address.
    pub const MAX_INDEX: usize = (u32::MAX - 1) as usize;

    /// Creates a handle for a 0-based arena slot.
    /// Returns None if the slot cannot be represented.
    pub fn from_index(index: usize) -> Option<Self> {
        if index > Self::MAX_INDEX {
            return None;
        }
        NonZeroU32::new(index as u32 + 1).map(NodeId)
    }

    /// Gets the 0-based arena slot
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.index())
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.index() as u32
    }
}

impl TryFrom<u32> for NodeId {
    type Error = InvalidNodeId;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NodeId::from_index(value as usize).ok_or(InvalidNodeId(value))
    }
}

/// Grammar production a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root; children are the top-level assignments
    Program,
    /// `name = expression`; the lexeme is the bound name
    Assignment,
    /// Exactly one child: a Value or a Block
    Expression,
    /// A word followed by an optional angle call and an optional round call
    Value,
    /// `{ ... }`; children are assignments and expressions
    Block,
    /// `<...>`; names followed by assignments
    AngleCall,
    /// `(...)`; names followed by assignments
    RoundCall,
    /// Head word of a Value
    Word,
    /// Bare name inside a call
    Name,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Assignment => "Assignment",
            NodeKind::Expression => "Expression",
            NodeKind::Value => "Value",
            NodeKind::Block => "Block",
            NodeKind::AngleCall => "AngleCall",
            NodeKind::RoundCall => "RoundCall",
            NodeKind::Word => "Word",
            NodeKind::Name => "Name",
        }
    }

    /// Whether nodes of this kind record an identifier lexeme
    pub fn has_lexeme(self) -> bool {
        matches!(self, NodeKind::Assignment | NodeKind::Word | NodeKind::Name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One slot of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Identifier span for Assignment, Word and Name nodes
    pub lexeme: Option<Span>,
    /// First child, if any
    pub child: Option<NodeId>,
    /// Next sibling in the parent's child list, if any
    pub next: Option<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            lexeme: None,
            child: None,
            next: None,
        }
    }

    pub fn with_lexeme(kind: NodeKind, lexeme: Span) -> Self {
        Self {
            kind,
            lexeme: Some(lexeme),
            child: None,
            next: None,
        }
    }

    /// Text of the node's identifier, if it has one
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        self.lexeme.map(|span| span.slice(source))
    }
}

/// A finished parse: the arena plus the handle of its `Program` root
///
/// # Invariants
/// - The root is the first node ever pushed, so `root.index() == 0`
/// - Every handle reachable from the root is below `arena.len()`
/// - Every sibling chain ends in `None`
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    arena: NodeArena,
    root: NodeId,
}

impl SyntaxTree {
    pub fn new(arena: NodeArena, root: NodeId) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.arena.children(id)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn into_parts(self) -> (NodeArena, NodeId) {
        (self.arena, self.root)
    }

    /// Performs a pre-order depth-first traversal starting at the root
    pub fn dfs(&self, mut visitor: impl FnMut(NodeId, &Node)) {
        self.dfs_from(self.root, &mut visitor);
    }

    /// Performs an iterative pre-order traversal to avoid stack overflow
    pub fn dfs_from(&self, start: NodeId, visitor: &mut impl FnMut(NodeId, &Node)) {
        let mut visited = AstHashSet::default();
        let mut stack = vec![start];

        while let Some(node_id) = stack.pop() {
            if !visited.insert(node_id) {
                continue;
            }

            let Some(node) = self.arena.try_get(node_id) else {
                continue;
            };
            visitor(node_id, node);

            // Reverse so the first child is visited first
            let children: Vec<NodeId> = self.arena.children(node_id).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    /// Checks that every node reachable from the root is in range and
    /// reached exactly once, which also rules out cycles.
    pub fn validate(&self) -> Result<(), TreeError> {
        let len = self.arena.len();
        if self.root.index() >= len {
            return Err(TreeError::RootOutOfRange {
                root: self.root.index(),
                len,
            });
        }

        let mut visited = AstHashSet::default();
        visited.insert(self.root);
        let mut stack = vec![self.root];

        while let Some(parent) = stack.pop() {
            let mut from = parent;
            let mut cursor = self.arena.get(parent).child;
            while let Some(id) = cursor {
                if id.index() >= len {
                    return Err(TreeError::DanglingHandle {
                        from: from.index(),
                        target: id.index(),
                        len,
                    });
                }
                if !visited.insert(id) {
                    return Err(TreeError::SharedNode { node: id.index() });
                }
                stack.push(id);
                from = id;
                cursor = self.arena.get(id).next;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "ast_tests.rs"]
mod tests;
