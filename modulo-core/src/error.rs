//! Error types for the node arena and syntax tree

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    #[error("Node arena full: capacity of {capacity} nodes exhausted")]
    Full { capacity: usize },
}

/// Structural defects found by [`crate::SyntaxTree::validate`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    #[error("Root handle {root} is out of range for an arena of {len} nodes")]
    RootOutOfRange { root: usize, len: usize },

    #[error("Node {from} links to handle {target}, but the arena holds {len} nodes")]
    DanglingHandle { from: usize, target: usize, len: usize },

    #[error("Node {node} is reachable through more than one link")]
    SharedNode { node: usize },
}

/// Raised when a raw integer cannot be turned into a [`crate::NodeId`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid node handle: {0}")]
pub struct InvalidNodeId(pub u32);

pub type Result<T> = std::result::Result<T, ArenaError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
