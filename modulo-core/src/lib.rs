//! Core types and data structures for Modulo
//!
//! This crate provides the tree representation produced by the Modulo
//! front-end:
//! - Spans into the source text
//! - Node handles and node kinds
//! - The fixed-capacity node arena with checkpoint/rollback
//! - The finished syntax tree and its traversal helpers

pub mod arena;
pub mod ast;
pub mod error;

pub use arena::{Checkpoint, Children, NodeArena};
pub use ast::{Node, NodeId, NodeKind, Span, SyntaxTree};
pub use error::{ArenaError, InvalidNodeId, TreeError};
