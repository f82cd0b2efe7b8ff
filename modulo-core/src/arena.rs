//! Fixed-capacity, append-only node pool
//!
//! The arena supports exactly one kind of growth (appending) plus a bounded
//! undo: [`NodeArena::mark`] records the current length and
//! [`NodeArena::rollback`] truncates back to it. Individual nodes are never
//! freed and the pool is never resized past its capacity.

use crate::ast::{Node, NodeId};
use crate::error::{ArenaError, Result};
use std::ops::{Index, IndexMut};
use tracing::trace;

/// Upper bound on slots reserved up front; the rest grow on demand.
const PREALLOCATED_NODES: usize = 4096;

/// Saved arena length, produced by [`NodeArena::mark`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Arena length at the time the checkpoint was taken
    pub fn len(self) -> usize {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeArena {
    nodes: Vec<Node>,
    capacity: usize,
}

impl NodeArena {
    /// Largest capacity an arena can be given; bounded by [`NodeId`].
    pub const MAX_CAPACITY: usize = NodeId::MAX_INDEX + 1;

    /// Creates an arena that holds at most `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(Self::MAX_CAPACITY);
        Self {
            nodes: Vec::with_capacity(capacity.min(PREALLOCATED_NODES)),
            capacity,
        }
    }

    /// Appends a node and returns its handle, which is always the previous
    /// length of the arena.
    pub fn push(&mut self, node: Node) -> Result<NodeId> {
        let index = self.nodes.len();
        if index >= self.capacity {
            return Err(ArenaError::Full {
                capacity: self.capacity,
            });
        }
        let id = NodeId::from_index(index).ok_or(ArenaError::Full {
            capacity: self.capacity,
        })?;
        self.nodes.push(node);
        Ok(id)
    }

    pub fn mark(&self) -> Checkpoint {
        Checkpoint(self.nodes.len())
    }

    /// Discards every node pushed since `checkpoint` was taken.
    ///
    /// Panics if the arena is already shorter than the checkpoint, which
    /// means the checkpoint was taken on a different timeline.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        assert!(
            checkpoint.0 <= self.nodes.len(),
            "rollback to {} past arena length {}",
            checkpoint.0,
            self.nodes.len()
        );
        if checkpoint.0 < self.nodes.len() {
            trace!(
                "Discarding {} speculative nodes",
                self.nodes.len() - checkpoint.0
            );
        }
        self.nodes.truncate(checkpoint.0);
    }

    /// Panics if `id` is not below [`Self::len`].
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Panics if `id` is not below [`Self::len`].
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn try_get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Attaches `child` to `parent`'s child list. `last` is the current tail
    /// of that list, or `None` when `child` becomes the first child.
    pub fn link_child(&mut self, parent: NodeId, last: Option<NodeId>, child: NodeId) {
        match last {
            Some(tail) => self.get_mut(tail).next = Some(child),
            None => self.get_mut(parent).child = Some(child),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of pushes left before the arena is full
    pub fn remaining(&self) -> usize {
        self.capacity - self.nodes.len()
    }

    /// Iterates over the children of `id` in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            arena: self,
            cursor: self.get(id).child,
            remaining: self.nodes.len(),
        }
    }

    /// Returns an iterator over all nodes in push order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| NodeId::from_index(index).map(|id| (id, node)))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id)
    }
}

/// Walks a sibling chain through `next` links.
///
/// Stops at the end of the chain, at a handle outside the arena, or after
/// as many steps as the arena has nodes, so a corrupted chain cannot loop.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    arena: &'a NodeArena,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor?;
        let node = self.arena.try_get(id)?;
        self.remaining -= 1;
        self.cursor = node.next;
        Some(id)
    }
}

#[cfg(test)]
#[path = "arena_tests.rs"]
mod tests;
