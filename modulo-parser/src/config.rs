//! Parser configuration
//!
//! Capacities are supplied by the caller, never discovered from the input.
//! A caller that wants to bound the work done on untrusted text picks small
//! limits and treats the resulting capacity errors as an abort.

use crate::lexer::Lexer;
use modulo_core::NodeArena;

/// Limits for one tokenize-and-parse run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Token buffer capacity, end marker included
    pub max_tokens: usize,
    /// Node arena capacity
    pub max_nodes: usize,
    /// Maximum nesting of expressions
    pub max_depth: usize,
    /// Stack size of the thread the parse runs on; must cover `max_depth`
    pub stack_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_tokens: Lexer::DEFAULT_CAPACITY,
            max_nodes: 64 * 1024,
            max_depth: 1000,
            stack_size: 64 * 1024 * 1024, // 64MB default
        }
    }
}

impl ParserConfig {
    /// Set the token buffer capacity
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the node arena capacity
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes.min(NodeArena::MAX_CAPACITY);
        self
    }

    /// Set the maximum parsing depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the parser thread's stack size in bytes
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }
}
