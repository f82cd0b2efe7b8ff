//! Lexer and parser error types
//!
//! Parse failures come in two tiers. `NotEnoughTokens` and `NoMatch` are
//! recoverable: they mean "this alternative does not apply here" and drive
//! backtracking. Everything else is fatal and unwinds straight to the
//! caller of [`crate::Parser::parse`].

use modulo_core::ArenaError;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    #[error("Token buffer full: capacity of {capacity} tokens exhausted")]
    Capacity { capacity: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Not enough tokens: input ended inside a production")]
    NotEnoughTokens,

    #[error("No production matches at position {position}")]
    NoMatch { position: usize },

    #[error("Node arena full: capacity of {capacity} nodes exhausted")]
    ArenaFull { capacity: usize },

    #[error("Maximum parsing depth exceeded: depth {depth} exceeds limit of {max_depth}")]
    MaxDepthExceeded { depth: usize, max_depth: usize },

    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Failed to spawn parser thread: {0}")]
    Spawn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotEnoughTokens,
    NoMatch,
    ArenaFull,
    MaxDepthExceeded,
    Lex,
    Spawn,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::NotEnoughTokens => ErrorKind::NotEnoughTokens,
            ParseError::NoMatch { .. } => ErrorKind::NoMatch,
            ParseError::ArenaFull { .. } => ErrorKind::ArenaFull,
            ParseError::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            ParseError::Lex(_) => ErrorKind::Lex,
            ParseError::Spawn(_) => ErrorKind::Spawn,
        }
    }

    /// Whether a caller may restore its checkpoint and try another
    /// alternative
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParseError::NotEnoughTokens | ParseError::NoMatch { .. }
        )
    }

    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

impl From<ArenaError> for ParseError {
    fn from(err: ArenaError) -> Self {
        match err {
            ArenaError::Full { capacity } => ParseError::ArenaFull { capacity },
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
