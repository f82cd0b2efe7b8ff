//! Front-end for the Modulo configuration language
//!
//! Source text goes through two stages:
//! - [`Lexer`] turns it into a [`TokenStream`] using logos
//! - [`Parser`] walks the stream by recursive descent with backtracking and
//!   writes nodes into a fixed-capacity arena
//!
//! The result is a [`SyntaxTree`] whose nodes are addressed only through
//! arena handles.

pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token_stream;


pub use config::ParserConfig;
pub use error::{ErrorKind, LexError, ParseError};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseResult, Parser};
pub use token_stream::TokenStream;

pub use modulo_core::{Node, NodeArena, NodeId, NodeKind, Span, SyntaxTree};

/// Tokenize source text with the default token capacity
///
/// Source is taken as `&str`; callers holding raw bytes convert with
/// [`std::str::from_utf8`] first. Only ASCII characters form tokens, and
/// anything else is skipped like any other unlisted character.
pub fn tokenize(source: &str) -> Result<TokenStream<'_>, LexError> {
    Lexer::new(source).tokenize()
}

/// Tokenize source text into at most `max_tokens` tokens, end marker included
pub fn tokenize_with_capacity(source: &str, max_tokens: usize) -> Result<TokenStream<'_>, LexError> {
    Lexer::new(source).with_capacity(max_tokens).tokenize()
}

/// Parse a token stream into a syntax tree
pub fn parse(tokens: &TokenStream<'_>) -> ParseResult<SyntaxTree> {
    Parser::new(tokens).parse()
}

/// Parse a token stream with custom node and depth limits
pub fn parse_with_config(tokens: &TokenStream<'_>, config: &ParserConfig) -> ParseResult<SyntaxTree> {
    Parser::with_config(tokens, config).parse()
}

/// Tokenize and parse in one step
pub fn parse_source(source: &str) -> ParseResult<SyntaxTree> {
    parse_source_with_config(source, &ParserConfig::default())
}

/// Tokenize and parse in one step with custom limits
pub fn parse_source_with_config(source: &str, config: &ParserConfig) -> ParseResult<SyntaxTree> {
    let tokens = tokenize_with_capacity(source, config.max_tokens)?;
    parse_with_config(&tokens, config)
}
