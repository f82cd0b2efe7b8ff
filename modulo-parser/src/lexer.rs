//! Lexer for Modulo source text using logos
//!
//! Whitespace runs and identifier runs each coalesce into a single token;
//! every listed punctuation character becomes its own token. Characters
//! outside all three classes are dropped without producing a token, so
//! they show up only as gaps between token spans.

use crate::error::LexError;
use crate::token_stream::TokenStream;
use logos::Logos;
use modulo_core::Span;
use tracing::debug;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End-of-input marker; appended after the scan, never matched
    End,

    #[regex(r"[A-Za-z_]+")]
    Word,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    // Keywords refine Word by exact match only
    #[token("if", priority = 10)]
    If,
    #[token("loop", priority = 10)]
    Loop,
    #[token("break", priority = 10)]
    Break,
    #[token("continue", priority = 10)]
    Continue,

    // Punctuation
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equal,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("[")]
    LSquare,
    #[token("]")]
    RSquare,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::If | TokenKind::Loop | TokenKind::Break | TokenKind::Continue
        )
    }

    /// Keyword kind for an exact lexeme, if it is one
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "if" => Some(TokenKind::If),
            "loop" => Some(TokenKind::Loop),
            "break" => Some(TokenKind::Break),
            "continue" => Some(TokenKind::Continue),
            _ => None,
        }
    }

    pub fn is_trivia(self) -> bool {
        self == TokenKind::Whitespace
    }

    /// Human-readable name used in diagnostics and test output
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::End => "end of input",
            TokenKind::Word => "word",
            TokenKind::Whitespace => "whitespace",
            TokenKind::If => "keyword 'if'",
            TokenKind::Loop => "keyword 'loop'",
            TokenKind::Break => "keyword 'break'",
            TokenKind::Continue => "keyword 'continue'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Equal => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LAngle => "'<'",
            TokenKind::RAngle => "'>'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LCurly => "'{'",
            TokenKind::RCurly => "'}'",
            TokenKind::LSquare => "'['",
            TokenKind::RSquare => "']'",
        }
    }
}

/// A classified lexeme with its position in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte index of the first character of the lexeme
    pub start: usize,
    /// Byte length of the lexeme
    pub len: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, len: usize) -> Self {
        Self { kind, start, len }
    }

    /// The zero-length marker that closes every stream
    pub fn end_marker(source_len: usize) -> Self {
        Self::new(TokenKind::End, source_len, 0)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.len)
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Upper bound on token slots reserved before scanning starts.
const PREALLOCATED_TOKENS: usize = 1024;

pub struct Lexer<'a> {
    source: &'a str,
    capacity: usize,
}

impl<'a> Lexer<'a> {
    /// Default token buffer capacity
    pub const DEFAULT_CAPACITY: usize = 64 * 1024;

    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Set the maximum number of tokens, end marker included
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Scans the whole source and closes the stream with the end marker.
    pub fn tokenize(self) -> Result<TokenStream<'a>, LexError> {
        let mut tokens = Vec::with_capacity(self.capacity.min(PREALLOCATED_TOKENS));
        let mut scanner = TokenKind::lexer(self.source);

        while let Some(result) = scanner.next() {
            // Characters outside every class are skipped
            let Ok(kind) = result else {
                continue;
            };
            let span = scanner.span();
            self.emit(&mut tokens, Token::new(kind, span.start, span.len()))?;
        }
        self.emit(&mut tokens, Token::end_marker(self.source.len()))?;

        debug!(
            "Tokenized {} bytes into {} tokens",
            self.source.len(),
            tokens.len()
        );
        Ok(TokenStream::new(self.source, tokens))
    }

    fn emit(&self, tokens: &mut Vec<Token>, token: Token) -> Result<(), LexError> {
        if tokens.len() >= self.capacity {
            debug!(
                "Token buffer full after {} tokens at byte {}",
                tokens.len(),
                token.start
            );
            return Err(LexError::Capacity {
                capacity: self.capacity,
            });
        }
        tokens.push(token);
        Ok(())
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
