//! Read-only, randomly indexable view over the lexer's output

use crate::lexer::{Token, TokenKind};
use std::ops::Index;

/// Tokens in source order, always closed by a [`TokenKind::End`] marker
/// whose offset is the source length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream<'a> {
    source: &'a str,
    tokens: Vec<Token>,
}

impl<'a> TokenStream<'a> {
    /// Callers must pass a token list that ends with the end marker.
    pub(crate) fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last(),
            Some(Token { kind: TokenKind::End, .. })
        ));
        Self { source, tokens }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Never true for a stream built by the lexer, which always holds the
    /// end marker.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// The closing end marker
    pub fn end(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Source text the token was derived from
    pub fn lexeme(&self, token: &Token) -> &'a str {
        token.span().slice(self.source)
    }

    /// Kinds in emission order, end marker included
    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|token| token.kind)
    }

    /// Whether the token at `index` is a whitespace run that crosses a line
    pub fn is_line_break(&self, index: usize) -> bool {
        self.tokens.get(index).is_some_and(|token| {
            token.kind == TokenKind::Whitespace && self.lexeme(token).contains('\n')
        })
    }
}

impl Index<usize> for TokenStream<'_> {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'s, 'a> IntoIterator for &'s TokenStream<'a> {
    type Item = &'s Token;
    type IntoIter = std::slice::Iter<'s, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
#[path = "token_stream_tests.rs"]
mod tests;
