//! Recursive descent parser ("nodeifier") for Modulo
//!
//! ```text
//! Program     := Assignment+
//! Assignment  := WORD '=' Expression
//! Expression  := Value | Block
//! Value       := WORD AngleCall? RoundCall?
//! Block       := '{' ((Expression | Assignment) SEP)* Expression '}'
//! AngleCall   := '<' (Name (SEP Name)* SEP?)? (Assignment (SEP Assignment)*)? '>'
//! RoundCall   := '(' Name* Assignment* ')'
//! Name        := WORD
//! SEP         := ',' | newline
//! ```
//!
//! Every production either succeeds, leaving the cursor past what it
//! consumed, or fails with the cursor and arena exactly as it found them.
//! Parents are pushed before their children, and the checkpoint for a
//! production is always taken before its own node is pushed.

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::token_stream::TokenStream;
use modulo_core::{Checkpoint, Node, NodeArena, NodeId, NodeKind, SyntaxTree};
use std::panic;
use std::thread;
use tracing::{debug, trace};

pub type ParseResult<T> = Result<T, ParseError>;

/// Cursor and arena length saved before a speculative production
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    pos: usize,
    nodes: Checkpoint,
}

pub struct Parser<'t, 'a> {
    tokens: &'t TokenStream<'a>,
    /// Index of the current token; never moves past the end marker
    pos: usize,
    arena: NodeArena,
    /// Current expression nesting, to prevent stack overflow
    depth: usize,
    max_depth: usize,
    stack_size: usize,
    /// Largest byte offset at which any production gave up
    furthest: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t TokenStream<'a>) -> Self {
        Self::with_config(tokens, &ParserConfig::default())
    }

    pub fn with_config(tokens: &'t TokenStream<'a>, config: &ParserConfig) -> Self {
        Self {
            tokens,
            pos: 0,
            arena: NodeArena::with_capacity(config.max_nodes),
            depth: 0,
            max_depth: config.max_depth,
            stack_size: config.stack_size,
            furthest: 0,
        }
    }

    /// Parses the whole stream into a tree rooted at the `Program` node.
    ///
    /// Only whitespace may follow the last assignment; anything else is a
    /// `NoMatch` at the furthest point any production reached.
    ///
    /// The descent runs on a dedicated thread whose stack is sized by
    /// [`ParserConfig::stack_size`], so nesting up to `max_depth` ends in
    /// `MaxDepthExceeded` instead of a stack overflow.
    pub fn parse(self) -> ParseResult<SyntaxTree> {
        let stack_size = self.stack_size;
        let dispatch = tracing::dispatcher::get_default(|dispatch| dispatch.clone());

        thread::scope(|scope| {
            let handle = thread::Builder::new()
                .name("modulo-parser".to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, move || {
                    tracing::dispatcher::with_default(&dispatch, || self.parse_on_current_thread())
                })
                .map_err(|err| ParseError::Spawn(err.to_string()))?;

            handle
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload))
        })
    }

    fn parse_on_current_thread(mut self) -> ParseResult<SyntaxTree> {
        let root = self.parse_program()?;

        self.skip_trivia();
        if !self.at_end() {
            return Err(ParseError::NoMatch {
                position: self.furthest_failure(),
            });
        }

        debug!(
            "Parsed {} tokens into {} nodes",
            self.tokens.len(),
            self.arena.len()
        );
        Ok(SyntaxTree::new(self.arena, root))
    }

    // ===== Productions =====

    fn parse_program(&mut self) -> ParseResult<NodeId> {
        self.attempt("program", Self::parse_program_inner)
    }

    fn parse_program_inner(&mut self) -> ParseResult<NodeId> {
        let program = self.push(Node::new(NodeKind::Program))?;

        let mut last = None;
        loop {
            match self.parse_assignment() {
                Ok(assignment) => {
                    self.arena.link_child(program, last, assignment);
                    last = Some(assignment);
                }
                // No more assignments
                Err(err) if err.is_recoverable() => break,
                Err(err) => return Err(err),
            }
        }

        if last.is_none() {
            return Err(ParseError::NoMatch {
                position: self.furthest_failure(),
            });
        }
        Ok(program)
    }

    fn parse_assignment(&mut self) -> ParseResult<NodeId> {
        self.attempt("assignment", Self::parse_assignment_inner)
    }

    fn parse_assignment_inner(&mut self) -> ParseResult<NodeId> {
        let name = self.expect(TokenKind::Word)?;
        self.expect(TokenKind::Equal)?;

        let assignment = self.push(Node::with_lexeme(NodeKind::Assignment, name.span()))?;
        let expression = self.parse_expression()?;
        self.arena.link_child(assignment, None, expression);
        Ok(assignment)
    }

    fn parse_expression(&mut self) -> ParseResult<NodeId> {
        self.enter_recursion()?;
        let result = self.attempt("expression", Self::parse_expression_inner);
        self.exit_recursion();
        result
    }

    fn parse_expression_inner(&mut self) -> ParseResult<NodeId> {
        self.skip_trivia();
        if !matches!(self.peek_kind(), TokenKind::Word | TokenKind::LCurly) {
            return self.fail();
        }

        let expression = self.push(Node::new(NodeKind::Expression))?;
        let inner = match self.parse_value() {
            Ok(value) => value,
            // Value restored the cursor, so this is the token Block will see
            Err(err) if err.is_recoverable() && self.peek_kind() == TokenKind::LCurly => {
                self.parse_block()?
            }
            Err(err) => return Err(err),
        };
        self.arena.link_child(expression, None, inner);
        Ok(expression)
    }

    fn parse_value(&mut self) -> ParseResult<NodeId> {
        self.attempt("value", Self::parse_value_inner)
    }

    fn parse_value_inner(&mut self) -> ParseResult<NodeId> {
        let word = self.expect(TokenKind::Word)?;

        let value = self.push(Node::new(NodeKind::Value))?;
        let head = self.push(Node::with_lexeme(NodeKind::Word, word.span()))?;
        self.arena.link_child(value, None, head);

        let mut last = head;
        if self.peek_inline() == TokenKind::LAngle {
            let call = self.parse_angle_call()?;
            self.arena.link_child(value, Some(last), call);
            last = call;
        }
        if self.peek_inline() == TokenKind::LParen {
            let call = self.parse_round_call()?;
            self.arena.link_child(value, Some(last), call);
        }
        Ok(value)
    }

    fn parse_block(&mut self) -> ParseResult<NodeId> {
        self.attempt("block", Self::parse_block_inner)
    }

    fn parse_block_inner(&mut self) -> ParseResult<NodeId> {
        self.expect(TokenKind::LCurly)?;
        let block = self.push(Node::new(NodeKind::Block))?;

        let mut last = None;
        loop {
            let (item, is_expression) = self.parse_block_item()?;
            self.arena.link_child(block, last, item);
            last = Some(item);

            if self.peek_significant() == TokenKind::RCurly {
                // The block's value is its trailing expression
                if !is_expression {
                    return self.fail();
                }
                self.expect(TokenKind::RCurly)?;
                return Ok(block);
            }
            self.expect_separator()?;
        }
    }

    /// Returns the item and whether it is an Expression.
    fn parse_block_item(&mut self) -> ParseResult<(NodeId, bool)> {
        match self.parse_assignment() {
            Ok(assignment) => Ok((assignment, false)),
            Err(err) if err.is_recoverable() && !self.starts_assignment() => {
                Ok((self.parse_expression()?, true))
            }
            Err(err) => Err(err),
        }
    }

    fn parse_angle_call(&mut self) -> ParseResult<NodeId> {
        self.attempt("angle call", Self::parse_angle_call_inner)
    }

    fn parse_angle_call_inner(&mut self) -> ParseResult<NodeId> {
        self.expect(TokenKind::LAngle)?;
        let call = self.push(Node::new(NodeKind::AngleCall))?;

        let mut last = None;
        let mut in_assignments = false;
        while self.peek_significant() != TokenKind::RAngle {
            let item = self.parse_call_item(&mut in_assignments)?;
            self.arena.link_child(call, last, item);
            last = Some(item);

            if self.peek_significant() == TokenKind::RAngle {
                break;
            }
            // The separator between the names and the assignments is optional
            if !in_assignments && self.starts_assignment() {
                continue;
            }
            self.expect_separator()?;
            // A trailing separator may only close the name list
            if in_assignments && self.peek_significant() == TokenKind::RAngle {
                return self.fail();
            }
        }

        self.expect(TokenKind::RAngle)?;
        Ok(call)
    }

    fn parse_round_call(&mut self) -> ParseResult<NodeId> {
        self.attempt("round call", Self::parse_round_call_inner)
    }

    fn parse_round_call_inner(&mut self) -> ParseResult<NodeId> {
        self.expect(TokenKind::LParen)?;
        let call = self.push(Node::new(NodeKind::RoundCall))?;

        let mut last = None;
        let mut in_assignments = false;
        while self.peek_significant() != TokenKind::RParen {
            let item = self.parse_call_item(&mut in_assignments)?;
            self.arena.link_child(call, last, item);
            last = Some(item);
        }

        self.expect(TokenKind::RParen)?;
        Ok(call)
    }

    /// Names come first, assignments after. A word followed by `=` is
    /// always an assignment; once one has been seen, names are rejected.
    fn parse_call_item(&mut self, in_assignments: &mut bool) -> ParseResult<NodeId> {
        if self.starts_assignment() {
            *in_assignments = true;
            return self.parse_assignment();
        }
        if *in_assignments {
            return self.fail();
        }
        self.parse_name()
    }

    fn parse_name(&mut self) -> ParseResult<NodeId> {
        self.attempt("name", |parser| {
            let word = parser.expect(TokenKind::Word)?;
            parser.push(Node::with_lexeme(NodeKind::Name, word.span()))
        })
    }

    // ===== Backtracking =====

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            nodes: self.arena.mark(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.pos = snapshot.pos;
        self.arena.rollback(snapshot.nodes);
    }

    /// Runs a production, undoing its cursor movement and pushes if it
    /// fails recoverably. Fatal errors are passed through untouched.
    fn attempt<T>(
        &mut self,
        production: &'static str,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let snapshot = self.snapshot();
        let result = f(self);
        if let Err(err) = &result {
            if err.is_recoverable() {
                self.restore(snapshot);
                trace!(
                    "Backtracking {} to token {} with {} nodes: {}",
                    production,
                    snapshot.pos,
                    snapshot.nodes.len(),
                    err
                );
            }
        }
        result
    }

    fn push(&mut self, node: Node) -> ParseResult<NodeId> {
        debug_assert_eq!(node.kind.has_lexeme(), node.lexeme.is_some());
        Ok(self.arena.push(node)?)
    }

    /// Check and increment depth, returning error if max depth exceeded
    fn enter_recursion(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseError::MaxDepthExceeded {
                depth: self.depth,
                max_depth: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ===== Cursor =====

    fn current(&self) -> Token {
        // The end marker is never consumed, so `pos` is always in range
        self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn at_end(&self) -> bool {
        self.peek_kind() == TokenKind::End
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn skip_trivia(&mut self) {
        while self.peek_kind().is_trivia() {
            self.pos += 1;
        }
    }

    /// Index of the first non-whitespace token at or after `from`
    fn significant_index(&self, from: usize) -> usize {
        let mut index = from;
        while self.tokens[index].kind.is_trivia() {
            index += 1;
        }
        index
    }

    fn peek_significant(&self) -> TokenKind {
        self.tokens[self.significant_index(self.pos)].kind
    }

    /// Next kind, looking past whitespace only if it stays on this line
    fn peek_inline(&self) -> TokenKind {
        if self.tokens.is_line_break(self.pos) {
            return TokenKind::Whitespace;
        }
        self.peek_significant()
    }

    /// Byte offset of the next significant token
    fn position(&self) -> usize {
        self.tokens[self.significant_index(self.pos)].start
    }

    /// Where a whole-input failure is reported: the deepest point reached
    fn furthest_failure(&self) -> usize {
        self.furthest.max(self.position())
    }

    /// `WORD '='` ahead, ignoring whitespace
    fn starts_assignment(&self) -> bool {
        let word = self.significant_index(self.pos);
        if self.tokens[word].kind != TokenKind::Word {
            return false;
        }
        let equal = self.significant_index(word + 1);
        self.tokens[equal].kind == TokenKind::Equal
    }

    /// Failure at the next significant token: `NotEnoughTokens` if the
    /// input has run out, `NoMatch` otherwise.
    fn fail<T>(&mut self) -> ParseResult<T> {
        let index = self.significant_index(self.pos);
        self.furthest = self.furthest.max(self.tokens[index].start);
        match self.tokens[index].kind {
            TokenKind::End => Err(ParseError::NotEnoughTokens),
            _ => Err(ParseError::NoMatch {
                position: self.tokens[index].start,
            }),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        self.skip_trivia();
        let token = self.current();
        if token.kind != kind {
            return self.fail();
        }
        self.advance();
        Ok(token)
    }

    /// A comma with any surrounding whitespace, or a line break on its own.
    fn expect_separator(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let mut line_break = false;
        if self.peek_kind().is_trivia() {
            line_break = self.tokens.is_line_break(self.pos);
            self.pos += 1;
        }

        if self.peek_kind() == TokenKind::Comma {
            self.advance();
            return Ok(());
        }
        if line_break {
            return Ok(());
        }
        self.pos = start;
        self.fail()
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
