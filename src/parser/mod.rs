//! Recursive-descent parser over the demand-driven token stream.
//!
//! The parser pulls tokens one at a time from the lexer through a
//! two-token lookahead buffer and builds the arena-allocated AST. On a
//! syntax error it records a diagnostic and resynchronizes at the next
//! statement boundary, so a single run can report many errors.

mod annotation;
mod def;
mod expr;
mod pattern;

#[cfg(test)]
mod tests;

pub use annotation::AnnotationParsing;
pub use def::DefParsing;
pub use expr::ExprParsing;
pub use pattern::MatchParsing;

use crate::arena_ctx::AstContext;
use crate::ast::{DefStmt, Program};
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::error::{ParseError, ParseErrorKind};
use crate::intern::Interner;
use crate::lexer::Lexer;
use crate::position::{SourcePosition, Span};
use crate::token::{Token, TokenKind};

pub(crate) type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a, 's, 'i> {
    pub(super) lexer: Lexer<'s>,
    pub(super) interner: &'i mut Interner,
    pub(super) diags: &'i mut Diagnostics,
    pub(super) ctx: AstContext<'a>,
    buf: [Option<Token>; 2],
    pub(super) prev_end: SourcePosition,
}

impl<'a, 's, 'i> Parser<'a, 's, 'i> {
    pub fn new(
        lexer: Lexer<'s>,
        interner: &'i mut Interner,
        diags: &'i mut Diagnostics,
        ctx: AstContext<'a>,
    ) -> Self {
        Parser {
            lexer,
            interner,
            diags,
            ctx,
            buf: [None, None],
            prev_end: SourcePosition::default(),
        }
    }

    /// Parses until `Eof`, recovering at statement boundaries.
    pub fn parse_program(&mut self) -> Program<'a> {
        log::trace!("parser: starting program");
        let mut stmts = Vec::new();
        loop {
            if self.diags.should_abort() {
                break;
            }
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Let => match self.parse_let_stmt() {
                    Ok(stmt) => stmts.push(DefStmt::Let(stmt)),
                    Err(err) => {
                        self.report(err);
                        self.synchronize();
                    }
                },
                TokenKind::Type => match self.parse_type_stmt() {
                    Ok(stmt) => stmts.push(DefStmt::Type(stmt)),
                    Err(err) => {
                        self.report(err);
                        self.synchronize();
                    }
                },
                // Leftover sync tokens from a recovery; already reported.
                TokenKind::In | TokenKind::With | TokenKind::End | TokenKind::Done => {
                    self.advance();
                }
                found => {
                    let span = self.peek().span;
                    self.report(ParseError::new(
                        ParseErrorKind::ExpectedStatement { found },
                        span,
                    ));
                    self.synchronize();
                }
            }
        }
        Program {
            stmts: self.ctx.alloc_stmts(stmts),
        }
    }

    // ---- lookahead plumbing ----

    fn fill(&mut self, n: usize) {
        if self.buf[0].is_none() {
            self.buf[0] = Some(self.lexer.next_token(self.interner, self.diags));
        }
        if n > 1 && self.buf[1].is_none() {
            self.buf[1] = Some(self.lexer.next_token(self.interner, self.diags));
        }
    }

    pub(super) fn peek(&mut self) -> Token {
        self.fill(1);
        self.buf[0].unwrap()
    }

    pub(super) fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    pub(super) fn peek2_kind(&mut self) -> TokenKind {
        self.fill(2);
        self.buf[1].unwrap().kind
    }

    pub(super) fn advance(&mut self) -> Token {
        self.fill(1);
        let token = self.buf[0].take().unwrap();
        self.buf[0] = self.buf[1].take();
        if token.kind != TokenKind::Eof {
            self.prev_end = token.span.end;
        }
        token
    }

    pub(super) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.peek();
        if token.kind == kind {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected: kind,
                    found: token.kind,
                },
                token.span,
            ))
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: SourcePosition) -> Span {
        Span::new(start, self.prev_end)
    }

    pub(super) fn report(&mut self, err: ParseError) {
        self.diags
            .error(DiagnosticKind::Syntax, err.span, err.message());
    }

    /// Discards tokens until a statement can plausibly restart: `let`,
    /// `type`, or `Eof` at bracket depth zero. `in`, `with`, `end`, and
    /// `done` at depth zero also stop the scan so recovery inside an
    /// expression does not swallow the enclosing construct's tail.
    fn synchronize(&mut self) {
        let mut depth: usize = 0;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Let | TokenKind::Type if depth == 0 => return,
                TokenKind::In | TokenKind::With | TokenKind::Done if depth == 0 => return,
                TokenKind::End if depth == 0 => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::Begin => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::End => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
