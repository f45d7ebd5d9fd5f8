//! `match` expressions and the pattern grammar.

use super::{ExprParsing, ParseResult, Parser};
use crate::ast::{Clause, Expr, ExprKind, Literal, Pattern, PatternKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::TokenKind;

pub trait MatchParsing<'a> {
    fn parse_match(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn parse_pattern(&mut self) -> ParseResult<Pattern<'a>>;
}

impl<'a, 's, 'i> MatchParsing<'a> for Parser<'a, 's, 'i> {
    /// `'match' expr 'with' clause ('|' clause)* 'end'`
    fn parse_match(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.expect(TokenKind::Match)?.span.start;
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::With)?;
        let mut clauses = vec![self.parse_clause()?];
        while self.eat(TokenKind::Bar).is_some() {
            clauses.push(self.parse_clause()?);
        }
        self.expect(TokenKind::End)?;
        Ok(self.ctx.expr(
            ExprKind::Match {
                scrutinee,
                clauses: self.ctx.alloc_clauses(clauses),
            },
            self.span_from(start),
        ))
    }

    /// A full pattern; constructor patterns take atom arguments.
    fn parse_pattern(&mut self) -> ParseResult<Pattern<'a>> {
        if self.check(TokenKind::IdUpper) {
            let start = self.peek().span.start;
            let name = self.advance().lexeme;
            let mut args = Vec::new();
            while self.at_pattern_start() {
                args.push(self.parse_pattern_atom()?);
            }
            return Ok(Pattern {
                kind: PatternKind::Constr {
                    name,
                    args: self.ctx.alloc_patterns(args),
                },
                span: self.span_from(start),
            });
        }
        self.parse_pattern_atom()
    }
}

impl<'a, 's, 'i> Parser<'a, 's, 'i> {
    fn parse_clause(&mut self) -> ParseResult<Clause<'a>> {
        let start = self.peek().span.start;
        let pattern = self.parse_pattern()?;
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expr()?;
        Ok(Clause {
            pattern,
            body,
            span: self.span_from(start),
        })
    }

    fn at_pattern_start(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::CharLit
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::PlusDot
                | TokenKind::MinusDot
                | TokenKind::IdLower
                | TokenKind::IdUpper
                | TokenKind::LParen
        )
    }

    /// A pattern without constructor arguments; nested constructor
    /// applications need parentheses.
    fn parse_pattern_atom(&mut self) -> ParseResult<Pattern<'a>> {
        let token = self.peek();
        match token.kind {
            TokenKind::IntLit => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Literal::Int(token.lexeme)),
                    span: token.span,
                })
            }
            TokenKind::FloatLit => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Literal::Float(token.lexeme)),
                    span: token.span,
                })
            }
            TokenKind::CharLit => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Literal::Char(token.lexeme)),
                    span: token.span,
                })
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Literal::Bool(token.kind == TokenKind::True)),
                    span: token.span,
                })
            }
            TokenKind::Plus | TokenKind::Minus => self.parse_signed_literal(false),
            TokenKind::PlusDot | TokenKind::MinusDot => self.parse_signed_literal(true),
            TokenKind::IdLower => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Id(token.lexeme),
                    span: token.span,
                })
            }
            TokenKind::IdUpper => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Constr {
                        name: token.lexeme,
                        args: &[],
                    },
                    span: token.span,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_pattern()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            found => Err(ParseError::new(
                ParseErrorKind::ExpectedPattern { found },
                token.span,
            )),
        }
    }

    /// `+`/`-` before an int pattern, `+.`/`-.` before a float pattern.
    /// The sign folds into the literal's text.
    fn parse_signed_literal(&mut self, float: bool) -> ParseResult<Pattern<'a>> {
        let sign = self.advance();
        let negative = matches!(sign.kind, TokenKind::Minus | TokenKind::MinusDot);
        let expected = if float {
            TokenKind::FloatLit
        } else {
            TokenKind::IntLit
        };
        let lit = self.expect(expected)?;
        let text = if negative {
            format!("-{}", self.interner.resolve(lit.lexeme))
        } else {
            self.interner.resolve(lit.lexeme).to_string()
        };
        let symbol = self.interner.intern(&text);
        let literal = if float {
            Literal::Float(symbol)
        } else {
            Literal::Int(symbol)
        };
        Ok(Pattern {
            kind: PatternKind::Literal(literal),
            span: sign.span.merge(lit.span),
        })
    }
}
