//! Expression grammar: precedence climbing over application atoms.
//!
//! Levels from loosest to tightest: `:=`, `;`, `if/then/else`, `||`,
//! `&&`, comparisons (non-associative), additive, multiplicative, `**`
//! (right), unary, application. Function and constructor application is
//! juxtaposition of atoms and binds tighter than every operator.

use super::{AnnotationParsing, DefParsing, MatchParsing, ParseResult, Parser};
use crate::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::TokenKind;

pub trait ExprParsing<'a> {
    fn parse_expr(&mut self) -> ParseResult<&'a Expr<'a>>;
}

impl<'a, 's, 'i> ExprParsing<'a> for Parser<'a, 's, 'i> {
    /// Entry point: the `:=` level.
    fn parse_expr(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let lhs = self.parse_semi()?;
        if self.eat(TokenKind::Assign).is_some() {
            let rhs = self.parse_expr()?;
            return Ok(self.ctx.expr(
                ExprKind::Binary {
                    op: BinaryOp::Assign,
                    lhs,
                    rhs,
                },
                self.span_from(start),
            ));
        }
        Ok(lhs)
    }
}

impl<'a, 's, 'i> Parser<'a, 's, 'i> {
    fn parse_semi(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let lhs = self.parse_if_level()?;
        if self.eat(TokenKind::Semicolon).is_some() {
            let rhs = self.parse_semi()?;
            return Ok(self.ctx.expr(
                ExprKind::Binary {
                    op: BinaryOp::Semicolon,
                    lhs,
                    rhs,
                },
                self.span_from(start),
            ));
        }
        Ok(lhs)
    }

    fn parse_if_level(&mut self) -> ParseResult<&'a Expr<'a>> {
        if !self.check(TokenKind::If) {
            return self.parse_or();
        }
        let start = self.advance().span.start;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let then_expr = self.parse_if_level()?;
        let else_expr = if self.eat(TokenKind::Else).is_some() {
            Some(self.parse_if_level()?)
        } else {
            None
        };
        Ok(self.ctx.expr(
            ExprKind::If {
                cond,
                then_expr,
                else_expr,
            },
            self.span_from(start),
        ))
    }

    fn parse_or(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let mut lhs = self.parse_and()?;
        while self.eat(TokenKind::OrOr).is_some() {
            let rhs = self.parse_and()?;
            lhs = self.ctx.expr(
                ExprKind::Binary {
                    op: BinaryOp::OrOr,
                    lhs,
                    rhs,
                },
                self.span_from(start),
            );
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let mut lhs = self.parse_comparison()?;
        while self.eat(TokenKind::AndAnd).is_some() {
            let rhs = self.parse_comparison()?;
            lhs = self.ctx.expr(
                ExprKind::Binary {
                    op: BinaryOp::AndAnd,
                    lhs,
                    rhs,
                },
                self.span_from(start),
            );
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let lhs = self.parse_additive()?;
        let op = match comparison_op(self.peek_kind()) {
            Some(op) => op,
            None => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        if comparison_op(self.peek_kind()).is_some() {
            let offending = self.peek();
            return Err(ParseError::new(
                ParseErrorKind::NonAssociativeComparison {
                    op: offending.kind,
                },
                offending.span,
            ));
        }
        Ok(self
            .ctx
            .expr(ExprKind::Binary { op, lhs, rhs }, self.span_from(start)))
    }

    fn parse_additive(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::PlusDot => BinaryOp::FAdd,
                TokenKind::MinusDot => BinaryOp::FSub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = self.ctx.expr(
                ExprKind::Binary { op, lhs, rhs },
                self.span_from(start),
            );
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let mut lhs = self.parse_power()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::StarDot => BinaryOp::FMul,
                TokenKind::SlashDot => BinaryOp::FDiv,
                TokenKind::Mod => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_power()?;
            lhs = self.ctx.expr(
                ExprKind::Binary { op, lhs, rhs },
                self.span_from(start),
            );
        }
    }

    fn parse_power(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let lhs = self.parse_unary()?;
        if self.eat(TokenKind::DblStar).is_some() {
            let rhs = self.parse_power()?;
            return Ok(self.ctx.expr(
                ExprKind::Binary {
                    op: BinaryOp::Pow,
                    lhs,
                    rhs,
                },
                self.span_from(start),
            ));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<&'a Expr<'a>> {
        let op = match self.peek_kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::PlusDot => UnaryOp::FPlus,
            TokenKind::MinusDot => UnaryOp::FMinus,
            TokenKind::Bang => UnaryOp::Deref,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Delete => UnaryOp::Delete,
            _ => return self.parse_primary(),
        };
        let start = self.advance().span.start;
        let operand = self.parse_unary()?;
        Ok(self
            .ctx
            .expr(ExprKind::Unary { op, operand }, self.span_from(start)))
    }

    /// Control forms, application, or a plain atom.
    fn parse_primary(&mut self) -> ParseResult<&'a Expr<'a>> {
        match self.peek_kind() {
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Match => self.parse_match(),
            TokenKind::Dim => self.parse_dim(),
            TokenKind::New => self.parse_new(),
            TokenKind::Let => self.parse_let_in(),
            TokenKind::IdLower => {
                if self.peek2_kind() == TokenKind::LBracket {
                    return self.parse_array_access();
                }
                let start = self.peek().span.start;
                let name = self.advance().lexeme;
                let args = self.parse_arguments()?;
                if args.is_empty() {
                    Ok(self
                        .ctx
                        .expr(ExprKind::IdCall(name), self.span_from(start)))
                } else {
                    Ok(self.ctx.expr(
                        ExprKind::Call {
                            name,
                            args: self.ctx.alloc_expr_refs(args),
                        },
                        self.span_from(start),
                    ))
                }
            }
            TokenKind::IdUpper => {
                let start = self.peek().span.start;
                let name = self.advance().lexeme;
                let args = self.parse_arguments()?;
                Ok(self.ctx.expr(
                    ExprKind::ConstrCall {
                        name,
                        args: self.ctx.alloc_expr_refs(args),
                    },
                    self.span_from(start),
                ))
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<&'a Expr<'a>>> {
        let mut args = Vec::new();
        while self.at_atom_start() {
            args.push(self.parse_arg_atom()?);
        }
        Ok(args)
    }

    fn at_atom_start(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::CharLit
                | TokenKind::StringLit
                | TokenKind::True
                | TokenKind::False
                | TokenKind::IdLower
                | TokenKind::IdUpper
                | TokenKind::LParen
                | TokenKind::Begin
        )
    }

    /// One application argument: an atom, never an operator expression.
    fn parse_arg_atom(&mut self) -> ParseResult<&'a Expr<'a>> {
        match self.peek_kind() {
            TokenKind::IdLower => {
                if self.peek2_kind() == TokenKind::LBracket {
                    return self.parse_array_access();
                }
                let token = self.advance();
                Ok(self.ctx.expr(ExprKind::IdCall(token.lexeme), token.span))
            }
            TokenKind::IdUpper => {
                let token = self.advance();
                Ok(self.ctx.expr(
                    ExprKind::ConstrCall {
                        name: token.lexeme,
                        args: &[],
                    },
                    token.span,
                ))
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> ParseResult<&'a Expr<'a>> {
        let token = self.peek();
        match token.kind {
            TokenKind::IntLit => {
                self.advance();
                Ok(self
                    .ctx
                    .expr(ExprKind::Lit(Literal::Int(token.lexeme)), token.span))
            }
            TokenKind::FloatLit => {
                self.advance();
                Ok(self
                    .ctx
                    .expr(ExprKind::Lit(Literal::Float(token.lexeme)), token.span))
            }
            TokenKind::CharLit => {
                self.advance();
                Ok(self
                    .ctx
                    .expr(ExprKind::Lit(Literal::Char(token.lexeme)), token.span))
            }
            TokenKind::StringLit => {
                self.advance();
                Ok(self
                    .ctx
                    .expr(ExprKind::Lit(Literal::Str(token.lexeme)), token.span))
            }
            TokenKind::True => {
                self.advance();
                Ok(self
                    .ctx
                    .expr(ExprKind::Lit(Literal::Bool(true)), token.span))
            }
            TokenKind::False => {
                self.advance();
                Ok(self
                    .ctx
                    .expr(ExprKind::Lit(Literal::Bool(false)), token.span))
            }
            TokenKind::LParen => {
                let open = self.advance();
                if self.check(TokenKind::RParen) {
                    let close = self.advance();
                    return Ok(self
                        .ctx
                        .expr(ExprKind::Lit(Literal::Unit), open.span.merge(close.span)));
                }
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Begin => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::End)?;
                Ok(inner)
            }
            found => Err(ParseError::new(
                ParseErrorKind::ExpectedExpression { found },
                token.span,
            )),
        }
    }

    /// `id '[' expr (',' expr)* ']'`
    fn parse_array_access(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let name = self.expect(TokenKind::IdLower)?.lexeme;
        self.expect(TokenKind::LBracket)?;
        let mut indexes = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma).is_some() {
            indexes.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RBracket)?;
        Ok(self.ctx.expr(
            ExprKind::ArrayAccess {
                name,
                indexes: self.ctx.alloc_expr_refs(indexes),
            },
            self.span_from(start),
        ))
    }

    /// `'while' expr 'do' expr 'done'`
    fn parse_while(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.expect(TokenKind::While)?.span.start;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_expr()?;
        self.expect(TokenKind::Done)?;
        Ok(self
            .ctx
            .expr(ExprKind::While { cond, body }, self.span_from(start)))
    }

    /// `'for' id '=' expr ('to'|'downto') expr 'do' expr 'done'`
    fn parse_for(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.expect(TokenKind::For)?.span.start;
        let var = self.expect(TokenKind::IdLower)?.lexeme;
        self.expect(TokenKind::Eq)?;
        let init = self.parse_expr()?;
        let ascending = if self.eat(TokenKind::To).is_some() {
            true
        } else {
            self.expect(TokenKind::Downto)?;
            false
        };
        let limit = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_expr()?;
        self.expect(TokenKind::Done)?;
        Ok(self.ctx.expr(
            ExprKind::For {
                var,
                init,
                ascending,
                limit,
                body,
            },
            self.span_from(start),
        ))
    }

    /// `'dim' [intconst] id`
    fn parse_dim(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.expect(TokenKind::Dim)?.span.start;
        let dim = match self.eat(TokenKind::IntLit) {
            None => 1,
            Some(token) => {
                let text = self.interner.resolve(token.lexeme);
                match text.parse::<u32>() {
                    Ok(n) => n,
                    Err(_) => {
                        return Err(ParseError::new(
                            ParseErrorKind::BadIntLiteral {
                                lexeme: text.to_string(),
                            },
                            token.span,
                        ))
                    }
                }
            }
        };
        let id = self.expect(TokenKind::IdLower)?.lexeme;
        Ok(self
            .ctx
            .expr(ExprKind::Dim { dim, id }, self.span_from(start)))
    }

    /// `'new' type`
    fn parse_new(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.expect(TokenKind::New)?.span.start;
        let annotation = self.parse_type_annotation()?;
        Ok(self
            .ctx
            .expr(ExprKind::New(annotation), self.span_from(start)))
    }

    /// `letstmt 'in' expr`
    fn parse_let_in(&mut self) -> ParseResult<&'a Expr<'a>> {
        let start = self.peek().span.start;
        let stmt = self.parse_let_stmt()?;
        self.expect(TokenKind::In)?;
        let body = self.parse_expr()?;
        Ok(self
            .ctx
            .expr(ExprKind::LetIn { stmt, body }, self.span_from(start)))
    }
}

fn comparison_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::LtGt => Some(BinaryOp::Neq),
        TokenKind::EqEq => Some(BinaryOp::EqEq),
        TokenKind::BangEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Le => Some(BinaryOp::Le),
        TokenKind::Ge => Some(BinaryOp::Ge),
        _ => None,
    }
}
