//! Definition statements: `let` groups, `type` groups, and their parts.

use super::{AnnotationParsing, ExprParsing, ParseResult, Parser};
use crate::ast::{Constructor, LetDef, LetDefKind, LetStmt, Param, TypeDef, TypeStmt};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::TokenKind;

pub trait DefParsing<'a> {
    fn parse_let_stmt(&mut self) -> ParseResult<LetStmt<'a>>;
    fn parse_type_stmt(&mut self) -> ParseResult<TypeStmt<'a>>;
    fn parse_let_def(&mut self) -> ParseResult<LetDef<'a>>;
    fn parse_type_def(&mut self) -> ParseResult<TypeDef<'a>>;
    fn parse_constructor(&mut self) -> ParseResult<Constructor<'a>>;
    fn parse_param(&mut self) -> ParseResult<Param<'a>>;
}

impl<'a, 's, 'i> DefParsing<'a> for Parser<'a, 's, 'i> {
    /// `'let' ['rec'] letdef ('and' letdef)*`
    fn parse_let_stmt(&mut self) -> ParseResult<LetStmt<'a>> {
        let start = self.peek().span.start;
        self.expect(TokenKind::Let)?;
        let recursive = self.eat(TokenKind::Rec).is_some();
        let mut defs = vec![self.parse_let_def()?];
        while self.eat(TokenKind::And).is_some() {
            defs.push(self.parse_let_def()?);
        }
        Ok(LetStmt {
            recursive,
            defs: self.ctx.alloc_let_defs(defs),
            span: self.span_from(start),
        })
    }

    /// `'type' tdef ('and' tdef)*`
    fn parse_type_stmt(&mut self) -> ParseResult<TypeStmt<'a>> {
        let start = self.peek().span.start;
        self.expect(TokenKind::Type)?;
        let mut defs = vec![self.parse_type_def()?];
        while self.eat(TokenKind::And).is_some() {
            defs.push(self.parse_type_def()?);
        }
        Ok(TypeStmt {
            defs: self.ctx.alloc_type_defs(defs),
            span: self.span_from(start),
        })
    }

    /// `'mutable' id ['[' expr (',' expr)* ']'] [':' type]`
    /// or `id param* [':' type] '=' expr`.
    fn parse_let_def(&mut self) -> ParseResult<LetDef<'a>> {
        let start = self.peek().span.start;
        if self.eat(TokenKind::Mutable).is_some() {
            let name = self.expect(TokenKind::IdLower)?.lexeme;
            let kind = if self.eat(TokenKind::LBracket).is_some() {
                let mut dims = vec![self.parse_expr()?];
                while self.eat(TokenKind::Comma).is_some() {
                    dims.push(self.parse_expr()?);
                }
                self.expect(TokenKind::RBracket)?;
                LetDefKind::Array {
                    dims: self.ctx.alloc_expr_refs(dims),
                }
            } else {
                LetDefKind::Variable
            };
            let annotation = if self.eat(TokenKind::Colon).is_some() {
                Some(self.parse_type_annotation()?)
            } else {
                None
            };
            return Ok(LetDef {
                name,
                annotation,
                kind,
                span: self.span_from(start),
            });
        }

        let name = self.expect(TokenKind::IdLower)?.lexeme;
        let mut params = Vec::new();
        while matches!(self.peek_kind(), TokenKind::IdLower | TokenKind::LParen) {
            params.push(self.parse_param()?);
        }
        let annotation = if self.eat(TokenKind::Colon).is_some() {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let kind = if params.is_empty() {
            LetDefKind::Constant { value }
        } else {
            LetDefKind::Function {
                params: self.ctx.alloc_params(params),
                body: value,
            }
        };
        Ok(LetDef {
            name,
            annotation,
            kind,
            span: self.span_from(start),
        })
    }

    /// `id '=' constr ('|' constr)*`
    fn parse_type_def(&mut self) -> ParseResult<TypeDef<'a>> {
        let start = self.peek().span.start;
        let name = self.expect(TokenKind::IdLower)?.lexeme;
        self.expect(TokenKind::Eq)?;
        let mut constructors = vec![self.parse_constructor()?];
        while self.eat(TokenKind::Bar).is_some() {
            constructors.push(self.parse_constructor()?);
        }
        Ok(TypeDef {
            name,
            constructors: self.ctx.alloc_constructors(constructors),
            span: self.span_from(start),
        })
    }

    /// `Id ['of' type+]`
    fn parse_constructor(&mut self) -> ParseResult<Constructor<'a>> {
        let start = self.peek().span.start;
        let name = self.expect(TokenKind::IdUpper)?.lexeme;
        let mut fields = Vec::new();
        if self.eat(TokenKind::Of).is_some() {
            fields.push(self.parse_type_annotation()?);
            while self.at_type_start() {
                fields.push(self.parse_type_annotation()?);
            }
        }
        Ok(Constructor {
            name,
            fields: self.ctx.alloc_annot_refs(fields),
            span: self.span_from(start),
        })
    }

    /// `id` or `'(' id ':' type ')'`.
    fn parse_param(&mut self) -> ParseResult<Param<'a>> {
        let start = self.peek().span.start;
        match self.peek_kind() {
            TokenKind::IdLower => {
                let name = self.advance().lexeme;
                Ok(Param {
                    name,
                    annotation: None,
                    span: self.span_from(start),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let name = self.expect(TokenKind::IdLower)?.lexeme;
                self.expect(TokenKind::Colon)?;
                let annotation = self.parse_type_annotation()?;
                self.expect(TokenKind::RParen)?;
                Ok(Param {
                    name,
                    annotation: Some(annotation),
                    span: self.span_from(start),
                })
            }
            found => Err(ParseError::new(
                ParseErrorKind::ExpectedParameter { found },
                self.peek().span,
            )),
        }
    }
}
