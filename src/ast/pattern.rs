use super::expr::{Expr, Literal};
use crate::intern::Symbol;
use crate::position::Span;

#[derive(Debug)]
pub struct Pattern<'a> {
    pub kind: PatternKind<'a>,
    pub span: Span,
}

#[derive(Debug)]
pub enum PatternKind<'a> {
    Literal(Literal),
    /// A lowercase identifier; binds the scrutinee in the clause body.
    Id(Symbol),
    /// `Constr p1 p2 ...`; arity must match the constructor exactly.
    Constr {
        name: Symbol,
        args: &'a [Pattern<'a>],
    },
}

/// One `pattern -> body` arm of a `match` expression.
#[derive(Debug)]
pub struct Clause<'a> {
    pub pattern: Pattern<'a>,
    pub body: &'a Expr<'a>,
    pub span: Span,
}
