use super::annotation::TypeAnnotation;
use super::def::LetStmt;
use super::pattern::Clause;
use crate::intern::Symbol;
use crate::position::Span;

/// Literals keep their raw lexeme; numeric and escape decoding is left
/// to whoever consumes the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Unit,
    Int(Symbol),
    Float(Symbol),
    Char(Symbol),
    Bool(bool),
    Str(Symbol),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    FPlus,
    FMinus,
    Deref,
    Not,
    Delete,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::FPlus => "+.",
            UnaryOp::FMinus => "-.",
            UnaryOp::Deref => "!",
            UnaryOp::Not => "not",
            UnaryOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    FAdd,
    FSub,
    FMul,
    FDiv,
    Pow,
    /// Structural `=`.
    Eq,
    /// Structural `<>`.
    Neq,
    /// `==`.
    EqEq,
    /// `!=`.
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    AndAnd,
    OrOr,
    Semicolon,
    Assign,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "mod",
            BinaryOp::FAdd => "+.",
            BinaryOp::FSub => "-.",
            BinaryOp::FMul => "*.",
            BinaryOp::FDiv => "/.",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "<>",
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::AndAnd => "&&",
            BinaryOp::OrOr => "||",
            BinaryOp::Semicolon => ";",
            BinaryOp::Assign => ":=",
        }
    }
}

#[derive(Debug)]
pub struct Expr<'a> {
    pub kind: ExprKind<'a>,
    pub span: Span,
}

#[derive(Debug)]
pub enum ExprKind<'a> {
    Lit(Literal),
    /// `let ... in body`; the bindings scope over `body` only.
    LetIn {
        stmt: LetStmt<'a>,
        body: &'a Expr<'a>,
    },
    Unary {
        op: UnaryOp,
        operand: &'a Expr<'a>,
    },
    Binary {
        op: BinaryOp,
        lhs: &'a Expr<'a>,
        rhs: &'a Expr<'a>,
    },
    /// `new t` allocates a fresh `ref t`.
    New(&'a TypeAnnotation<'a>),
    While {
        cond: &'a Expr<'a>,
        body: &'a Expr<'a>,
    },
    For {
        var: Symbol,
        init: &'a Expr<'a>,
        ascending: bool,
        limit: &'a Expr<'a>,
        body: &'a Expr<'a>,
    },
    If {
        cond: &'a Expr<'a>,
        then_expr: &'a Expr<'a>,
        else_expr: Option<&'a Expr<'a>>,
    },
    /// `dim [k] id`: the k-th dimension of array `id`, 1-based.
    Dim {
        dim: u32,
        id: Symbol,
    },
    /// A bare identifier use; for zero-parameter functions this is the
    /// call form.
    IdCall(Symbol),
    Call {
        name: Symbol,
        args: &'a [&'a Expr<'a>],
    },
    ConstrCall {
        name: Symbol,
        args: &'a [&'a Expr<'a>],
    },
    ArrayAccess {
        name: Symbol,
        indexes: &'a [&'a Expr<'a>],
    },
    Match {
        scrutinee: &'a Expr<'a>,
        clauses: &'a [Clause<'a>],
    },
}
