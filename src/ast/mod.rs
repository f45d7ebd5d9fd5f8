pub mod annotation;
pub mod def;
pub mod expr;
pub mod pattern;

pub use annotation::{AnnotationKind, TypeAnnotation, TypeTag};
pub use def::{Constructor, DefStmt, LetDef, LetDefKind, LetStmt, Param, TypeDef, TypeStmt};
pub use expr::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
pub use pattern::{Clause, Pattern, PatternKind};

/// A whole compilation unit: the definition statements of the root file
/// and everything it included, in stream order.
#[derive(Debug)]
pub struct Program<'a> {
    pub stmts: &'a [DefStmt<'a>],
}
