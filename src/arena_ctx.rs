//! Allocation context threading the AST arenas through the parser.
//!
//! One arena per node type keeps every reference `&'a` into storage that
//! outlives the parser, so the tree can be walked freely by later phases
//! without reference counting. The context itself is `Copy` and cheap to
//! pass down the recursive descent.

use crate::arena::Arena;
use crate::ast::{
    Clause, Constructor, DefStmt, Expr, ExprKind, LetDef, Param, Pattern, TypeAnnotation, TypeDef,
};
use crate::position::Span;

#[derive(Clone, Copy)]
pub struct AstContext<'a> {
    pub exprs: &'a Arena<Expr<'a>>,
    pub expr_refs: &'a Arena<&'a Expr<'a>>,
    pub annots: &'a Arena<TypeAnnotation<'a>>,
    pub annot_refs: &'a Arena<&'a TypeAnnotation<'a>>,
    pub let_defs: &'a Arena<LetDef<'a>>,
    pub type_defs: &'a Arena<TypeDef<'a>>,
    pub constructors: &'a Arena<Constructor<'a>>,
    pub params: &'a Arena<Param<'a>>,
    pub patterns: &'a Arena<Pattern<'a>>,
    pub clauses: &'a Arena<Clause<'a>>,
    pub stmts: &'a Arena<DefStmt<'a>>,
}

/// Declares the arenas an [`AstContext`] borrows from and builds the
/// context, without spelling out every arena at the call site.
#[macro_export]
macro_rules! ast_arenas {
    ($ctx:ident) => {
        let exprs = $crate::arena::Arena::new();
        let expr_refs = $crate::arena::Arena::new();
        let annots = $crate::arena::Arena::new();
        let annot_refs = $crate::arena::Arena::new();
        let let_defs = $crate::arena::Arena::new();
        let type_defs = $crate::arena::Arena::new();
        let constructors = $crate::arena::Arena::new();
        let params = $crate::arena::Arena::new();
        let patterns = $crate::arena::Arena::new();
        let clauses = $crate::arena::Arena::new();
        let stmts = $crate::arena::Arena::new();
        let $ctx = $crate::arena_ctx::AstContext::new(
            &exprs,
            &expr_refs,
            &annots,
            &annot_refs,
            &let_defs,
            &type_defs,
            &constructors,
            &params,
            &patterns,
            &clauses,
            &stmts,
        );
    };
}

impl<'a> AstContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        exprs: &'a Arena<Expr<'a>>,
        expr_refs: &'a Arena<&'a Expr<'a>>,
        annots: &'a Arena<TypeAnnotation<'a>>,
        annot_refs: &'a Arena<&'a TypeAnnotation<'a>>,
        let_defs: &'a Arena<LetDef<'a>>,
        type_defs: &'a Arena<TypeDef<'a>>,
        constructors: &'a Arena<Constructor<'a>>,
        params: &'a Arena<Param<'a>>,
        patterns: &'a Arena<Pattern<'a>>,
        clauses: &'a Arena<Clause<'a>>,
        stmts: &'a Arena<DefStmt<'a>>,
    ) -> Self {
        AstContext {
            exprs,
            expr_refs,
            annots,
            annot_refs,
            let_defs,
            type_defs,
            constructors,
            params,
            patterns,
            clauses,
            stmts,
        }
    }

    #[inline(always)]
    pub fn expr(&self, kind: ExprKind<'a>, span: Span) -> &'a Expr<'a> {
        self.exprs.alloc(Expr { kind, span })
    }

    pub fn alloc_expr_refs<I>(&self, items: I) -> &'a [&'a Expr<'a>]
    where
        I: IntoIterator<Item = &'a Expr<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.expr_refs.alloc_slice(items)
    }

    #[inline(always)]
    pub fn annot(&self, annot: TypeAnnotation<'a>) -> &'a TypeAnnotation<'a> {
        self.annots.alloc(annot)
    }

    pub fn alloc_annot_refs<I>(&self, items: I) -> &'a [&'a TypeAnnotation<'a>]
    where
        I: IntoIterator<Item = &'a TypeAnnotation<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.annot_refs.alloc_slice(items)
    }

    pub fn alloc_let_defs<I>(&self, items: I) -> &'a [LetDef<'a>]
    where
        I: IntoIterator<Item = LetDef<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.let_defs.alloc_slice(items)
    }

    pub fn alloc_type_defs<I>(&self, items: I) -> &'a [TypeDef<'a>]
    where
        I: IntoIterator<Item = TypeDef<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.type_defs.alloc_slice(items)
    }

    pub fn alloc_constructors<I>(&self, items: I) -> &'a [Constructor<'a>]
    where
        I: IntoIterator<Item = Constructor<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.constructors.alloc_slice(items)
    }

    pub fn alloc_params<I>(&self, items: I) -> &'a [Param<'a>]
    where
        I: IntoIterator<Item = Param<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.params.alloc_slice(items)
    }

    pub fn alloc_patterns<I>(&self, items: I) -> &'a [Pattern<'a>]
    where
        I: IntoIterator<Item = Pattern<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.patterns.alloc_slice(items)
    }

    pub fn alloc_clauses<I>(&self, items: I) -> &'a [Clause<'a>]
    where
        I: IntoIterator<Item = Clause<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.clauses.alloc_slice(items)
    }

    pub fn alloc_stmts<I>(&self, items: I) -> &'a [DefStmt<'a>]
    where
        I: IntoIterator<Item = DefStmt<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.stmts.alloc_slice(items)
    }
}
