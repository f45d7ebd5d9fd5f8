//! Semantic analysis: name resolution and type inference.
//!
//! One pass over the AST. Type statements register their names first and
//! build constructors second, so constructor fields may refer to any
//! type in the same `and` group. `let rec` groups pre-install every
//! bound name with a fresh inference variable before any body is
//! visited; plain `let` groups make each definition visible only to the
//! ones after it.
//!
//! All diagnostics go to the shared sink; inference keeps going after an
//! error by substituting fresh unknowns, so one run surfaces as many
//! genuine type errors as possible.

mod tables;

#[cfg(test)]
mod tests;

pub use tables::SymbolTable;

use std::collections::{HashMap, HashSet};

use crate::ast::{
    AnnotationKind, BinaryOp, Clause, DefStmt, Expr, ExprKind, LetDef, LetDefKind, LetStmt,
    Literal, Pattern, PatternKind, Program, TypeAnnotation, TypeStmt, TypeTag, UnaryOp,
};
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::intern::{Interner, Symbol};
use crate::position::Span;
use crate::types::{Ty, TypeArena, TypeCell, TypeHandle, UnifyError};

pub struct Typer<'d, 'i> {
    pub arena: TypeArena,
    symbols: SymbolTable,
    type_names: HashMap<Symbol, TypeHandle>,
    constructor_names: HashMap<Symbol, TypeHandle>,
    diags: &'d mut Diagnostics,
    interner: &'i Interner,
    bindings: Vec<(Symbol, TypeHandle)>,
}

impl<'d, 'i> Typer<'d, 'i> {
    pub fn new(diags: &'d mut Diagnostics, interner: &'i Interner) -> Self {
        Typer {
            arena: TypeArena::new(),
            symbols: SymbolTable::new(),
            type_names: HashMap::new(),
            constructor_names: HashMap::new(),
            diags,
            interner,
            bindings: Vec::new(),
        }
    }

    /// Top-level bindings in order of definition, for `--print-types`.
    pub fn bindings(&self) -> &[(Symbol, TypeHandle)] {
        &self.bindings
    }

    pub fn check_program(&mut self, program: &Program<'_>) {
        log::trace!("typer: checking program");
        for stmt in program.stmts {
            if self.diags.should_abort() {
                return;
            }
            match stmt {
                DefStmt::Type(type_stmt) => self.check_type_stmt(type_stmt),
                DefStmt::Let(let_stmt) => {
                    self.check_let_stmt(let_stmt);
                    for def in let_stmt.defs {
                        if let Some(ty) = self.symbols.lookup(def.name) {
                            self.bindings.push((def.name, ty));
                        }
                    }
                }
            }
        }
    }

    // ---- type statements ----

    fn check_type_stmt(&mut self, stmt: &TypeStmt<'_>) {
        // Pass 1: register every name as an empty shell so constructor
        // fields can refer to any type in the group.
        let mut owners = Vec::with_capacity(stmt.defs.len());
        for def in stmt.defs {
            if self.type_names.contains_key(&def.name) {
                self.name_error(
                    def.span,
                    format!("type '{}' is already defined", self.resolve(def.name)),
                );
                owners.push(None);
                continue;
            }
            let handle = self.arena.alloc(Ty::Custom {
                name: def.name,
                constructors: Vec::new(),
            });
            self.type_names.insert(def.name, handle);
            owners.push(Some(handle));
        }

        // Pass 2: build and register the constructors.
        for (def, owner) in stmt.defs.iter().zip(owners) {
            let owner = match owner {
                Some(owner) => owner,
                None => continue,
            };
            let mut constructors = Vec::with_capacity(def.constructors.len());
            for constr in def.constructors {
                let fields: Vec<TypeHandle> = constr
                    .fields
                    .iter()
                    .map(|f| self.resolve_annotation(f))
                    .collect();
                if self.constructor_names.contains_key(&constr.name) {
                    self.name_error(
                        constr.span,
                        format!(
                            "constructor '{}' is already defined",
                            self.resolve(constr.name)
                        ),
                    );
                    continue;
                }
                let handle = self.arena.alloc(Ty::Constr {
                    name: constr.name,
                    owner,
                    fields,
                });
                self.constructor_names.insert(constr.name, handle);
                constructors.push(handle);
            }
            self.arena.set_constructors(owner, constructors);
        }
    }

    // ---- let statements ----

    fn check_let_stmt(&mut self, stmt: &LetStmt<'_>) {
        let mut seen = HashSet::new();
        for def in stmt.defs {
            if !seen.insert(def.name) {
                self.name_error(
                    def.span,
                    format!(
                        "duplicate definition of '{}' in this binding group",
                        self.resolve(def.name)
                    ),
                );
            }
        }

        if stmt.recursive {
            let pre: Vec<TypeHandle> = stmt
                .defs
                .iter()
                .map(|_| self.arena.fresh_unknown())
                .collect();
            for (def, &handle) in stmt.defs.iter().zip(&pre) {
                self.symbols.insert(def.name, handle);
            }
            for (def, &handle) in stmt.defs.iter().zip(&pre) {
                let ty = self.check_let_def(def);
                self.unify_or_report(handle, ty, def.span, "recursive definition");
            }
        } else {
            for def in stmt.defs {
                let ty = self.check_let_def(def);
                self.symbols.insert(def.name, ty);
            }
        }
    }

    fn check_let_def(&mut self, def: &LetDef<'_>) -> TypeHandle {
        log::trace!("typer: checking definition '{}'", self.resolve(def.name));
        match &def.kind {
            LetDefKind::Constant { value } => {
                let ty = self.infer_expr(value);
                if let Some(annot) = def.annotation {
                    let expected = self.resolve_annotation(annot);
                    self.unify_or_report(ty, expected, def.span, "type annotation");
                }
                ty
            }
            LetDefKind::Function { params, body } => {
                self.symbols.open_scope();
                let mut param_types = Vec::with_capacity(params.len());
                for param in *params {
                    let ty = match param.annotation {
                        Some(annot) => self.resolve_annotation(annot),
                        None => self.arena.fresh_unknown(),
                    };
                    if !self.symbols.insert(param.name, ty) {
                        self.name_error(
                            param.span,
                            format!("duplicate parameter '{}'", self.resolve(param.name)),
                        );
                    }
                    param_types.push(ty);
                }
                let ret = self.infer_expr(body);
                self.symbols.close_scope();
                if let Some(annot) = def.annotation {
                    let expected = self.resolve_annotation(annot);
                    self.unify_or_report(ret, expected, def.span, "return type annotation");
                }
                self.arena.alloc(Ty::Func {
                    params: param_types,
                    ret,
                })
            }
            LetDefKind::Array { dims } => {
                self.symbols.open_scope();
                for dim in *dims {
                    let ty = self.infer_expr(dim);
                    let int = self.arena.int();
                    self.unify_or_report(ty, int, dim.span, "array dimension");
                }
                self.symbols.close_scope();
                let elem = match def.annotation {
                    Some(annot) => self.resolve_annotation(annot),
                    None => self.arena.fresh_unknown(),
                };
                self.arena.alloc(Ty::Array {
                    elem,
                    rank: dims.len() as u32,
                    rank_exact: true,
                })
            }
            LetDefKind::Variable => {
                let elem = match def.annotation {
                    Some(annot) => self.resolve_annotation(annot),
                    None => self.arena.fresh_unknown(),
                };
                self.arena.alloc(Ty::Ref(elem))
            }
        }
    }

    // ---- annotations ----

    fn resolve_annotation(&mut self, annot: &TypeAnnotation<'_>) -> TypeHandle {
        match &annot.kind {
            AnnotationKind::Basic(tag) => self.tag_type(*tag),
            AnnotationKind::Func { lhs, rhs } => {
                // `a -> b -> c` becomes the explicit multi-parameter
                // form ([a, b], c); arities unify exactly.
                let mut params = vec![self.resolve_annotation(lhs)];
                let mut cur = *rhs;
                while let AnnotationKind::Func { lhs, rhs } = &cur.kind {
                    params.push(self.resolve_annotation(lhs));
                    cur = rhs;
                }
                let ret = self.resolve_annotation(cur);
                self.arena.alloc(Ty::Func { params, ret })
            }
            AnnotationKind::Array { rank, elem } => {
                let elem = self.resolve_annotation(elem);
                self.arena.alloc(Ty::Array {
                    elem,
                    rank: *rank,
                    rank_exact: true,
                })
            }
            AnnotationKind::Ref(elem) => {
                let elem = self.resolve_annotation(elem);
                self.arena.alloc(Ty::Ref(elem))
            }
            AnnotationKind::Custom(name) => match self.type_names.get(name) {
                Some(&handle) => handle,
                None => {
                    self.name_error(
                        annot.span,
                        format!("unknown type name '{}'", self.resolve(*name)),
                    );
                    self.arena.fresh_unknown()
                }
            },
        }
    }

    fn tag_type(&self, tag: TypeTag) -> TypeHandle {
        match tag {
            TypeTag::Unit => self.arena.unit(),
            TypeTag::Int => self.arena.int(),
            TypeTag::Char => self.arena.char(),
            TypeTag::Bool => self.arena.bool(),
            TypeTag::Float => self.arena.float(),
        }
    }

    // ---- expressions ----

    fn infer_expr(&mut self, expr: &Expr<'_>) -> TypeHandle {
        match &expr.kind {
            ExprKind::Lit(lit) => self.literal_type(*lit),
            ExprKind::LetIn { stmt, body } => {
                self.symbols.open_scope();
                self.check_let_stmt(stmt);
                let ty = self.infer_expr(body);
                self.symbols.close_scope();
                ty
            }
            ExprKind::Unary { op, operand } => self.infer_unary(*op, operand, expr.span),
            ExprKind::Binary { op, lhs, rhs } => self.infer_binary(*op, lhs, rhs, expr.span),
            ExprKind::New(annot) => {
                let ty = self.resolve_annotation(annot);
                self.arena.alloc(Ty::Ref(ty))
            }
            ExprKind::While { cond, body } => {
                let tc = self.infer_expr(cond);
                let bool_ = self.arena.bool();
                self.unify_or_report(tc, bool_, cond.span, "while condition");
                let tb = self.infer_expr(body);
                let unit = self.arena.unit();
                self.unify_or_report(tb, unit, body.span, "while body");
                unit
            }
            ExprKind::For {
                var,
                init,
                limit,
                body,
                ..
            } => {
                let int = self.arena.int();
                let ti = self.infer_expr(init);
                self.unify_or_report(ti, int, init.span, "for bound");
                let tl = self.infer_expr(limit);
                self.unify_or_report(tl, int, limit.span, "for bound");
                self.symbols.open_scope();
                self.symbols.insert(*var, int);
                let tb = self.infer_expr(body);
                self.symbols.close_scope();
                let unit = self.arena.unit();
                self.unify_or_report(tb, unit, body.span, "for body");
                unit
            }
            ExprKind::If {
                cond,
                then_expr,
                else_expr,
            } => {
                let tc = self.infer_expr(cond);
                let bool_ = self.arena.bool();
                self.unify_or_report(tc, bool_, cond.span, "if condition");
                let tt = self.infer_expr(then_expr);
                match else_expr {
                    Some(else_expr) => {
                        let te = self.infer_expr(else_expr);
                        self.unify_or_report(tt, te, expr.span, "if branches");
                        tt
                    }
                    None => {
                        let unit = self.arena.unit();
                        self.unify_or_report(tt, unit, then_expr.span, "if without else");
                        unit
                    }
                }
            }
            ExprKind::Dim { dim, id } => self.infer_dim(*dim, *id, expr.span),
            ExprKind::IdCall(name) => self.infer_id_call(*name, expr.span),
            ExprKind::Call { name, args } => self.infer_call(*name, args, expr.span),
            ExprKind::ConstrCall { name, args } => self.infer_constr_call(*name, args, expr.span),
            ExprKind::ArrayAccess { name, indexes } => {
                self.infer_array_access(*name, indexes, expr.span)
            }
            ExprKind::Match { scrutinee, clauses } => self.infer_match(scrutinee, clauses),
        }
    }

    fn literal_type(&mut self, lit: Literal) -> TypeHandle {
        match lit {
            Literal::Unit => self.arena.unit(),
            Literal::Int(_) => self.arena.int(),
            Literal::Float(_) => self.arena.float(),
            Literal::Char(_) => self.arena.char(),
            Literal::Bool(_) => self.arena.bool(),
            // A string literal is a one-dimensional character array.
            Literal::Str(_) => {
                let char_ = self.arena.char();
                self.arena.alloc(Ty::Array {
                    elem: char_,
                    rank: 1,
                    rank_exact: true,
                })
            }
        }
    }

    fn infer_unary(&mut self, op: UnaryOp, operand: &Expr<'_>, span: Span) -> TypeHandle {
        let ty = self.infer_expr(operand);
        match op {
            UnaryOp::Plus | UnaryOp::Minus => {
                let int = self.arena.int();
                self.expect_operand(ty, int, operand.span, op.symbol());
                int
            }
            UnaryOp::FPlus | UnaryOp::FMinus => {
                let float = self.arena.float();
                self.expect_operand(ty, float, operand.span, op.symbol());
                float
            }
            UnaryOp::Not => {
                let bool_ = self.arena.bool();
                self.expect_operand(ty, bool_, operand.span, op.symbol());
                bool_
            }
            UnaryOp::Deref => {
                let elem = self.arena.fresh_unknown();
                let expected = self.arena.alloc(Ty::Ref(elem));
                if !self.unify_quiet(ty, expected) {
                    self.type_error(
                        span,
                        format!(
                            "operator '!' needs a reference, found {}",
                            self.arena.display(ty, self.interner)
                        ),
                    );
                }
                elem
            }
            UnaryOp::Delete => {
                let unit = self.arena.unit();
                match self.arena.cell(ty).clone() {
                    TypeCell::Concrete(Ty::Ref(_)) | TypeCell::Concrete(Ty::Array { .. }) => unit,
                    TypeCell::Unknown { .. } => {
                        // Unconstrained operand: commit to the ref reading.
                        let elem = self.arena.fresh_unknown();
                        let expected = self.arena.alloc(Ty::Ref(elem));
                        self.unify_quiet(ty, expected);
                        unit
                    }
                    _ => {
                        self.type_error(
                            span,
                            format!(
                                "'delete' needs a reference or an array, found {}",
                                self.arena.display(ty, self.interner)
                            ),
                        );
                        unit
                    }
                }
            }
        }
    }

    fn infer_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr<'_>,
        rhs: &Expr<'_>,
        span: Span,
    ) -> TypeHandle {
        use BinaryOp::*;
        let tl = self.infer_expr(lhs);
        let tr = self.infer_expr(rhs);
        match op {
            Add | Sub | Mul | Div | Mod => {
                let int = self.arena.int();
                self.expect_operand(tl, int, lhs.span, op.symbol());
                self.expect_operand(tr, int, rhs.span, op.symbol());
                int
            }
            FAdd | FSub | FMul | FDiv | Pow => {
                let float = self.arena.float();
                self.expect_operand(tl, float, lhs.span, op.symbol());
                self.expect_operand(tr, float, rhs.span, op.symbol());
                float
            }
            Eq | Neq | EqEq | NotEq => {
                self.unify_or_report(tl, tr, span, "equality operands");
                if self.is_array_or_function(tl) || self.is_array_or_function(tr) {
                    self.type_error(
                        span,
                        format!(
                            "operator '{}' cannot compare arrays or functions",
                            op.symbol()
                        ),
                    );
                }
                self.arena.bool()
            }
            Lt | Gt | Le | Ge => {
                self.unify_or_report(tl, tr, span, "comparison operands");
                self.expect_ordered(tl, span, op);
                self.arena.bool()
            }
            AndAnd | OrOr => {
                let bool_ = self.arena.bool();
                self.expect_operand(tl, bool_, lhs.span, op.symbol());
                self.expect_operand(tr, bool_, rhs.span, op.symbol());
                bool_
            }
            Semicolon => tr,
            Assign => {
                let expected = self.arena.alloc(Ty::Ref(tr));
                if !self.unify_quiet(tl, expected) {
                    self.type_error(
                        span,
                        format!(
                            "operator ':=' needs a '{} ref' on the left, found {}",
                            self.arena.display(tr, self.interner),
                            self.arena.display(tl, self.interner)
                        ),
                    );
                }
                self.arena.unit()
            }
        }
    }

    /// `< > <= >=` operands must be int, char, or float. An operand
    /// that is still unknown defaults to int.
    fn expect_ordered(&mut self, ty: TypeHandle, span: Span, op: BinaryOp) {
        match self.arena.cell(ty).clone() {
            TypeCell::Concrete(Ty::Int) | TypeCell::Concrete(Ty::Char)
            | TypeCell::Concrete(Ty::Float) => {}
            TypeCell::Unknown { .. } => {
                let int = self.arena.int();
                self.unify_quiet(ty, int);
            }
            _ => {
                self.type_error(
                    span,
                    format!(
                        "operator '{}' orders int, char, or float, found {}",
                        op.symbol(),
                        self.arena.display(ty, self.interner)
                    ),
                );
            }
        }
    }

    fn infer_dim(&mut self, dim: u32, id: Symbol, span: Span) -> TypeHandle {
        let int = self.arena.int();
        if dim == 0 {
            self.type_error(span, "dimension index must be positive".to_string());
            return int;
        }
        let Some(ty) = self.lookup_value(id, span) else {
            return int;
        };
        let elem = self.arena.fresh_unknown();
        let expected = self.arena.alloc(Ty::Array {
            elem,
            rank: dim,
            rank_exact: false,
        });
        if !self.unify_quiet(ty, expected) {
            self.type_error(
                span,
                format!(
                    "'dim {}' needs an array of rank at least {}, found {}",
                    dim,
                    dim,
                    self.arena.display(ty, self.interner)
                ),
            );
        }
        int
    }

    fn infer_id_call(&mut self, name: Symbol, span: Span) -> TypeHandle {
        let Some(ty) = self.lookup_value(name, span) else {
            return self.arena.fresh_unknown();
        };
        // A use of a zero-parameter function invokes it.
        if let TypeCell::Concrete(Ty::Func { params, ret }) = self.arena.cell(ty) {
            if params.is_empty() {
                return *ret;
            }
        }
        ty
    }

    fn infer_call(&mut self, name: Symbol, args: &[&Expr<'_>], span: Span) -> TypeHandle {
        let callee = self.lookup_value(name, span);
        let arg_types: Vec<TypeHandle> = args.iter().map(|arg| self.infer_expr(arg)).collect();
        let Some(callee) = callee else {
            return self.arena.fresh_unknown();
        };
        let ret = self.arena.fresh_unknown();
        let expected = self.arena.alloc(Ty::Func {
            params: arg_types,
            ret,
        });
        match self.arena.unify(callee, expected) {
            Ok(()) => {}
            Err(UnifyError::Arity(_, _)) => {
                let arity = match self.arena.cell(callee) {
                    TypeCell::Concrete(Ty::Func { params, .. }) => params.len(),
                    _ => 0,
                };
                self.type_error(
                    span,
                    format!(
                        "function '{}' expects {} argument(s), got {}",
                        self.resolve(name),
                        arity,
                        args.len()
                    ),
                );
            }
            Err(err) => self.report_unify(err, span, "function application"),
        }
        ret
    }

    fn infer_constr_call(&mut self, name: Symbol, args: &[&Expr<'_>], span: Span) -> TypeHandle {
        let arg_types: Vec<TypeHandle> = args.iter().map(|arg| self.infer_expr(arg)).collect();
        let Some(&constr) = self.constructor_names.get(&name) else {
            self.name_error(
                span,
                format!("undefined constructor '{}'", self.resolve(name)),
            );
            return self.arena.fresh_unknown();
        };
        let (owner, fields) = match self.arena.cell(constr) {
            TypeCell::Concrete(Ty::Constr { owner, fields, .. }) => (*owner, fields.clone()),
            _ => panic!("constructor table holds a non-constructor cell"),
        };
        if fields.len() != arg_types.len() {
            self.name_error(
                span,
                format!(
                    "constructor '{}' expects {} argument(s), got {}",
                    self.resolve(name),
                    fields.len(),
                    arg_types.len()
                ),
            );
            return owner;
        }
        for ((field, arg_ty), arg) in fields.iter().zip(&arg_types).zip(args) {
            self.unify_or_report(*arg_ty, *field, arg.span, "constructor argument");
        }
        owner
    }

    fn infer_array_access(
        &mut self,
        name: Symbol,
        indexes: &[&Expr<'_>],
        span: Span,
    ) -> TypeHandle {
        let int = self.arena.int();
        for index in indexes {
            let ty = self.infer_expr(index);
            self.unify_or_report(ty, int, index.span, "array index");
        }
        let elem = self.arena.fresh_unknown();
        let Some(ty) = self.lookup_value(name, span) else {
            return self.arena.alloc(Ty::Ref(elem));
        };
        let expected = self.arena.alloc(Ty::Array {
            elem,
            rank: indexes.len() as u32,
            rank_exact: false,
        });
        if !self.unify_quiet(ty, expected) {
            self.type_error(
                span,
                format!(
                    "'{}' is not an array of rank at least {}: found {}",
                    self.resolve(name),
                    indexes.len(),
                    self.arena.display(ty, self.interner)
                ),
            );
        }
        // Indexing yields a mutable cell.
        self.arena.alloc(Ty::Ref(elem))
    }

    fn infer_match(&mut self, scrutinee: &Expr<'_>, clauses: &[Clause<'_>]) -> TypeHandle {
        let scrutinee_ty = self.infer_expr(scrutinee);
        let result = self.arena.fresh_unknown();
        for clause in clauses {
            self.symbols.open_scope();
            let pattern_ty = self.check_pattern(&clause.pattern);
            self.unify_or_report(
                scrutinee_ty,
                pattern_ty,
                clause.pattern.span,
                "match pattern",
            );
            let body_ty = self.infer_expr(clause.body);
            self.unify_or_report(result, body_ty, clause.body.span, "match arms");
            self.symbols.close_scope();
        }
        result
    }

    fn check_pattern(&mut self, pattern: &Pattern<'_>) -> TypeHandle {
        match &pattern.kind {
            PatternKind::Literal(lit) => self.literal_type(*lit),
            PatternKind::Id(name) => {
                let ty = self.arena.fresh_unknown();
                if !self.symbols.insert(*name, ty) {
                    self.name_error(
                        pattern.span,
                        format!(
                            "pattern binds '{}' more than once",
                            self.resolve(*name)
                        ),
                    );
                }
                ty
            }
            PatternKind::Constr { name, args } => {
                let Some(&constr) = self.constructor_names.get(name) else {
                    self.name_error(
                        pattern.span,
                        format!("undefined constructor '{}'", self.resolve(*name)),
                    );
                    for arg in *args {
                        self.check_pattern(arg);
                    }
                    return self.arena.fresh_unknown();
                };
                let (owner, fields) = match self.arena.cell(constr) {
                    TypeCell::Concrete(Ty::Constr { owner, fields, .. }) => {
                        (*owner, fields.clone())
                    }
                    _ => panic!("constructor table holds a non-constructor cell"),
                };
                if fields.len() != args.len() {
                    self.name_error(
                        pattern.span,
                        format!(
                            "constructor '{}' expects {} argument(s) in pattern, got {}",
                            self.resolve(*name),
                            fields.len(),
                            args.len()
                        ),
                    );
                    // Still bind the subpattern variables so the clause
                    // body does not cascade into undefined-name errors.
                    for arg in *args {
                        self.check_pattern(arg);
                    }
                    return owner;
                }
                for (field, arg) in fields.iter().zip(*args) {
                    let arg_ty = self.check_pattern(arg);
                    self.unify_or_report(arg_ty, *field, arg.span, "constructor pattern");
                }
                owner
            }
        }
    }

    // ---- shared plumbing ----

    fn lookup_value(&mut self, name: Symbol, span: Span) -> Option<TypeHandle> {
        match self.symbols.lookup(name) {
            Some(ty) => Some(ty),
            None => {
                self.name_error(
                    span,
                    format!("undefined identifier '{}'", self.resolve(name)),
                );
                None
            }
        }
    }

    fn is_array_or_function(&self, ty: TypeHandle) -> bool {
        matches!(
            self.arena.cell(ty),
            TypeCell::Concrete(Ty::Array { .. }) | TypeCell::Concrete(Ty::Func { .. })
        )
    }

    fn expect_operand(&mut self, found: TypeHandle, expected: TypeHandle, span: Span, op: &str) {
        if !self.unify_quiet(found, expected) {
            self.type_error(
                span,
                format!(
                    "operator '{}' expects {} operands, found {}",
                    op,
                    self.arena.display(expected, self.interner),
                    self.arena.display(found, self.interner)
                ),
            );
        }
    }

    fn unify_quiet(&mut self, a: TypeHandle, b: TypeHandle) -> bool {
        self.arena.unify(a, b).is_ok()
    }

    fn unify_or_report(
        &mut self,
        a: TypeHandle,
        b: TypeHandle,
        span: Span,
        what: &str,
    ) -> bool {
        match self.arena.unify(a, b) {
            Ok(()) => true,
            Err(err) => {
                self.report_unify(err, span, what);
                false
            }
        }
    }

    fn report_unify(&mut self, err: UnifyError, span: Span, what: &str) {
        let message = match err {
            UnifyError::Mismatch(a, b) => format!(
                "type mismatch in {}: {} vs {}",
                what,
                self.arena.display(a, self.interner),
                self.arena.display(b, self.interner)
            ),
            UnifyError::Occurs(var, ty) => format!(
                "recursive type in {}: {} occurs within {}",
                what,
                self.arena.display(var, self.interner),
                self.arena.display(ty, self.interner)
            ),
            UnifyError::Arity(a, b) => format!(
                "function arities differ in {}: {} vs {}",
                what,
                self.arena.display(a, self.interner),
                self.arena.display(b, self.interner)
            ),
        };
        self.type_error(span, message);
    }

    fn type_error(&mut self, span: Span, message: String) {
        self.diags.error(DiagnosticKind::Type, span, message);
    }

    fn name_error(&mut self, span: Span, message: String) {
        self.diags
            .error(DiagnosticKind::NameResolution, span, message);
    }

    fn resolve(&self, name: Symbol) -> &'i str {
        self.interner.resolve(name)
    }
}
