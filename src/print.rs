//! Dump passes for the `--print-*` options.
//!
//! The AST dump renders an indented tree with `│ ├─ └─` rails; each line
//! names the node kind and its key fields. The token dump prints one
//! token per line with its full span.

use crate::ast::{
    Clause, Constructor, DefStmt, Expr, ExprKind, LetDef, LetDefKind, LetStmt, Literal, Param,
    Pattern, PatternKind, Program, TypeAnnotation, AnnotationKind, TypeDef, TypeStmt,
};
use crate::diag::FileResolver;
use crate::intern::{Interner, Symbol};
use crate::token::Token;
use crate::types::{TypeArena, TypeHandle};

/// One token per line:
/// `<kind>: "<lexeme>" at <file>:<l1>:<c1>-<l2>:<c2>`.
pub fn dump_tokens(tokens: &[Token], interner: &Interner, files: &dyn FileResolver) -> String {
    let mut out = String::new();
    for token in tokens {
        let span = token.span;
        out.push_str(&format!(
            "{:?}: \"{}\" at {}:{}:{}-{}:{}\n",
            token.kind,
            interner.resolve(token.lexeme),
            files.file_name(span.start.file),
            span.start.line,
            span.start.col,
            span.end.line,
            span.end.col,
        ));
    }
    out
}

/// `name : type` per top-level binding.
pub fn dump_types(
    bindings: &[(Symbol, TypeHandle)],
    arena: &TypeArena,
    interner: &Interner,
) -> String {
    let mut out = String::new();
    for (name, ty) in bindings {
        out.push_str(&format!(
            "{} : {}\n",
            interner.resolve(*name),
            arena.display(*ty, interner)
        ));
    }
    out
}

pub fn dump_ast(program: &Program<'_>, interner: &Interner) -> String {
    let tree = program_node(program, interner);
    let mut out = String::new();
    out.push_str(&tree.label);
    out.push('\n');
    render_children(&tree.children, "", &mut out);
    out
}

struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: impl Into<String>) -> Node {
        Node {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn new(label: impl Into<String>, children: Vec<Node>) -> Node {
        Node {
            label: label.into(),
            children,
        }
    }
}

fn render_children(children: &[Node], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { " └─" } else { " ├─" });
        out.push_str(&child.label);
        out.push('\n');
        let deeper = format!("{}{}", prefix, if last { "  " } else { " │" });
        render_children(&child.children, &deeper, out);
    }
}

fn program_node(program: &Program<'_>, interner: &Interner) -> Node {
    Node::new(
        format!("Program ({} statements)", program.stmts.len()),
        program
            .stmts
            .iter()
            .map(|stmt| stmt_node(stmt, interner))
            .collect(),
    )
}

fn stmt_node(stmt: &DefStmt<'_>, interner: &Interner) -> Node {
    match stmt {
        DefStmt::Let(let_stmt) => let_stmt_node(let_stmt, interner),
        DefStmt::Type(type_stmt) => type_stmt_node(type_stmt, interner),
    }
}

fn let_stmt_node(stmt: &LetStmt<'_>, interner: &Interner) -> Node {
    let rec = if stmt.recursive {
        "recursive"
    } else {
        "non-recursive"
    };
    Node::new(
        format!("LetStmt ({} {} definitions)", rec, stmt.defs.len()),
        stmt.defs
            .iter()
            .map(|def| let_def_node(def, interner))
            .collect(),
    )
}

fn type_stmt_node(stmt: &TypeStmt<'_>, interner: &Interner) -> Node {
    Node::new(
        format!("TypeStmt ({} typedefs)", stmt.defs.len()),
        stmt.defs
            .iter()
            .map(|def| type_def_node(def, interner))
            .collect(),
    )
}

fn type_def_node(def: &TypeDef<'_>, interner: &Interner) -> Node {
    Node::new(
        format!(
            "TypeDef ({}, {} constructors)",
            interner.resolve(def.name),
            def.constructors.len()
        ),
        def.constructors
            .iter()
            .map(|constr| constructor_node(constr, interner))
            .collect(),
    )
}

fn constructor_node(constr: &Constructor<'_>, interner: &Interner) -> Node {
    Node::new(
        format!("Constructor ({})", interner.resolve(constr.name)),
        constr
            .fields
            .iter()
            .map(|field| annotation_node(field, interner))
            .collect(),
    )
}

fn let_def_node(def: &LetDef<'_>, interner: &Interner) -> Node {
    let name = interner.resolve(def.name);
    let mut children = Vec::new();
    if let Some(annot) = def.annotation {
        children.push(annotation_node(annot, interner));
    }
    let label = match &def.kind {
        LetDefKind::Constant { value } => {
            children.push(expr_node(value, interner));
            format!("Constant ({})", name)
        }
        LetDefKind::Function { params, body } => {
            for param in *params {
                children.push(param_node(param, interner));
            }
            children.push(expr_node(body, interner));
            format!("Function ({})", name)
        }
        LetDefKind::Array { dims } => {
            for dim in *dims {
                children.push(expr_node(dim, interner));
            }
            format!("Array ({})", name)
        }
        LetDefKind::Variable => format!("Variable ({})", name),
    };
    Node::new(label, children)
}

fn param_node(param: &Param<'_>, interner: &Interner) -> Node {
    let mut children = Vec::new();
    if let Some(annot) = param.annotation {
        children.push(annotation_node(annot, interner));
    }
    Node::new(
        format!("Param ({})", interner.resolve(param.name)),
        children,
    )
}

fn annotation_node(annot: &TypeAnnotation<'_>, interner: &Interner) -> Node {
    match &annot.kind {
        AnnotationKind::Basic(tag) => Node::leaf(format!("BasicType ({})", tag.name())),
        AnnotationKind::Func { lhs, rhs } => Node::new(
            "FunctionType".to_string(),
            vec![
                annotation_node(lhs, interner),
                annotation_node(rhs, interner),
            ],
        ),
        AnnotationKind::Array { rank, elem } => Node::new(
            format!("ArrayType ({})", rank),
            vec![annotation_node(elem, interner)],
        ),
        AnnotationKind::Ref(elem) => {
            Node::new("RefType".to_string(), vec![annotation_node(elem, interner)])
        }
        AnnotationKind::Custom(name) => {
            Node::leaf(format!("CustomType ({})", interner.resolve(*name)))
        }
    }
}

fn literal_node(lit: &Literal, interner: &Interner) -> Node {
    match lit {
        Literal::Unit => Node::leaf("Unit literal"),
        Literal::Bool(value) => Node::leaf(format!("Bool literal ({})", value)),
        Literal::Int(sym) => Node::leaf(format!("Int literal ({})", interner.resolve(*sym))),
        Literal::Float(sym) => {
            Node::leaf(format!("Float literal ({})", interner.resolve(*sym)))
        }
        Literal::Char(sym) => Node::leaf(format!("Char literal ({})", interner.resolve(*sym))),
        Literal::Str(sym) => {
            Node::leaf(format!("String literal ({})", interner.resolve(*sym)))
        }
    }
}

fn expr_node(expr: &Expr<'_>, interner: &Interner) -> Node {
    match &expr.kind {
        ExprKind::Lit(lit) => literal_node(lit, interner),
        ExprKind::LetIn { stmt, body } => Node::new(
            "LetIn".to_string(),
            vec![let_stmt_node(stmt, interner), expr_node(body, interner)],
        ),
        ExprKind::Unary { op, operand } => Node::new(
            format!("Unary operator ({})", op.symbol()),
            vec![expr_node(operand, interner)],
        ),
        ExprKind::Binary { op, lhs, rhs } => Node::new(
            format!("Binary operator ({})", op.symbol()),
            vec![expr_node(lhs, interner), expr_node(rhs, interner)],
        ),
        ExprKind::New(annot) => {
            Node::new("New".to_string(), vec![annotation_node(annot, interner)])
        }
        ExprKind::While { cond, body } => Node::new(
            "While".to_string(),
            vec![expr_node(cond, interner), expr_node(body, interner)],
        ),
        ExprKind::For {
            var,
            init,
            ascending,
            limit,
            body,
        } => Node::new(
            "For".to_string(),
            vec![
                Node::leaf(format!("Id {}", interner.resolve(*var))),
                expr_node(init, interner),
                Node::leaf(if *ascending { "to" } else { "downto" }),
                expr_node(limit, interner),
                expr_node(body, interner),
            ],
        ),
        ExprKind::If {
            cond,
            then_expr,
            else_expr,
        } => {
            let mut children = vec![expr_node(cond, interner), expr_node(then_expr, interner)];
            if let Some(else_expr) = else_expr {
                children.push(expr_node(else_expr, interner));
            }
            Node::new("If".to_string(), children)
        }
        ExprKind::Dim { dim, id } => Node::new(
            format!("Dim (on {})", interner.resolve(*id)),
            vec![Node::leaf(format!("Int literal ({})", dim))],
        ),
        ExprKind::IdCall(name) => Node::leaf(format!("IdCall ({})", interner.resolve(*name))),
        ExprKind::Call { name, args } => Node::new(
            format!("FuncCall ({})", interner.resolve(*name)),
            args.iter().map(|arg| expr_node(arg, interner)).collect(),
        ),
        ExprKind::ConstrCall { name, args } => Node::new(
            format!("ConstrCall ({})", interner.resolve(*name)),
            args.iter().map(|arg| expr_node(arg, interner)).collect(),
        ),
        ExprKind::ArrayAccess { name, indexes } => Node::new(
            format!("ArrayAccess ({})", interner.resolve(*name)),
            indexes.iter().map(|ix| expr_node(ix, interner)).collect(),
        ),
        ExprKind::Match { scrutinee, clauses } => {
            let mut children = vec![expr_node(scrutinee, interner)];
            children.extend(clauses.iter().map(|c| clause_node(c, interner)));
            Node::new("Match".to_string(), children)
        }
    }
}

fn clause_node(clause: &Clause<'_>, interner: &Interner) -> Node {
    Node::new(
        "Clause".to_string(),
        vec![
            pattern_node(&clause.pattern, interner),
            expr_node(clause.body, interner),
        ],
    )
}

fn pattern_node(pattern: &Pattern<'_>, interner: &Interner) -> Node {
    match &pattern.kind {
        PatternKind::Literal(lit) => {
            Node::new("PatLiteral".to_string(), vec![literal_node(lit, interner)])
        }
        PatternKind::Id(name) => Node::leaf(format!("PatId ({})", interner.resolve(*name))),
        PatternKind::Constr { name, args } => Node::new(
            format!("PatConstr ({})", interner.resolve(*name)),
            args.iter().map(|arg| pattern_node(arg, interner)).collect(),
        ),
    }
}
