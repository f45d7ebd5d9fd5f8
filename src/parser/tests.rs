use super::*;
use crate::ast::{
    AnnotationKind, BinaryOp, DefStmt, ExprKind, LetDefKind, Literal, PatternKind, Program,
    TypeTag, UnaryOp,
};
use crate::ast_arenas;

fn with_program<F>(source: &str, f: F)
where
    F: FnOnce(&Program<'_>, &Interner, &Diagnostics),
{
    let mut diags = Diagnostics::new(false);
    let sm = crate::source::SourceManager::from_source("test.lla", source, &mut diags);
    let mut interner = Interner::new();
    ast_arenas!(ctx);
    let lexer = Lexer::new(&sm);
    let mut parser = Parser::new(lexer, &mut interner, &mut diags, ctx);
    let program = parser.parse_program();
    drop(parser);
    f(&program, &interner, &diags);
}

fn first_let<'p, 'a>(program: &'p Program<'a>) -> &'p crate::ast::LetStmt<'a> {
    match &program.stmts[0] {
        DefStmt::Let(stmt) => stmt,
        other => panic!("expected a let statement, got {:?}", other),
    }
}

fn constant_value<'p, 'a>(program: &'p Program<'a>) -> &'a crate::ast::Expr<'a> {
    match &first_let(program).defs[0].kind {
        LetDefKind::Constant { value } => *value,
        other => panic!("expected a constant, got {:?}", other),
    }
}

#[test]
fn constant_definition() {
    with_program("let x = 42", |program, interner, diags| {
        assert!(!diags.has_errors());
        let stmt = first_let(program);
        assert!(!stmt.recursive);
        assert_eq!(stmt.defs.len(), 1);
        let def = &stmt.defs[0];
        assert_eq!(interner.resolve(def.name), "x");
        match &def.kind {
            LetDefKind::Constant { value } => match value.kind {
                ExprKind::Lit(Literal::Int(sym)) => {
                    assert_eq!(interner.resolve(sym), "42")
                }
                ref other => panic!("expected int literal, got {:?}", other),
            },
            other => panic!("expected constant, got {:?}", other),
        }
    });
}

#[test]
fn function_definition_collects_params() {
    with_program("let add a b = a + b", |program, interner, diags| {
        assert!(!diags.has_errors());
        let def = &first_let(program).defs[0];
        match &def.kind {
            LetDefKind::Function { params, body } => {
                assert_eq!(params.len(), 2);
                assert_eq!(interner.resolve(params[0].name), "a");
                assert_eq!(interner.resolve(params[1].name), "b");
                assert!(matches!(
                    body.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Add,
                        ..
                    }
                ));
            }
            other => panic!("expected function, got {:?}", other),
        }
    });
}

#[test]
fn annotated_param_and_return_type() {
    with_program("let inc (x : int) : int = x + 1", |program, _, diags| {
        assert!(!diags.has_errors());
        let def = &first_let(program).defs[0];
        let annot = def.annotation.expect("return annotation");
        assert!(matches!(annot.kind, AnnotationKind::Basic(TypeTag::Int)));
        match &def.kind {
            LetDefKind::Function { params, .. } => {
                let p = params[0].annotation.expect("param annotation");
                assert!(matches!(p.kind, AnnotationKind::Basic(TypeTag::Int)));
            }
            other => panic!("expected function, got {:?}", other),
        }
    });
}

#[test]
fn rec_flag_and_and_groups() {
    with_program(
        "let rec even n = odd (n - 1) and odd n = even (n - 1)",
        |program, _, diags| {
            assert!(!diags.has_errors());
            let stmt = first_let(program);
            assert!(stmt.recursive);
            assert_eq!(stmt.defs.len(), 2);
        },
    );
}

#[test]
fn mutable_variable_and_array() {
    with_program(
        "let mutable x : int\nlet mutable grid [10, 20] : float",
        |program, _, diags| {
            assert!(!diags.has_errors());
            assert!(matches!(
                first_let(program).defs[0].kind,
                LetDefKind::Variable
            ));
            match &program.stmts[1] {
                DefStmt::Let(stmt) => match &stmt.defs[0].kind {
                    LetDefKind::Array { dims } => assert_eq!(dims.len(), 2),
                    other => panic!("expected array def, got {:?}", other),
                },
                other => panic!("expected let, got {:?}", other),
            }
        },
    );
}

#[test]
fn type_definition_with_field_types() {
    with_program(
        "type tree = Leaf | Node of int tree tree",
        |program, interner, diags| {
            assert!(!diags.has_errors());
            match &program.stmts[0] {
                DefStmt::Type(stmt) => {
                    let def = &stmt.defs[0];
                    assert_eq!(interner.resolve(def.name), "tree");
                    assert_eq!(def.constructors.len(), 2);
                    assert_eq!(interner.resolve(def.constructors[0].name), "Leaf");
                    assert!(def.constructors[0].fields.is_empty());
                    let node = &def.constructors[1];
                    assert_eq!(node.fields.len(), 3);
                    assert!(matches!(
                        node.fields[0].kind,
                        AnnotationKind::Basic(TypeTag::Int)
                    ));
                    assert!(matches!(node.fields[1].kind, AnnotationKind::Custom(_)));
                }
                other => panic!("expected type stmt, got {:?}", other),
            }
        },
    );
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    with_program("let x = 1 + 2 * 3", |program, _, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::Binary {
                op: BinaryOp::Add,
                rhs,
                ..
            } => {
                assert!(matches!(
                    rhs.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            ref other => panic!("expected addition at the root, got {:?}", other),
        }
    });
}

#[test]
fn power_is_right_associative() {
    with_program("let x = 2 ** 3 ** 4", |program, _, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::Binary {
                op: BinaryOp::Pow,
                lhs,
                rhs,
            } => {
                assert!(matches!(lhs.kind, ExprKind::Lit(_)));
                assert!(matches!(
                    rhs.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Pow,
                        ..
                    }
                ));
            }
            ref other => panic!("expected power at the root, got {:?}", other),
        }
    });
}

#[test]
fn comparison_is_non_associative() {
    with_program("let x = 1 < 2 < 3", |_, _, diags| {
        assert!(diags.has_errors());
    });
}

#[test]
fn application_binds_tighter_than_operators() {
    with_program("let y = f x + 1", |program, interner, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::Binary {
                op: BinaryOp::Add,
                lhs,
                ..
            } => match lhs.kind {
                ExprKind::Call { name, args } => {
                    assert_eq!(interner.resolve(name), "f");
                    assert_eq!(args.len(), 1);
                }
                ref other => panic!("expected call, got {:?}", other),
            },
            ref other => panic!("expected addition at the root, got {:?}", other),
        }
    });
}

#[test]
fn bare_identifier_is_id_call() {
    with_program("let y = x", |program, _, diags| {
        assert!(!diags.has_errors());
        assert!(matches!(constant_value(program).kind, ExprKind::IdCall(_)));
    });
}

#[test]
fn uppercase_application_is_constructor_call() {
    with_program("let t = Node 1 Leaf Leaf", |program, interner, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::ConstrCall { name, args } => {
                assert_eq!(interner.resolve(name), "Node");
                assert_eq!(args.len(), 3);
                assert!(matches!(
                    args[1].kind,
                    ExprKind::ConstrCall { args: &[], .. }
                ));
            }
            ref other => panic!("expected constructor call, got {:?}", other),
        }
    });
}

#[test]
fn array_access_with_indexes() {
    with_program("let v = grid[i, j + 1]", |program, _, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::ArrayAccess { indexes, .. } => assert_eq!(indexes.len(), 2),
            ref other => panic!("expected array access, got {:?}", other),
        }
    });
}

#[test]
fn unit_literal_and_grouping() {
    with_program("let u = ()\nlet g = (1 + 2) * 3", |program, _, diags| {
        assert!(!diags.has_errors());
        assert!(matches!(
            constant_value(program).kind,
            ExprKind::Lit(Literal::Unit)
        ));
        match &program.stmts[1] {
            DefStmt::Let(stmt) => match &stmt.defs[0].kind {
                LetDefKind::Constant { value } => {
                    assert!(matches!(
                        value.kind,
                        ExprKind::Binary {
                            op: BinaryOp::Mul,
                            ..
                        }
                    ));
                }
                other => panic!("expected constant, got {:?}", other),
            },
            other => panic!("expected let, got {:?}", other),
        }
    });
}

#[test]
fn if_without_else() {
    with_program("let x = if c then f ()", |program, _, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::If { else_expr, .. } => assert!(else_expr.is_none()),
            ref other => panic!("expected if, got {:?}", other),
        }
    });
}

#[test]
fn else_if_chains_nest_rightward() {
    with_program(
        "let x = if a then 1 else if b then 2 else 3",
        |program, _, diags| {
            assert!(!diags.has_errors());
            match constant_value(program).kind {
                ExprKind::If { else_expr, .. } => {
                    let else_expr = else_expr.expect("else branch");
                    assert!(matches!(else_expr.kind, ExprKind::If { .. }));
                }
                ref other => panic!("expected if, got {:?}", other),
            }
        },
    );
}

#[test]
fn while_and_for_loops() {
    with_program(
        "let a = while c do step () done\nlet b = for i = 1 to 10 do f i done",
        |program, _, diags| {
            assert!(!diags.has_errors());
            assert!(matches!(
                constant_value(program).kind,
                ExprKind::While { .. }
            ));
            match &program.stmts[1] {
                DefStmt::Let(stmt) => match &stmt.defs[0].kind {
                    LetDefKind::Constant { value } => match value.kind {
                        ExprKind::For { ascending, .. } => assert!(ascending),
                        ref other => panic!("expected for, got {:?}", other),
                    },
                    other => panic!("expected constant, got {:?}", other),
                },
                other => panic!("expected let, got {:?}", other),
            }
        },
    );
}

#[test]
fn downto_clears_ascending() {
    with_program("let b = for i = 10 downto 1 do f i done", |program, _, d| {
        assert!(!d.has_errors());
        match constant_value(program).kind {
            ExprKind::For { ascending, .. } => assert!(!ascending),
            ref other => panic!("expected for, got {:?}", other),
        }
    });
}

#[test]
fn dim_defaults_to_first_dimension() {
    with_program("let n = dim a\nlet m = dim 2 a", |program, _, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::Dim { dim, .. } => assert_eq!(dim, 1),
            ref other => panic!("expected dim, got {:?}", other),
        }
        match &program.stmts[1] {
            DefStmt::Let(stmt) => match &stmt.defs[0].kind {
                LetDefKind::Constant { value } => match value.kind {
                    ExprKind::Dim { dim, .. } => assert_eq!(dim, 2),
                    ref other => panic!("expected dim, got {:?}", other),
                },
                other => panic!("expected constant, got {:?}", other),
            },
            other => panic!("expected let, got {:?}", other),
        }
    });
}

#[test]
fn new_takes_a_type() {
    with_program("let p = new int ref", |program, _, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::New(annot) => {
                assert!(matches!(annot.kind, AnnotationKind::Ref(_)));
            }
            ref other => panic!("expected new, got {:?}", other),
        }
    });
}

#[test]
fn let_in_scopes_a_body() {
    with_program("let y = let x = 1 in x + 1", |program, _, diags| {
        assert!(!diags.has_errors());
        match &constant_value(program).kind {
            ExprKind::LetIn { stmt, body } => {
                assert_eq!(stmt.defs.len(), 1);
                assert!(matches!(
                    body.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Add,
                        ..
                    }
                ));
            }
            other => panic!("expected let-in, got {:?}", other),
        }
    });
}

#[test]
fn match_with_constructor_patterns() {
    with_program(
        "let s = match t with Leaf -> 0 | Node v l r -> v end",
        |program, interner, diags| {
            assert!(!diags.has_errors());
            match constant_value(program).kind {
                ExprKind::Match { clauses, .. } => {
                    assert_eq!(clauses.len(), 2);
                    match &clauses[1].pattern.kind {
                        PatternKind::Constr { name, args } => {
                            assert_eq!(interner.resolve(*name), "Node");
                            assert_eq!(args.len(), 3);
                            assert!(matches!(args[0].kind, PatternKind::Id(_)));
                        }
                        other => panic!("expected constructor pattern, got {:?}", other),
                    }
                }
                ref other => panic!("expected match, got {:?}", other),
            }
        },
    );
}

#[test]
fn negative_literal_pattern_folds_sign() {
    with_program(
        "let s = match x with -1 -> true | n -> false end",
        |program, interner, diags| {
            assert!(!diags.has_errors());
            match constant_value(program).kind {
                ExprKind::Match { clauses, .. } => match clauses[0].pattern.kind {
                    PatternKind::Literal(Literal::Int(sym)) => {
                        assert_eq!(interner.resolve(sym), "-1")
                    }
                    ref other => panic!("expected int pattern, got {:?}", other),
                },
                ref other => panic!("expected match, got {:?}", other),
            }
        },
    );
}

#[test]
fn unary_operators_stack() {
    with_program("let x = not not b\nlet y = - !p", |program, _, diags| {
        assert!(!diags.has_errors());
        match constant_value(program).kind {
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => assert!(matches!(
                operand.kind,
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    ..
                }
            )),
            ref other => panic!("expected unary, got {:?}", other),
        }
    });
}

#[test]
fn assignment_and_sequence() {
    with_program("let a = p := 1; q := 2", |program, _, diags| {
        assert!(!diags.has_errors());
        // `:=` is looser than `;`, so the root is the assignment.
        assert!(matches!(
            constant_value(program).kind,
            ExprKind::Binary {
                op: BinaryOp::Assign,
                ..
            }
        ));
    });
}

#[test]
fn error_recovers_at_next_statement() {
    with_program(
        "let x = * 2\nlet y = 3\ntype t = | A\nlet z = 4",
        |program, _, diags| {
            assert!(diags.has_errors());
            // Both good statements survive recovery.
            let lets = program
                .stmts
                .iter()
                .filter(|s| matches!(s, DefStmt::Let(_)))
                .count();
            assert!(lets >= 2, "expected recovered lets, got {}", lets);
        },
    );
}

#[test]
fn multiple_errors_reported() {
    with_program("let = 1\nlet y 2\nlet z = 3", |_, _, diags| {
        assert!(diags.error_count() >= 2);
    });
}

#[test]
fn spans_nest_for_binary_expressions() {
    with_program("let x = 1 + 2 * 3", |program, _, _| {
        let root = constant_value(program);
        match root.kind {
            ExprKind::Binary { lhs, rhs, .. } => {
                assert!(root.span.contains(lhs.span));
                assert!(root.span.contains(rhs.span));
            }
            ref other => panic!("expected binary, got {:?}", other),
        }
    });
}

#[test]
fn parsing_twice_yields_equal_structure() {
    let source = "let rec f x = if x = 0 then 1 else x * f (x - 1)";
    let mut shapes = Vec::new();
    for _ in 0..2 {
        with_program(source, |program, _, diags| {
            assert!(!diags.has_errors());
            shapes.push(format!("{:?}", program));
        });
    }
    assert_eq!(shapes[0], shapes[1]);
}
