use super::*;
use crate::ast_arenas;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::source::SourceManager;

/// Full front half of the pipeline: text to typed bindings. Returns the
/// top-level bindings rendered as text, all diagnostic messages, and
/// the error count.
fn typecheck(source: &str) -> (Vec<(String, String)>, Vec<String>, usize) {
    let mut diags = Diagnostics::new(false);
    let sm = SourceManager::from_source("test.lla", source, &mut diags);
    let mut interner = Interner::new();
    ast_arenas!(ctx);
    let lexer = Lexer::new(&sm);
    let mut parser = Parser::new(lexer, &mut interner, &mut diags, ctx);
    let program = parser.parse_program();
    drop(parser);

    let mut typer = Typer::new(&mut diags, &interner);
    typer.check_program(&program);
    let bindings: Vec<(String, String)> = typer
        .bindings()
        .iter()
        .map(|(name, ty)| {
            (
                interner.resolve(*name).to_string(),
                typer.arena.display(*ty, &interner),
            )
        })
        .collect();
    drop(typer);

    let messages: Vec<String> = diags.iter().map(|d| d.message.clone()).collect();
    let errors = diags.error_count();
    (bindings, messages, errors)
}

fn binding<'b>(bindings: &'b [(String, String)], name: &str) -> &'b str {
    bindings
        .iter()
        .rev()
        .find(|(n, _)| n == name)
        .map(|(_, t)| t.as_str())
        .unwrap_or_else(|| panic!("no binding for '{}' in {:?}", name, bindings))
}

#[test]
fn integer_constant_is_int() {
    let (bindings, _, errors) = typecheck("let x = 42");
    assert_eq!(errors, 0);
    assert_eq!(binding(&bindings, "x"), "int");
}

#[test]
fn recursive_factorial_infers_int_to_int() {
    let (bindings, messages, errors) =
        typecheck("let rec f x = if x = 0 then 1 else x * f (x - 1)");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "f"), "(int -> int)");
}

#[test]
fn tree_type_and_constructor_use() {
    let (bindings, messages, errors) = typecheck(
        "type tree = Leaf | Node of int tree tree\nlet t = Node 1 Leaf Leaf",
    );
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "t"), "tree");
}

#[test]
fn adding_bool_to_int_reports_the_operator() {
    let (_, messages, errors) = typecheck("let x = 1 + true");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("'+'"), "message: {}", messages[0]);
    assert!(messages[0].contains("bool"), "message: {}", messages[0]);
    assert!(messages[0].contains("int"), "message: {}", messages[0]);
}

#[test]
fn annotation_mismatch_is_reported() {
    let (_, _, errors) = typecheck("let x : bool = 1");
    assert_eq!(errors, 1);
}

#[test]
fn undefined_identifier_is_reported() {
    let (_, messages, errors) = typecheck("let x = y + 1");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("undefined identifier 'y'"));
}

#[test]
fn non_recursive_definition_cannot_see_itself() {
    let (_, messages, errors) = typecheck("let f x = f x");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("undefined identifier 'f'"));
}

#[test]
fn mutually_recursive_group_types_both_names() {
    let (bindings, messages, errors) = typecheck(
        "let rec even n = if n = 0 then true else odd (n - 1)\n\
         and odd n = if n = 0 then false else even (n - 1)",
    );
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "even"), "(int -> bool)");
    assert_eq!(binding(&bindings, "odd"), "(int -> bool)");
}

#[test]
fn occurs_check_rejects_self_returning_function() {
    let (_, messages, errors) = typecheck("let rec f x = f");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("recursive type"), "{}", messages[0]);
}

#[test]
fn duplicate_type_name_is_an_error() {
    let (_, messages, errors) = typecheck("type t = A\ntype t = B");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("type 't' is already defined"));
}

#[test]
fn duplicate_constructor_is_an_error() {
    let (_, messages, errors) = typecheck("type t = A\ntype u = A of int");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("constructor 'A' is already defined"));
}

#[test]
fn constructor_arity_is_checked_in_expressions() {
    let (_, messages, errors) =
        typecheck("type tree = Leaf | Node of int tree tree\nlet t = Node 1 Leaf");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("expects 3 argument(s), got 2"));
}

#[test]
fn constructor_field_types_are_checked() {
    let (_, _, errors) =
        typecheck("type tree = Leaf | Node of int tree tree\nlet t = Node true Leaf Leaf");
    assert_eq!(errors, 1);
}

#[test]
fn undefined_constructor_is_reported() {
    let (_, messages, errors) = typecheck("let t = Cons 1");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("undefined constructor 'Cons'"));
}

#[test]
fn match_binds_pattern_variables() {
    let (bindings, messages, errors) = typecheck(
        "type tree = Leaf | Node of int tree tree\n\
         let depth t = match t with Leaf -> 0 | Node v l r -> v end",
    );
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "depth"), "(tree -> int)");
}

#[test]
fn match_arms_must_agree() {
    let (_, messages, errors) = typecheck(
        "type t = A | B\nlet f x = match x with A -> 1 | B -> true end",
    );
    assert_eq!(errors, 1);
    assert!(messages[0].contains("match arms"), "{}", messages[0]);
}

#[test]
fn pattern_arity_is_exact() {
    let (_, messages, errors) = typecheck(
        "type tree = Leaf | Node of int tree tree\n\
         let f t = match t with Node v l -> v | Leaf -> 0 end",
    );
    assert_eq!(errors, 1);
    assert!(messages[0].contains("in pattern"), "{}", messages[0]);
}

#[test]
fn mutable_variable_is_a_reference() {
    let (bindings, messages, errors) =
        typecheck("let mutable x : int\nlet y = !x + 1");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "x"), "int ref");
    assert_eq!(binding(&bindings, "y"), "int");
}

#[test]
fn assignment_needs_a_reference() {
    let (_, messages, errors) = typecheck("let f u = 1 := 2");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("':='"), "{}", messages[0]);
}

#[test]
fn assignment_through_array_access() {
    let (bindings, messages, errors) = typecheck(
        "let mutable a [10] : int\nlet set u = a[3] := 5",
    );
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "a"), "array of int");
}

#[test]
fn array_access_yields_a_cell() {
    let (bindings, messages, errors) = typecheck(
        "let mutable grid [4, 4] : float\nlet v = !grid[1, 2]",
    );
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "v"), "float");
}

#[test]
fn dim_requires_enough_rank() {
    let (bindings, messages, errors) = typecheck(
        "let mutable a [10] : int\nlet n = dim a\nlet m = dim 2 a",
    );
    assert_eq!(errors, 1, "diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "n"), "int");
    assert!(messages[0].contains("rank at least 2"), "{}", messages[0]);
}

#[test]
fn arrays_do_not_compare_with_equals() {
    let (_, messages, errors) = typecheck(
        "let mutable a [2] : int\nlet c = a = a",
    );
    assert!(errors >= 1);
    assert!(
        messages.iter().any(|m| m.contains("cannot compare arrays")),
        "messages: {:?}",
        messages
    );
}

#[test]
fn for_loop_binds_counter_only_inside() {
    let (_, messages, errors) = typecheck(
        "let mutable s : int\n\
         let sum u = for i = 1 to 10 do s := !s + i done\n\
         let leak = i",
    );
    assert_eq!(errors, 1, "diagnostics: {:?}", messages);
    assert!(messages[0].contains("undefined identifier 'i'"));
}

#[test]
fn while_condition_must_be_bool() {
    let (_, messages, errors) = typecheck("let f u = while 1 do () done");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("while condition"), "{}", messages[0]);
}

#[test]
fn if_without_else_forces_unit_branch() {
    let (_, _, errors) = typecheck("let f u = if true then 1");
    assert_eq!(errors, 1);
}

#[test]
fn let_in_bindings_do_not_escape() {
    let (bindings, messages, errors) =
        typecheck("let y = let x = 1 in x + 1\nlet z = x");
    assert_eq!(errors, 1, "diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "y"), "int");
    assert!(messages[0].contains("undefined identifier 'x'"));
}

#[test]
fn later_let_shadows_earlier_one() {
    let (bindings, messages, errors) = typecheck("let x = 1\nlet x = true");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "x"), "bool");
}

#[test]
fn duplicate_name_in_one_group_is_an_error() {
    let (_, messages, errors) = typecheck("let x = 1 and x = 2");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("duplicate definition"), "{}", messages[0]);
}

#[test]
fn string_literal_is_a_char_array() {
    let (bindings, messages, errors) = typecheck("let s = \"hello\"");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "s"), "array of char");
}

#[test]
fn new_gives_a_reference_and_delete_consumes_it() {
    let (bindings, messages, errors) =
        typecheck("let p = new int\nlet f u = delete p");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "p"), "int ref");
}

#[test]
fn float_operators_require_floats() {
    let (_, messages, errors) = typecheck("let x = 1.5 +. 2");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("'+.'"), "{}", messages[0]);
}

#[test]
fn unknown_type_name_in_annotation() {
    let (_, messages, errors) = typecheck("let f (x : widget) = x");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("unknown type name 'widget'"));
}

#[test]
fn function_arity_mismatch_names_the_function() {
    let (_, messages, errors) = typecheck("let add a b = a + b\nlet x = add 1");
    assert_eq!(errors, 1, "diagnostics: {:?}", messages);
    assert!(
        messages[0].contains("expects 2 argument(s), got 1"),
        "{}",
        messages[0]
    );
}

#[test]
fn physical_equality_works_on_ints() {
    let (bindings, messages, errors) = typecheck("let e = 1 == 2\nlet n = 1 != 2");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "e"), "bool");
    assert_eq!(binding(&bindings, "n"), "bool");
}

#[test]
fn functions_do_not_compare_with_equals() {
    let (_, messages, errors) = typecheck("let f x = x\nlet c = f == f");
    assert_eq!(errors, 1);
    assert!(
        messages[0].contains("cannot compare arrays or functions"),
        "{}",
        messages[0]
    );
}

#[test]
fn chars_order_with_comparison_operators() {
    let (bindings, messages, errors) = typecheck("let c = 'a' < 'b'");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "c"), "bool");
}

#[test]
fn unit_does_not_order() {
    let (_, messages, errors) = typecheck("let c = () < ()");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("'<'"), "{}", messages[0]);
}

#[test]
fn not_requires_bool() {
    let (bindings, _, errors) = typecheck("let b = not true");
    assert_eq!(errors, 0);
    assert_eq!(binding(&bindings, "b"), "bool");
    let (_, _, errors) = typecheck("let b = not 1");
    assert_eq!(errors, 1);
}

#[test]
fn deref_needs_a_reference() {
    let (_, messages, errors) = typecheck("let x = !1");
    assert_eq!(errors, 1);
    assert!(messages[0].contains("'!'"), "{}", messages[0]);
}

#[test]
fn float_unary_minus_is_float() {
    let (bindings, messages, errors) = typecheck("let y = -. 2.5");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "y"), "float");
}

#[test]
fn sequence_returns_the_right_hand_type() {
    let (bindings, messages, errors) = typecheck("let s = begin () ; 42 end");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "s"), "int");
}

#[test]
fn assignment_binds_looser_than_sequence() {
    // `p := 1; 42` parses as `p := (1; 42)`, so the whole thing is unit.
    let (bindings, messages, errors) =
        typecheck("let mutable p : int\nlet s = p := 1; 42");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "s"), "unit");
}

#[test]
fn power_operator_is_float_only() {
    let (_, messages, errors) = typecheck("let p = 2 ** 3");
    assert_eq!(errors, 2, "diagnostics: {:?}", messages);
    assert!(messages[0].contains("'**'"), "{}", messages[0]);
    let (bindings, _, errors) = typecheck("let p = 2.0 ** 3.0");
    assert_eq!(errors, 0);
    assert_eq!(binding(&bindings, "p"), "float");
}

#[test]
fn annotated_function_checks_its_return() {
    let (bindings, messages, errors) =
        typecheck("let inc (x : int) : int = x + 1\nlet y = inc 41");
    assert_eq!(errors, 0, "unexpected diagnostics: {:?}", messages);
    assert_eq!(binding(&bindings, "inc"), "(int -> int)");
    assert_eq!(binding(&bindings, "y"), "int");
}
