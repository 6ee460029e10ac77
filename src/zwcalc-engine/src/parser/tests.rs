// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::*;

// ============================================================================
// Atom parsing tests
// ============================================================================

#[test]
fn test_parse_number() {
    let ast = parse("42").unwrap().unwrap();
    assert!(matches!(ast, Expr0::Const(s, n, _) if s == "42" && n == 42.0));
}

#[test]
fn test_parse_float() {
    let ast = parse("2.75").unwrap().unwrap();
    assert!(matches!(ast, Expr0::Const(s, n, _) if s == "2.75" && (n - 2.75).abs() < 0.001));
}

#[test]
fn test_parse_scientific_notation() {
    // exponents are accepted in expressions (the block-level number scan
    // is stricter, but that lives elsewhere)
    let ast = parse("1e5").unwrap().unwrap();
    assert!(matches!(ast, Expr0::Const(s, n, _) if s == "1e5" && n == 1e5));
}

#[test]
fn test_parse_identifier() {
    let ast = parse("foo").unwrap().unwrap();
    assert!(matches!(ast, Expr0::Var(id, _) if id == "foo"));
}

#[test]
fn test_parse_dotted_identifier() {
    // dotted names are a single Var; resolution decides what is legal
    let ast = parse("math.sqrt").unwrap().unwrap();
    assert!(matches!(ast, Expr0::Var(id, _) if id == "math.sqrt"));
}

#[test]
fn test_parse_parenthesized() {
    let ast = parse("(42)").unwrap().unwrap().strip_loc();
    let expected = Expr0::Const("42".to_string(), 42.0, Loc::default());
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_empty() {
    let ast = parse("").unwrap();
    assert!(ast.is_none());
}

#[test]
fn test_parse_whitespace_only() {
    let ast = parse("   ").unwrap();
    assert!(ast.is_none());
}

// ============================================================================
// Sequence literal tests
// ============================================================================

#[test]
fn test_parse_empty_tuple() {
    let ast = parse("()").unwrap().unwrap().strip_loc();
    assert_eq!(ast, Expr0::Seq(vec![], Loc::default()));
}

#[test]
fn test_parse_tuple() {
    let ast = parse("(1, 2)").unwrap().unwrap().strip_loc();
    let expected = Expr0::Seq(
        vec![
            Expr0::Const("1".to_string(), 1.0, Loc::default()),
            Expr0::Const("2".to_string(), 2.0, Loc::default()),
        ],
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_single_element_tuple() {
    // a trailing comma is what makes (1,) a tuple rather than grouping
    let ast = parse("(1,)").unwrap().unwrap().strip_loc();
    let expected = Expr0::Seq(
        vec![Expr0::Const("1".to_string(), 1.0, Loc::default())],
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_list() {
    let ast = parse("[1, 2, 3]").unwrap().unwrap().strip_loc();
    let expected = Expr0::Seq(
        vec![
            Expr0::Const("1".to_string(), 1.0, Loc::default()),
            Expr0::Const("2".to_string(), 2.0, Loc::default()),
            Expr0::Const("3".to_string(), 3.0, Loc::default()),
        ],
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_empty_list() {
    let ast = parse("[]").unwrap().unwrap().strip_loc();
    assert_eq!(ast, Expr0::Seq(vec![], Loc::default()));
}

#[test]
fn test_parse_list_of_expressions() {
    let ast = parse("[1 + 2, -3]").unwrap().unwrap().strip_loc();
    let expected = Expr0::Seq(
        vec![
            Expr0::Op2(
                BinaryOp::Add,
                Box::new(Expr0::Const("1".to_string(), 1.0, Loc::default())),
                Box::new(Expr0::Const("2".to_string(), 2.0, Loc::default())),
                Loc::default(),
            ),
            Expr0::Op1(
                UnaryOp::Negative,
                Box::new(Expr0::Const("3".to_string(), 3.0, Loc::default())),
                Loc::default(),
            ),
        ],
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

// ============================================================================
// Function call tests
// ============================================================================

#[test]
fn test_parse_call_no_args() {
    let ast = parse("sqrt()").unwrap().unwrap().strip_loc();
    let expected = Expr0::App(UntypedCall("sqrt".to_string(), vec![]), Loc::default());
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_call_one_arg() {
    let ast = parse("sqrt(16)").unwrap().unwrap().strip_loc();
    let expected = Expr0::App(
        UntypedCall(
            "sqrt".to_string(),
            vec![Expr0::Const("16".to_string(), 16.0, Loc::default())],
        ),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_call_multiple_args() {
    let ast = parse("atan2(1, 2)").unwrap().unwrap().strip_loc();
    let expected = Expr0::App(
        UntypedCall(
            "atan2".to_string(),
            vec![
                Expr0::Const("1".to_string(), 1.0, Loc::default()),
                Expr0::Const("2".to_string(), 2.0, Loc::default()),
            ],
        ),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_call_trailing_comma() {
    let ast = parse("sqrt(16,)").unwrap().unwrap().strip_loc();
    let expected = Expr0::App(
        UntypedCall(
            "sqrt".to_string(),
            vec![Expr0::Const("16".to_string(), 16.0, Loc::default())],
        ),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_dotted_call() {
    // the callee keeps its namespace and its case
    let ast = parse("math.sqrt(16)").unwrap().unwrap().strip_loc();
    let expected = Expr0::App(
        UntypedCall(
            "math.sqrt".to_string(),
            vec![Expr0::Const("16".to_string(), 16.0, Loc::default())],
        ),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_nested_calls() {
    let ast = parse("sqrt(fabs(-16))").unwrap().unwrap().strip_loc();
    let expected = Expr0::App(
        UntypedCall(
            "sqrt".to_string(),
            vec![Expr0::App(
                UntypedCall(
                    "fabs".to_string(),
                    vec![Expr0::Op1(
                        UnaryOp::Negative,
                        Box::new(Expr0::Const("16".to_string(), 16.0, Loc::default())),
                        Loc::default(),
                    )],
                ),
                Loc::default(),
            )],
        ),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_call_with_seq_arg() {
    let ast = parse("fsum([1, 2])").unwrap().unwrap().strip_loc();
    let expected = Expr0::App(
        UntypedCall(
            "fsum".to_string(),
            vec![Expr0::Seq(
                vec![
                    Expr0::Const("1".to_string(), 1.0, Loc::default()),
                    Expr0::Const("2".to_string(), 2.0, Loc::default()),
                ],
                Loc::default(),
            )],
        ),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

// ============================================================================
// Binary operator tests
// ============================================================================

#[test]
fn test_parse_addition() {
    let ast = parse("a + b").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Add,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Box::new(Expr0::Var("b".to_string(), Loc::default())),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_subtraction() {
    let ast = parse("a - b").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Sub,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Box::new(Expr0::Var("b".to_string(), Loc::default())),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_division_flavors() {
    // / and // are distinct operators
    let ast = parse("a / b").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Div,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Box::new(Expr0::Var("b".to_string(), Loc::default())),
        Loc::default(),
    );
    assert_eq!(ast, expected);

    let ast = parse("a // b").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::FloorDiv,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Box::new(Expr0::Var("b".to_string(), Loc::default())),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_modulo() {
    let ast = parse("a % b").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Mod,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Box::new(Expr0::Var("b".to_string(), Loc::default())),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

// ============================================================================
// Unary and exponentiation tests
// ============================================================================

#[test]
fn test_parse_unary_minus() {
    let ast = parse("-a").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op1(
        UnaryOp::Negative,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_chained_signs() {
    let ast = parse("--2").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op1(
        UnaryOp::Negative,
        Box::new(Expr0::Op1(
            UnaryOp::Negative,
            Box::new(Expr0::Const("2".to_string(), 2.0, Loc::default())),
            Loc::default(),
        )),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_pow_right_associative() {
    // 2 ** 3 ** 2 is 2 ** (3 ** 2)
    let ast = parse("2 ** 3 ** 2").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Pow,
        Box::new(Expr0::Const("2".to_string(), 2.0, Loc::default())),
        Box::new(Expr0::Op2(
            BinaryOp::Pow,
            Box::new(Expr0::Const("3".to_string(), 3.0, Loc::default())),
            Box::new(Expr0::Const("2".to_string(), 2.0, Loc::default())),
            Loc::default(),
        )),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_pow_binds_tighter_than_sign() {
    // -2 ** 2 is -(2 ** 2)
    let ast = parse("-2 ** 2").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op1(
        UnaryOp::Negative,
        Box::new(Expr0::Op2(
            BinaryOp::Pow,
            Box::new(Expr0::Const("2".to_string(), 2.0, Loc::default())),
            Box::new(Expr0::Const("2".to_string(), 2.0, Loc::default())),
            Loc::default(),
        )),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_parse_pow_signed_exponent() {
    // 2 ** -3 needs no parentheses
    let ast = parse("2 ** -3").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Pow,
        Box::new(Expr0::Const("2".to_string(), 2.0, Loc::default())),
        Box::new(Expr0::Op1(
            UnaryOp::Negative,
            Box::new(Expr0::Const("3".to_string(), 3.0, Loc::default())),
            Loc::default(),
        )),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

// ============================================================================
// Operator precedence tests
// ============================================================================

#[test]
fn test_precedence_mul_over_add() {
    // a + b * c should be a + (b * c)
    let ast = parse("a + b * c").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Add,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Box::new(Expr0::Op2(
            BinaryOp::Mul,
            Box::new(Expr0::Var("b".to_string(), Loc::default())),
            Box::new(Expr0::Var("c".to_string(), Loc::default())),
            Loc::default(),
        )),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_precedence_parens() {
    // (a + b) * c
    let ast = parse("(a + b) * c").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Mul,
        Box::new(Expr0::Op2(
            BinaryOp::Add,
            Box::new(Expr0::Var("a".to_string(), Loc::default())),
            Box::new(Expr0::Var("b".to_string(), Loc::default())),
            Loc::default(),
        )),
        Box::new(Expr0::Var("c".to_string(), Loc::default())),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

#[test]
fn test_precedence_pow_over_mul() {
    // a * b ** c should be a * (b ** c)
    let ast = parse("a * b ** c").unwrap().unwrap().strip_loc();
    let expected = Expr0::Op2(
        BinaryOp::Mul,
        Box::new(Expr0::Var("a".to_string(), Loc::default())),
        Box::new(Expr0::Op2(
            BinaryOp::Pow,
            Box::new(Expr0::Var("b".to_string(), Loc::default())),
            Box::new(Expr0::Var("c".to_string(), Loc::default())),
            Loc::default(),
        )),
        Loc::default(),
    );
    assert_eq!(ast, expected);
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn test_error_unclosed_paren() {
    let err = parse("(3").unwrap_err();
    assert!(!err.is_empty());
    assert_eq!(err[0].code, ErrorCode::UnrecognizedEof);
}

#[test]
fn test_error_missing_operand() {
    let err = parse("3 +").unwrap_err();
    assert!(!err.is_empty());
    assert_eq!(err[0].code, ErrorCode::UnrecognizedEof);
}

#[test]
fn test_error_extra_token() {
    let err = parse("1 2").unwrap_err();
    assert!(!err.is_empty());
    assert_eq!(err[0].code, ErrorCode::ExtraToken);
    assert_eq!(err[0].start, 2);
    assert_eq!(err[0].end, 3);
}

#[test]
fn test_error_unclosed_bracket() {
    let err = parse("[1, 2").unwrap_err();
    assert!(!err.is_empty());
}

#[test]
fn test_error_unclosed_call() {
    let err = parse("sqrt(16").unwrap_err();
    assert!(!err.is_empty());
}

#[test]
fn test_error_leading_close_paren() {
    let err = parse(") + 1").unwrap_err();
    assert!(!err.is_empty());
    assert_eq!(err[0].code, ErrorCode::UnrecognizedToken);
    assert_eq!(err[0].start, 0);
}

#[test]
fn test_error_lexer_failure_surfaces() {
    // '^' never reaches the parser: it dies in the lexer
    let err = parse("2 ^ 8").unwrap_err();
    assert!(!err.is_empty());
    assert_eq!(err[0].code, ErrorCode::InvalidToken);
}

// ============================================================================
// Loc span tests
// ============================================================================

#[test]
fn test_loc_span_const() {
    let ast = parse("123").unwrap().unwrap();
    let loc = ast.get_loc();
    assert_eq!(loc.start, 0);
    assert_eq!(loc.end, 3);
}

#[test]
fn test_loc_span_binary_op() {
    let ast = parse("a + b").unwrap().unwrap();
    let loc = ast.get_loc();
    assert_eq!(loc.start, 0);
    assert_eq!(loc.end, 5);
}

#[test]
fn test_loc_span_call() {
    let ast = parse("sqrt(16)").unwrap().unwrap();
    let loc = ast.get_loc();
    assert_eq!(loc.start, 0);
    assert_eq!(loc.end, 8);
}

#[test]
fn test_loc_span_list() {
    let ast = parse("[1, 2]").unwrap().unwrap();
    let loc = ast.get_loc();
    assert_eq!(loc.start, 0);
    assert_eq!(loc.end, 6);
}
