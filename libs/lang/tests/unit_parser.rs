//! Unit tests for the statement parser.

use vernier_lang::ast::{BinaryOp, ConvertTarget, Expr, Statement, UnaryOp};
use vernier_lang::lexer::Lexer;
use vernier_lang::parser::Parser;

fn parse(input: &str) -> Result<Statement, vernier_lang::EvalError> {
    let (tokens, diagnostics) = Lexer::tokenize(input);
    assert!(
        diagnostics.is_empty(),
        "unexpected diagnostics: {diagnostics:?}"
    );
    Parser::new(tokens).parse_statement()
}

fn parse_expr(input: &str) -> Expr {
    match parse(input).unwrap() {
        Statement::Expression { expr, .. } => expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn empty_line_is_an_empty_statement() {
    assert_eq!(parse("").unwrap(), Statement::Empty);
    assert_eq!(parse("   # just a comment").unwrap(), Statement::Empty);
}

#[test]
fn trailing_semicolon_suppresses_printing() {
    match parse("1 + 2").unwrap() {
        Statement::Expression { print, .. } => assert!(print),
        other => panic!("unexpected {other:?}"),
    }
    match parse("1 + 2;").unwrap() {
        Statement::Expression { print, .. } => assert!(!print),
        other => panic!("unexpected {other:?}"),
    }
    match parse("x = 1;").unwrap() {
        Statement::Assign { name, print, .. } => {
            assert_eq!(name, "x");
            assert!(!print);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let expr = parse_expr("1 + 2 * 3");
    match expr {
        Expr::Binary {
            op: BinaryOp::Add,
            right,
            ..
        } => {
            assert!(matches!(
                *right,
                Expr::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn power_is_right_associative() {
    let expr = parse_expr("2 ^ 3 ^ 2");
    match expr {
        Expr::Binary {
            op: BinaryOp::Pow,
            left,
            right,
        } => {
            assert_eq!(*left, Expr::Number(2.0));
            assert!(matches!(
                *right,
                Expr::Binary {
                    op: BinaryOp::Pow,
                    ..
                }
            ));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn power_binds_tighter_than_unary_minus() {
    // -2^2 is -(2^2), not (-2)^2.
    let expr = parse_expr("-2^2");
    match expr {
        Expr::Unary {
            op: UnaryOp::Minus,
            operand,
        } => assert!(matches!(
            *operand,
            Expr::Binary {
                op: BinaryOp::Pow,
                ..
            }
        )),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unary_may_appear_in_the_exponent() {
    let expr = parse_expr("2^-2");
    match expr {
        Expr::Binary {
            op: BinaryOp::Pow,
            right,
            ..
        } => assert!(matches!(
            *right,
            Expr::Unary {
                op: UnaryOp::Minus,
                ..
            }
        )),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn juxtaposition_is_implicit_multiplication() {
    let expr = parse_expr("9.8 meter");
    match expr {
        Expr::Binary {
            op: BinaryOp::Mul,
            left,
            right,
        } => {
            assert_eq!(*left, Expr::Number(9.8));
            assert_eq!(*right, Expr::Ident("meter".into()));
        }
        other => panic!("unexpected {other:?}"),
    }

    // The juxtaposed operand still owns its power.
    let expr = parse_expr("2 second^2");
    match expr {
        Expr::Binary {
            op: BinaryOp::Mul,
            right,
            ..
        } => assert!(matches!(
            *right,
            Expr::Binary {
                op: BinaryOp::Pow,
                ..
            }
        )),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn conversion_forms() {
    let expr = parse_expr("x in newton");
    assert!(matches!(
        expr,
        Expr::Convert {
            target: ConvertTarget::Unit(_),
            ..
        }
    ));

    let expr = parse_expr("x in si");
    assert!(matches!(
        expr,
        Expr::Convert {
            target: ConvertTarget::Si,
            ..
        }
    ));

    // The conversion target may itself be a unit expression.
    let expr = parse_expr("x in meter / second");
    assert!(matches!(
        expr,
        Expr::Convert {
            target: ConvertTarget::Unit(_),
            ..
        }
    ));
}

#[test]
fn conversion_is_non_associative() {
    assert!(parse("x in meter in si").is_err());
}

#[test]
fn function_calls_parse_for_known_functions_only() {
    let expr = parse_expr("log(10)");
    assert!(matches!(expr, Expr::Call { .. }));

    // An unknown name followed by '(' is not a call form.
    assert!(parse("mystery(10)").is_err());
}

#[test]
fn command_forms() {
    assert_eq!(parse("del x").unwrap(), Statement::Delete("x".into()));
    assert_eq!(parse("variables").unwrap(), Statement::ListVariables);
    assert_eq!(parse("reset;").unwrap(), Statement::Reset);
    assert_eq!(
        parse("eq a + b = 5;").unwrap(),
        Statement::DefineEquation("a + b = 5".into())
    );
}

#[test]
fn import_strips_surrounding_quotes() {
    assert_eq!(
        parse("import \"data/setup.vn\";").unwrap(),
        Statement::Import("data/setup.vn".into())
    );
    assert_eq!(
        parse("import data/setup.vn").unwrap(),
        Statement::Import("data/setup.vn".into())
    );
}

#[test]
fn solve_collapses_duplicates_preserving_first_seen_order() {
    assert_eq!(
        parse("solve x, y, x, z").unwrap(),
        Statement::Solve(vec!["x".into(), "y".into(), "z".into()])
    );
}

#[test]
fn syntax_errors_name_the_offending_token() {
    let err = parse("1 + * 2").unwrap_err();
    assert!(err.to_string().contains("'*'"));

    let err = parse("1 +").unwrap_err();
    assert!(err.to_string().contains("end of input"));

    let err = parse("del").unwrap_err();
    assert!(err.to_string().contains("variable name"));
}

#[test]
fn trailing_garbage_after_statement_is_rejected() {
    assert!(parse("1 + 2; 3").is_err());
    assert!(parse("reset now").is_err());
}
