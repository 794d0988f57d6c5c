// ABOUTME: quote/unquote/macro scenarios ported from the reference Monkey macro test suite

use monkey::env::Environment;
use monkey::evaluator::macro_expand::{define_macros, expand_macros};
use monkey::lexer::Lexer;
use monkey::object::Value;
use monkey::parser::Parser;

fn parse(input: &str) -> monkey::ast::Program {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    assert!(parser.errors().is_empty(), "parse errors: {:?}", parser.errors());
    program
}

fn eval_program(input: &str) -> Value {
    let program = parse(input);
    let env = Environment::new();
    monkey::evaluator::eval_program(&program, &env)
}

#[test]
fn test_quote_integer_and_identifier() {
    let cases = [
        ("quote(5)", "5"),
        ("quote(5 + 8)", "(5 + 8)"),
        ("quote(foobar)", "foobar"),
        ("quote(foobar + barfoo)", "(foobar + barfoo)"),
    ];

    for (input, expected) in cases {
        match eval_program(input) {
            Value::Quote(node) => assert_eq!(node.to_string(), expected, "input was {:?}", input),
            other => panic!("expected quote for {:?}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_quote_preserves_free_identifier_despite_local_binding() {
    let input = "let foobar = 8;\nquote(foobar)";
    match eval_program(input) {
        Value::Quote(node) => assert_eq!(node.to_string(), "foobar"),
        other => panic!("expected quote, got {:?}", other),
    }
}

#[test]
fn test_unquote_splices_evaluated_values() {
    let cases = [
        ("quote(unquote(4))", "4"),
        ("quote(unquote(4 + 4))", "8"),
        ("quote(8 + unquote(4 + 4))", "(8 + 8)"),
        ("quote(unquote(4 + 4) + 8)", "(8 + 8)"),
    ];

    for (input, expected) in cases {
        match eval_program(input) {
            Value::Quote(node) => assert_eq!(node.to_string(), expected, "input was {:?}", input),
            other => panic!("expected quote for {:?}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_unquote_of_bound_identifier() {
    let input = "let foobar = 8;\nquote(unquote(foobar))";
    match eval_program(input) {
        Value::Quote(node) => assert_eq!(node.to_string(), "8"),
        other => panic!("expected quote, got {:?}", other),
    }
}

#[test]
fn test_unquote_of_quote_call_splices_raw_ast() {
    let input = "quote(unquote(true))";
    match eval_program(input) {
        Value::Quote(node) => assert_eq!(node.to_string(), "true"),
        other => panic!("expected quote, got {:?}", other),
    }
}

#[test]
fn test_define_macros_removes_macro_let_and_binds_macro_value() {
    let mut program = parse(
        r#"
        let number = 1;
        let function = fn(x, y) { x + y };
        let myMacro = macro(x, y) { x + y; };
        "#,
    );
    let env = Environment::new();
    define_macros(&mut program, &env);

    assert_eq!(program.statements.len(), 2);
    assert!(env.get("number").is_none());
    assert!(env.get("function").is_none());
    assert!(matches!(env.get("myMacro"), Some(Value::Macro(_))));
}

#[test]
fn test_expand_simple_macro() {
    let mut program = parse(
        r#"
        let infixExpression = macro() { quote(1 + 2); };
        infixExpression();
        "#,
    );
    let env = Environment::new();
    define_macros(&mut program, &env);
    let expanded = expand_macros(program, &env);

    assert_eq!(expanded.to_string(), "(1 + 2)");
}

#[test]
fn test_expand_macro_with_unquoted_arguments() {
    let mut program = parse(
        r#"
        let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
        reverse(2 + 2, 10 - 5);
        "#,
    );
    let env = Environment::new();
    define_macros(&mut program, &env);
    let expanded = expand_macros(program, &env);

    assert_eq!(expanded.to_string(), "((10 - 5) - (2 + 2))");
}

#[test]
fn test_expand_macro_that_builds_conditional_via_unquote() {
    let mut program = parse(
        r#"
        let unless = macro(condition, consequence, alternative) {
            quote(if (!(unquote(condition))) {
                unquote(consequence);
            } else {
                unquote(alternative);
            });
        };

        unless(10 > 5, puts("not greater"), puts("greater"));
        "#,
    );
    let env = Environment::new();
    define_macros(&mut program, &env);
    let expanded = expand_macros(program, &env);

    assert_eq!(
        expanded.to_string(),
        "if(!(10 > 5)) puts(not greater)else puts(greater)"
    );
}
