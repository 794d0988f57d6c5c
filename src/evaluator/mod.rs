// ABOUTME: Tree-walking evaluator - dispatches on AST node kind against an Environment

pub mod macro_expand;

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::builtins;
use crate::env::Environment;
use crate::object::{FunctionValue, Value};
use std::rc::Rc;

/// Evaluates a whole program: runs each top-level statement in order and
/// unwraps a final `ReturnValue` to its inner value (top level `return` just
/// ends evaluation early, it doesn't escape anywhere).
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;

    for stmt in &program.statements {
        result = eval_statement(stmt, env);

        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }

    result
}

/// Evaluates a block's statements in order without unwrapping a trailing
/// `ReturnValue` - the caller (a function call or nested block) decides
/// whether to propagate it further or unwrap it.
pub(crate) fn eval_block_statement(block: &BlockStatement, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;

    for stmt in &block.statements {
        result = eval_statement(stmt, env);

        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_statement(stmt: &Statement, env: &Rc<Environment>) -> Value {
    match stmt {
        Statement::Let(node) => {
            let value = eval_expression(&node.value, env);
            if value.is_error() {
                return value;
            }
            env.set(node.name.value.clone(), value);
            Value::Null
        }
        Statement::Return(node) => {
            let value = eval_expression(&node.value, env);
            if value.is_error() {
                return value;
            }
            Value::ReturnValue(Box::new(value))
        }
        Statement::Expression(node) => eval_expression(&node.expression, env),
        Statement::Block(node) => eval_block_statement(node, env),
    }
}

pub(crate) fn eval_expression(expr: &Expression, env: &Rc<Environment>) -> Value {
    match expr {
        Expression::IntegerLiteral(node) => Value::Integer(node.value),
        Expression::StringLiteral(node) => Value::new_string(node.value.clone()),
        Expression::Boolean(node) => Value::Boolean(node.value),
        Expression::Identifier(node) => eval_identifier(&node.value, env),
        Expression::Prefix(node) => {
            let right = eval_expression(&node.right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(&node.operator, right)
        }
        Expression::Infix(node) => {
            let left = eval_expression(&node.left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(&node.right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(&node.operator, left, right)
        }
        Expression::If(node) => {
            let condition = eval_expression(&node.condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.is_truthy() {
                eval_block_statement(&node.consequence, env)
            } else if let Some(alt) = &node.alternative {
                eval_block_statement(alt, env)
            } else {
                Value::Null
            }
        }
        Expression::FunctionLiteral(node) => Value::Function(Rc::new(FunctionValue {
            parameters: node.parameters.clone(),
            body: node.body.clone(),
            env: Rc::clone(env),
        })),
        Expression::Call(node) => eval_call_expression(node, env),
        Expression::ArrayLiteral(node) => {
            let elements = match eval_expressions(&node.elements, env) {
                Ok(values) => values,
                Err(err) => return err,
            };
            Value::Array(Rc::new(elements))
        }
        Expression::Index(node) => {
            let left = eval_expression(&node.left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(&node.index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        Expression::HashLiteral(node) => eval_hash_literal(node, env),
        // MacroLiteral expressions only ever exist between parse and macro
        // expansion; by evaluation time `DefineMacros` has stripped every
        // `let`-bound one, and a bare, unbound one has no runtime meaning.
        Expression::MacroLiteral(_) => {
            Value::new_error("macro literal is not a valid runtime expression")
        }
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Value {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return builtin;
    }
    Value::new_error(format!("identifier not found: {}", name))
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => Value::Boolean(!right.is_truthy()),
        "-" => match right {
            Value::Integer(i) => Value::Integer(-i),
            other => Value::new_error(format!("unknown operator: -{}", other.object_type())),
        },
        other => Value::new_error(format!(
            "unknown operator: {}{}",
            other,
            right.object_type()
        )),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ if std::mem::discriminant(&left) == std::mem::discriminant(&right) => match operator {
            "==" => Value::Boolean(values_equal(&left, &right)),
            "!=" => Value::Boolean(!values_equal(&left, &right)),
            _ => Value::new_error(format!(
                "unknown operator: {} {} {}",
                left.object_type(),
                operator,
                right.object_type()
            )),
        },
        _ => Value::new_error(format!(
            "type mismatch: {} {} {}",
            left.object_type(),
            operator,
            right.object_type()
        )),
    }
}

/// Identity comparison for `==`/`!=` on non-arithmetic types: sufficient
/// because `Boolean` has exactly two values and `Null` exactly one, so
/// structural and identity comparison coincide here.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left + right),
        "-" => Value::Integer(left - right),
        "*" => Value::Integer(left * right),
        "/" => {
            if right == 0 {
                Value::new_error("division by zero")
            } else {
                Value::Integer(left / right)
            }
        }
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        other => Value::new_error(format!("unknown operator: INTEGER {} INTEGER", other)),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::new_string(format!("{}{}", left, right)),
        other => Value::new_error(format!("unknown operator: STRING {} STRING", other)),
    }
}

fn eval_expressions(exprs: &[Expression], env: &Rc<Environment>) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_call_expression(node: &crate::ast::CallExpression, env: &Rc<Environment>) -> Value {
    if let Expression::Identifier(ident) = node.function.as_ref() {
        if ident.value == "quote" {
            let Some(arg) = node.arguments.first() else {
                return Value::new_error("wrong number of arguments. got = 0, want = 1");
            };
            return macro_expand::quote(arg.clone(), env);
        }
    }

    let function = eval_expression(&node.function, env);
    if function.is_error() {
        return function;
    }

    let args = match eval_expressions(&node.arguments, env) {
        Ok(values) => values,
        Err(err) => return err,
    };

    apply_function(function, args)
}

fn apply_function(function: Value, args: Vec<Value>) -> Value {
    match function {
        Value::Function(func) => {
            let call_env = Environment::new_enclosed(Rc::clone(&func.env));
            for (i, param) in func.parameters.iter().enumerate() {
                let value = args.get(i).cloned().unwrap_or(Value::Null);
                call_env.set(param.value.clone(), value);
            }
            let result = eval_block_statement(&func.body, &call_env);
            match result {
                Value::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(f) => f(&args),
        other => Value::new_error(format!("not a function: {}", other.object_type())),
    }
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(items), Value::Integer(i)) => {
            if *i < 0 || *i as usize >= items.len() {
                Value::Null
            } else {
                items[*i as usize].clone()
            }
        }
        (Value::Hash(pairs), _) => match index.hash_key() {
            Some(key) => pairs
                .get(&key)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Null),
            None => Value::new_error(format!("unusable as hash key: {}", index.object_type())),
        },
        _ => Value::new_error(format!(
            "index operator not supported: {}",
            left.object_type()
        )),
    }
}

fn eval_hash_literal(node: &crate::ast::HashLiteral, env: &Rc<Environment>) -> Value {
    let mut pairs = std::collections::HashMap::new();

    for pair in &node.pairs {
        let key = eval_expression(&pair.key, env);
        if key.is_error() {
            return key;
        }

        let Some(hash_key) = key.hash_key() else {
            return Value::new_error(format!("unusable as hash key: {}", key.object_type()));
        };

        let value = eval_expression(&pair.value, env);
        if value.is_error() {
            return value;
        }

        pairs.insert(hash_key, (key, value));
    }

    Value::Hash(Rc::new(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn eval(input: &str) -> Value {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "parse errors: {:?}", parser.errors());
        let env = Environment::new();
        eval_program(&program, &env)
    }

    #[test]
    fn test_eval_integer_expression() {
        let cases = [
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("50 / 2 * 2 + 10", 60),
            ("5 * (2 + 10)", 60),
        ];
        for (input, expected) in cases {
            assert!(matches!(eval(input), Value::Integer(v) if v == expected), "{}", input);
        }
    }

    #[test]
    fn test_eval_boolean_expression() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("true == true", true),
            ("(1 < 2) == true", true),
        ];
        for (input, expected) in cases {
            assert!(matches!(eval(input), Value::Boolean(v) if v == expected), "{}", input);
        }
    }

    #[test]
    fn test_bang_operator() {
        let cases = [("!true", false), ("!false", true), ("!5", false), ("!!5", true)];
        for (input, expected) in cases {
            assert!(matches!(eval(input), Value::Boolean(v) if v == expected), "{}", input);
        }
    }

    #[test]
    fn test_if_else_truthiness_including_zero() {
        assert!(matches!(eval("if (true) { 10 }"), Value::Integer(10)));
        assert!(matches!(eval("if (false) { 10 }"), Value::Null));
        assert!(matches!(eval("if (0) { 10 }"), Value::Integer(10)));
        assert!(matches!(eval("if (1 < 2) { 10 } else { 20 }"), Value::Integer(10)));
        assert!(matches!(eval("if (1 > 2) { 10 } else { 20 }"), Value::Integer(20)));
    }

    #[test]
    fn test_return_statements() {
        assert!(matches!(eval("return 10;"), Value::Integer(10)));
        assert!(matches!(eval("return 2 * 5; 9;"), Value::Integer(10)));
        assert!(matches!(
            eval("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
            Value::Integer(10)
        ));
    }

    #[test]
    fn test_error_handling() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
            ("10 / 0", "division by zero"),
        ];
        for (input, expected) in cases {
            match eval(input) {
                Value::Error(msg) => assert_eq!(*msg, expected, "input was {}", input),
                other => panic!("expected error for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_let_statements() {
        assert!(matches!(eval("let a = 5; a;"), Value::Integer(5)));
        assert!(matches!(eval("let a = 5 * 5; a;"), Value::Integer(25)));
        assert!(matches!(eval("let a = 5; let b = a; b;"), Value::Integer(5)));
    }

    #[test]
    fn test_closures_capture_definition_environment() {
        let input = "
            let newAdder = fn(x) {
                fn(y) { x + y };
            };
            let addTwo = newAdder(2);
            addTwo(2);
        ";
        assert!(matches!(eval(input), Value::Integer(4)));
    }

    #[test]
    fn test_string_concatenation() {
        match eval(r#""Hello" + " " + "World!""#) {
            Value::String(s) => assert_eq!(*s, "Hello World!"),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_array_literals_and_indexing() {
        match eval("[1, 2 * 2, 3 + 3]") {
            Value::Array(items) => {
                assert_eq!(items.len(), 3);
                assert!(matches!(items[1], Value::Integer(4)));
            }
            other => panic!("expected array, got {:?}", other),
        }

        assert!(matches!(eval("[1, 2, 3][0]"), Value::Integer(1)));
        assert!(matches!(eval("[1, 2, 3][3]"), Value::Null));
        assert!(matches!(eval("[1, 2, 3][-1]"), Value::Null));
    }

    #[test]
    fn test_hash_literals_and_indexing() {
        let input = r#"
            let two = "two";
            {
                "one": 10 - 9,
                two: 1 + 1,
                "thr" + "ee": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            }
        "#;
        match eval(input) {
            Value::Hash(pairs) => assert_eq!(pairs.len(), 6),
            other => panic!("expected hash, got {:?}", other),
        }

        assert!(matches!(eval(r#"{"foo": 5}["foo"]"#), Value::Integer(5)));
        assert!(matches!(eval(r#"{"foo": 5}["bar"]"#), Value::Null));
        assert!(matches!(eval(r#"let key = "foo"; {"foo": 5}[key]"#), Value::Integer(5)));
        assert!(matches!(eval("{5: 5}[5]"), Value::Integer(5)));
        assert!(matches!(eval("{true: 5}[true]"), Value::Integer(5)));
    }

    #[test]
    fn test_builtin_functions() {
        assert!(matches!(eval(r#"len("")"#), Value::Integer(0)));
        assert!(matches!(eval(r#"len("four")"#), Value::Integer(4)));
        assert!(matches!(eval(r#"len("hello world")"#), Value::Integer(11)));
        match eval("len(1)") {
            Value::Error(msg) => assert_eq!(*msg, "argument to `len` is not supported. got = INTEGER"),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(matches!(eval("push([1], 2)[1]"), Value::Integer(2)));
    }
}
