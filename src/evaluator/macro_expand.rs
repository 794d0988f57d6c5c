// ABOUTME: quote/unquote AST capture and user-macro definition/expansion, run between parse and eval

use crate::ast::{self, Expression, MacroLiteral, Program, Statement};
use crate::env::Environment;
use crate::object::{MacroValue, Value};
use crate::token::{Token, TokenKind};
use std::rc::Rc;

/// Scans `program`'s top-level statements for `let NAME = macro(...) {...};`
/// definitions, binds each as a `Macro` value in `env`, and strips those
/// statements from the program.
///
/// Indices are collected first and removed in reverse so that earlier
/// removals never shift the index of a later one still queued for removal.
pub fn define_macros(program: &mut Program, env: &Rc<Environment>) {
    let mut definition_indices = Vec::new();

    for (i, stmt) in program.statements.iter().enumerate() {
        if let Some(macro_literal) = as_macro_definition(stmt) {
            add_macro(stmt, macro_literal, env);
            definition_indices.push(i);
        }
    }

    for &i in definition_indices.iter().rev() {
        program.statements.remove(i);
    }
}

fn as_macro_definition(stmt: &Statement) -> Option<&MacroLiteral> {
    match stmt {
        Statement::Let(let_stmt) => match &let_stmt.value {
            Expression::MacroLiteral(m) => Some(m),
            _ => None,
        },
        _ => None,
    }
}

fn add_macro(stmt: &Statement, macro_literal: &MacroLiteral, env: &Rc<Environment>) {
    let Statement::Let(let_stmt) = stmt else {
        unreachable!("as_macro_definition only returns Some for Let statements")
    };

    let value = Value::Macro(Rc::new(MacroValue {
        parameters: macro_literal.parameters.clone(),
        body: macro_literal.body.clone(),
        env: Rc::clone(env),
    }));

    env.set(let_stmt.name.value.clone(), value);
}

/// Rewrites every macro call in `program` with the AST its macro body
/// produces, via `Modify`. Call sites whose callee is not a macro-bound
/// identifier are left untouched.
pub fn expand_macros(program: Program, env: &Rc<Environment>) -> Program {
    ast::modify::program(program, &mut |expr| expand_macro_call(expr, env))
}

fn expand_macro_call(expr: Expression, env: &Rc<Environment>) -> Expression {
    let Expression::Call(call) = &expr else {
        return expr;
    };

    let Expression::Identifier(ident) = call.function.as_ref() else {
        return expr;
    };

    let Some(Value::Macro(mac)) = env.get(&ident.value) else {
        return expr;
    };

    let call_env = Environment::new_enclosed(Rc::clone(&mac.env));
    for (param, arg) in mac.parameters.iter().zip(call.arguments.iter()) {
        call_env.set(param.value.clone(), Value::Quote(Rc::new(arg.clone())));
    }

    match super::eval_block_statement(&mac.body, &call_env) {
        Value::Quote(node) => (*node).clone(),
        _ => panic!("we only support returning AST-nodes from macros"),
    }
}

/// Captures `node` as a `Quote` value, first splicing the result of
/// evaluating every `unquote(x)` subterm in place of that subterm.
pub fn quote(node: Expression, env: &Rc<Environment>) -> Value {
    let quoted = eval_unquote_calls(node, env);
    Value::Quote(Rc::new(quoted))
}

fn eval_unquote_calls(node: Expression, env: &Rc<Environment>) -> Expression {
    ast::modify::expression(node, &mut |expr| {
        if !is_unquote_call(&expr) {
            return expr;
        }

        let Expression::Call(call) = &expr else {
            return expr;
        };

        if call.arguments.len() != 1 {
            return expr;
        }

        let unquoted = super::eval_expression(&call.arguments[0], env);
        convert_value_to_ast_node(unquoted).unwrap_or(expr)
    })
}

fn is_unquote_call(expr: &Expression) -> bool {
    match expr {
        Expression::Call(call) => call.function.token_literal() == "unquote",
        _ => false,
    }
}

/// `Quote` splices its wrapped node back in; `Integer`/`Boolean` get a fresh
/// literal node; anything else has no AST representation (an open question
/// inherited from the reference implementation, not extended here).
fn convert_value_to_ast_node(value: Value) -> Option<Expression> {
    match value {
        Value::Quote(node) => Some((*node).clone()),
        Value::Integer(n) => Some(Expression::IntegerLiteral(ast::IntegerLiteral {
            token: Token::new(TokenKind::Int, n.to_string()),
            value: n,
        })),
        Value::Boolean(b) => {
            let token = if b {
                Token::new(TokenKind::True, "true")
            } else {
                Token::new(TokenKind::False, "false")
            };
            Some(Expression::Boolean(ast::BooleanLiteral { token, value: b }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(input: &str) -> Program {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "parse errors: {:?}", parser.errors());
        program
    }

    fn first_expression(program: &Program) -> &Expression {
        match &program.statements[0] {
            Statement::Expression(stmt) => &stmt.expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_returns_unevaluated_ast() {
        let env = Environment::new();
        let program = parse("quote(5 + 8)");
        let expr = first_expression(&program).clone();
        let Expression::Call(call) = expr else {
            panic!("expected call expression")
        };
        let quoted = quote(call.arguments[0].clone(), &env);
        match quoted {
            Value::Quote(node) => assert_eq!(node.to_string(), "(5 + 8)"),
            other => panic!("expected quote, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_unquote_splices_evaluated_integer() {
        let env = Environment::new();
        let program = parse("quote(unquote(4 + 4))");
        let expr = first_expression(&program).clone();
        let Expression::Call(call) = expr else {
            panic!("expected call expression")
        };
        let quoted = quote(call.arguments[0].clone(), &env);
        match quoted {
            Value::Quote(node) => assert_eq!(node.to_string(), "8"),
            other => panic!("expected quote, got {:?}", other),
        }
    }

    #[test]
    fn test_define_macros_strips_macro_lets() {
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
    fn test_expand_macros_rewrites_call_site() {
        let mut program = parse(
            r#"
            let infixExpression = macro() { quote(1 + 2); };
            infixExpression();
            "#,
        );
        let env = Environment::new();
        define_macros(&mut program, &env);
        let expanded = expand_macros(program, &env);

        assert_eq!(expanded.statements.len(), 1);
        assert_eq!(expanded.to_string(), "(1 + 2)");
    }

    #[test]
    fn test_expand_macros_with_unquoted_argument() {
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
}
