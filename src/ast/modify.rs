// ABOUTME: Generic post-order AST transformer - maps a function over every expression slot

use super::{BlockStatement, Expression, HashPair, Program, Statement};
#[cfg(test)]
use super::{ArrayLiteral, HashLiteral, InfixExpression, IntegerLiteral};

/// Walks `expr` post-order, calling `f` on every expression slot (including `expr`
/// itself last) and replacing the slot with whatever `f` returns.
///
/// Literals and identifiers have no child slots, so they only get the direct call to
/// `f`; compound expressions first have each of their children rewritten.
pub fn expression(expr: Expression, f: &mut dyn FnMut(Expression) -> Expression) -> Expression {
    let rewritten = match expr {
        Expression::Prefix(mut node) => {
            node.right = Box::new(expression(*node.right, f));
            Expression::Prefix(node)
        }
        Expression::Infix(mut node) => {
            node.left = Box::new(expression(*node.left, f));
            node.right = Box::new(expression(*node.right, f));
            Expression::Infix(node)
        }
        Expression::Index(mut node) => {
            node.left = Box::new(expression(*node.left, f));
            node.index = Box::new(expression(*node.index, f));
            Expression::Index(node)
        }
        Expression::If(mut node) => {
            node.condition = Box::new(expression(*node.condition, f));
            node.consequence = block(node.consequence, f);
            node.alternative = node.alternative.map(|alt| block(alt, f));
            Expression::If(node)
        }
        Expression::FunctionLiteral(mut node) => {
            node.body = block(node.body, f);
            Expression::FunctionLiteral(node)
        }
        Expression::ArrayLiteral(mut node) => {
            node.elements = node.elements.into_iter().map(|e| expression(e, f)).collect();
            Expression::ArrayLiteral(node)
        }
        Expression::Call(mut node) => {
            node.function = Box::new(expression(*node.function, f));
            node.arguments = node
                .arguments
                .into_iter()
                .map(|a| expression(a, f))
                .collect();
            Expression::Call(node)
        }
        Expression::HashLiteral(mut node) => {
            node.pairs = node
                .pairs
                .into_iter()
                .map(|pair| HashPair {
                    key: expression(pair.key, f),
                    value: expression(pair.value, f),
                })
                .collect();
            Expression::HashLiteral(node)
        }
        // Identifiers, literals, and macro literals have no expression slots to
        // recurse into; they pass straight through to `f`.
        other => other,
    };

    f(rewritten)
}

/// Walks `stmt`, rewriting every expression slot it directly or transitively owns.
pub fn statement(stmt: Statement, f: &mut dyn FnMut(Expression) -> Expression) -> Statement {
    match stmt {
        Statement::Let(mut node) => {
            node.value = expression(node.value, f);
            Statement::Let(node)
        }
        Statement::Return(mut node) => {
            node.value = expression(node.value, f);
            Statement::Return(node)
        }
        Statement::Expression(mut node) => {
            node.expression = expression(node.expression, f);
            Statement::Expression(node)
        }
        Statement::Block(node) => Statement::Block(block(node, f)),
    }
}

/// Walks every statement of `blk` in order.
pub fn block(mut blk: BlockStatement, f: &mut dyn FnMut(Expression) -> Expression) -> BlockStatement {
    blk.statements = blk.statements.into_iter().map(|s| statement(s, f)).collect();
    blk
}

/// Walks every top-level statement of `program` in order.
pub fn program(mut prog: Program, f: &mut dyn FnMut(Expression) -> Expression) -> Program {
    prog.statements = prog.statements.into_iter().map(|s| statement(s, f)).collect();
    prog
}
