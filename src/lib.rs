// ABOUTME: Library root - wires together lexer, parser, macro expansion, and evaluator

pub mod ast;
pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

use env::Environment;
use error::MonkeyError;
use lexer::Lexer;
use object::Value;
use parser::Parser;
use std::rc::Rc;

/// Runs one unit of source text through the full pipeline: parse, expand
/// macros against `macro_env`, then evaluate against `env`.
///
/// `macro_env` and `env` are kept separate (mirroring spec.md's "persistent
/// environment and a persistent macro environment") so that macro bindings
/// never leak into ordinary variable lookup.
pub fn eval_source(
    source: &str,
    env: &Rc<Environment>,
    macro_env: &Rc<Environment>,
) -> Result<Value, MonkeyError> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let mut program = parser.parse_program();

    if !parser.errors().is_empty() {
        return Err(MonkeyError::Parse(parser.errors().join("\n")));
    }

    evaluator::macro_expand::define_macros(&mut program, macro_env);
    let expanded = evaluator::macro_expand::expand_macros(program, macro_env);

    Ok(evaluator::eval_program(&expanded, env))
}
