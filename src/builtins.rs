// ABOUTME: Fixed name -> builtin table consulted when an identifier lookup misses the environment

use crate::object::Value;
use std::rc::Rc;

/// Resolves `name` against the fixed built-in table, returning `None` if no
/// built-in by that name exists (the evaluator then reports "identifier not found").
pub fn lookup(name: &str) -> Option<Value> {
    let f: crate::object::BuiltinFn = match name {
        "len" => builtin_len,
        "first" => builtin_first,
        "last" => builtin_last,
        "rest" => builtin_rest,
        "push" => builtin_push,
        _ => return None,
    };
    Some(Value::Builtin(f))
}

fn builtin_len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::new_error(format!(
            "wrong number of arguments. got = {}, want = 1",
            args.len()
        ));
    }

    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(items) => Value::Integer(items.len() as i64),
        other => Value::new_error(format!(
            "argument to `len` is not supported. got = {}",
            other.object_type()
        )),
    }
}

fn builtin_first(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::new_error(format!(
            "wrong number of arguments. got = {}, want = 1",
            args.len()
        ));
    }

    match &args[0] {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => Value::new_error(format!(
            "argument to `first` must be ARRAY. got = {}",
            other.object_type()
        )),
    }
}

fn builtin_last(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::new_error(format!(
            "wrong number of arguments. got = {}, want = 1",
            args.len()
        ));
    }

    match &args[0] {
        Value::Array(items) => items.last().cloned().unwrap_or(Value::Null),
        other => Value::new_error(format!(
            "argument to `last` must be ARRAY. got = {}",
            other.object_type()
        )),
    }
}

fn builtin_rest(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::new_error(format!(
            "wrong number of arguments. got = {}, want = 1",
            args.len()
        ));
    }

    match &args[0] {
        Value::Array(items) => {
            if items.is_empty() {
                Value::Null
            } else {
                Value::Array(Rc::new(items[1..].to_vec()))
            }
        }
        other => Value::new_error(format!(
            "argument to `rest` must be ARRAY. got = {}",
            other.object_type()
        )),
    }
}

fn builtin_push(args: &[Value]) -> Value {
    if args.len() != 2 {
        return Value::new_error(format!(
            "wrong number of arguments. got = {}, want = 2",
            args.len()
        ));
    }

    match &args[0] {
        Value::Array(items) => {
            let mut new_items = (**items).clone();
            new_items.push(args[1].clone());
            Value::Array(Rc::new(new_items))
        }
        other => Value::new_error(format!(
            "argument to `push` must be ARRAY. got = {}",
            other.object_type()
        )),
    }
}
