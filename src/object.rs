// ABOUTME: Runtime value types - tagged variants, hashability, and Inspect() stringification

use crate::ast::{BlockStatement, Identifier};
use crate::env::Environment;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Discriminant used as the first half of a [`HashKey`] and for error messages
/// (`"got = <Type>"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
    Quote,
    Macro,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::String => "STRING",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
            ObjectType::Quote => "QUOTE",
            ObjectType::Macro => "MACRO",
        };
        write!(f, "{}", s)
    }
}

/// The key under which a hashable [`Value`] is stored in a [`Value::Hash`].
///
/// Two values that are `==` in the language hash and compare equal here too:
/// `(type_tag, canonical_payload)` is the whole identity, so `true` built from
/// two separate `Boolean` literals still collides on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

/// A runtime value produced by evaluation.
#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(Rc<String>),
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashMap<HashKey, (Value, Value)>>),
    Function(Rc<FunctionValue>),
    Builtin(BuiltinFn),
    ReturnValue(Box<Value>),
    Error(Rc<String>),
    Quote(Rc<crate::ast::Expression>),
    Macro(Rc<MacroValue>),
}

/// A closure: the parameter list, body, and the environment captured at
/// definition time (not the caller's environment).
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

pub struct MacroValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

/// A built-in procedure: a plain function pointer, matching the fixed table
/// in spec.md's built-ins section (no closures over interpreter state).
pub type BuiltinFn = fn(&[Value]) -> Value;

impl Value {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Value::Integer(_) => ObjectType::Integer,
            Value::Boolean(_) => ObjectType::Boolean,
            Value::Null => ObjectType::Null,
            Value::String(_) => ObjectType::String,
            Value::Array(_) => ObjectType::Array,
            Value::Hash(_) => ObjectType::Hash,
            Value::Function(_) => ObjectType::Function,
            Value::Builtin(_) => ObjectType::Builtin,
            Value::ReturnValue(_) => ObjectType::ReturnValue,
            Value::Error(_) => ObjectType::Error,
            Value::Quote(_) => ObjectType::Quote,
            Value::Macro(_) => ObjectType::Macro,
        }
    }

    /// Is this an `Error` value? Evaluator branches check this before doing
    /// further work so an error short-circuits instead of being operated on.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// The hash key this value would occupy as a hash literal key, or `None`
    /// if the value's kind isn't hashable (Array, Function, Null, ...).
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(i) => Some(HashKey::Integer(*i)),
            Value::Boolean(b) => Some(HashKey::Boolean(*b)),
            Value::String(s) => Some(HashKey::String((**s).clone())),
            _ => None,
        }
    }

    pub fn new_error(message: impl Into<String>) -> Value {
        Value::Error(Rc::new(message.into()))
    }

    pub fn new_string(s: impl Into<String>) -> Value {
        Value::String(Rc::new(s.into()))
    }

    /// Truthiness used by `if`: anything but `false` and `Null` is truthy
    /// (notably `0` is truthy).
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    /// The user-facing stringification used by the REPL and `Inspect()`-style tests.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::String(s) => (**s).clone(),
            Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.inspect()).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(func) => {
                let params: Vec<String> = func.parameters.iter().map(|p| p.to_string()).collect();
                format!("fn({}) {{\n{}\n}}", params.join(", "), func.body)
            }
            Value::Builtin(_) => "builtin function".to_string(),
            Value::ReturnValue(v) => v.inspect(),
            Value::Error(msg) => format!("ERROR: {}", msg),
            Value::Quote(node) => format!("QUOTE({})", node),
            Value::Macro(mac) => {
                let params: Vec<String> = mac.parameters.iter().map(|p| p.to_string()).collect();
                format!("macro({}) {{\n{}\n}}", params.join(", "), mac.body)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.object_type(), self.inspect())
    }
}
