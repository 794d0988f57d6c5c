// ABOUTME: Lexical scope chain - a frame of bindings plus an optional link to its enclosing frame

use crate::object::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One frame of variable bindings.
///
/// Function calls and block-scoped closures each get their own `Environment`
/// enclosing the one active where they were defined, so lookups walk
/// outward through `outer` until a binding is found or the chain runs out.
pub struct Environment {
    store: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// A fresh frame enclosed by `outer`, used for function calls and macro expansion.
    pub fn new_enclosed(outer: Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Looks up `name`, walking outward through enclosing frames.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        match &self.outer {
            Some(outer) => outer.get(name),
            None => None,
        }
    }

    /// Binds `name` to `value` in this frame only.
    ///
    /// Unlike a Scheme-style `set!`, this never walks outward to rebind an
    /// existing binding in an enclosing frame: `let` in the language always
    /// introduces a new local binding, and shadows rather than mutates.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.store.borrow_mut().insert(name.into(), value);
    }
}
