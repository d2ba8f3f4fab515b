//! Lexical scopes.
//!
//! Scopes form a parent-linked chain of shared frames. Only function and
//! lambda calls open a new frame, and its parent is the frame the function
//! was *defined* in, so closures read through to later changes of captured
//! names. `if`, `for`, `while`, and `switch` bodies run in the enclosing
//! frame.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// Single-threaded shared cell for scope frames.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &LocalScope<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

/// One frame of bindings.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    #[inline]
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
        } else {
            self.bindings.insert(name.to_string(), value);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.borrow().lookup(name)
    }

    /// Remove the nearest binding of `name`.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.remove(name) {
            return Some(value);
        }
        self.parent.as_ref()?.borrow_mut().remove(name)
    }
}

/// Handle to the innermost frame.
#[derive(Clone)]
pub struct Environment {
    scope: LocalScope<Scope>,
}

impl Environment {
    /// A fresh global frame.
    pub fn new() -> Self {
        Environment {
            scope: LocalScope::new(Scope::default()),
        }
    }

    /// A new frame whose parent is this one; used for function calls with
    /// the callee's closure environment as `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment {
            scope: LocalScope::new(Scope::with_parent(self.scope.clone())),
        }
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    #[inline]
    pub fn define(&self, name: &str, value: Value) {
        self.scope.borrow_mut().define(name, value);
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.scope.borrow().lookup(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.scope.borrow_mut().remove(name)
    }

    pub fn same_frame(&self, other: &Environment) -> bool {
        self.scope.ptr_eq(&other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&String> = scope.bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_reads_through_to_parent() {
        let global = Environment::new();
        global.define("a", Value::Int(2));
        let child = global.child();
        assert_eq!(child.lookup("a"), Some(Value::Int(2)));

        global.define("a", Value::Int(5));
        assert_eq!(child.lookup("a"), Some(Value::Int(5)));
    }

    #[test]
    fn test_define_in_child_shadows_parent() {
        let global = Environment::new();
        global.define("a", Value::Int(1));
        let child = global.child();
        child.define("a", Value::Int(9));
        assert_eq!(child.lookup("a"), Some(Value::Int(9)));
        assert_eq!(global.lookup("a"), Some(Value::Int(1)));
    }

    #[test]
    fn test_remove_nearest_binding() {
        let global = Environment::new();
        global.define("a", Value::Int(1));
        let child = global.child();
        assert_eq!(child.remove("a"), Some(Value::Int(1)));
        assert!(!global.is_defined("a"));
        assert_eq!(child.remove("a"), None);
    }

    #[test]
    fn test_clone_shares_frame() {
        let env = Environment::new();
        let alias = env.clone();
        alias.define("x", Value::Bool(true));
        assert!(env.is_defined("x"));
        assert!(env.same_frame(&alias));
        assert!(!env.same_frame(&env.child()));
    }
}
