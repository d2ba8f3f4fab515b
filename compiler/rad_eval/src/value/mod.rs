//! Runtime values.
//!
//! [`Value`] is a closed union matched exhaustively wherever it is consumed.
//! Lists and maps are reference types: cloning a `Value::List` aliases the
//! same storage, so `b = a; b[0] = 9` is visible through `a`.

mod display;
mod map;
mod string;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::FnDef;

use crate::builtins::Builtin;
use crate::environment::Environment;

pub use display::format_float;
pub use map::{MapData, MapKey, RadMap};
pub use string::{display_width, Color, RadString, Segment, TextAttrs};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(RadString),
    List(RadList),
    Map(RadMap),
    Fn(FnValue),
    Error(Rc<RadError>),
}

impl Value {
    pub fn str(text: impl Into<String>) -> Value {
        Value::Str(RadString::new(text))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(RadList::new(items))
    }

    pub fn error(message: impl Into<String>) -> Value {
        Value::Error(Rc::new(RadError::new(message)))
    }

    /// Name used by `type_of` and in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Fn(_) => "fn",
            Value::Error(_) => "error",
        }
    }

    /// `0`, `0.0`, `""`, `[]`, `{}`, `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Fn(_) | Value::Error(_) => true,
        }
    }

    /// Language equality: numbers compare across int and float, errors
    /// compare to strings by message, containers compare deeply. Any other
    /// mix of kinds is unequal.
    #[expect(
        clippy::cast_precision_loss,
        reason = "int/float equality compares in float space"
    )]
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a.message == b.message,
            (Value::Str(s), Value::Error(e)) | (Value::Error(e), Value::Str(s)) => *s == e.message,
            (Value::List(a), Value::List(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|other| v.equals(other)))
            }
            (Value::Fn(a), Value::Fn(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of an int or float.
    #[expect(clippy::cast_precision_loss, reason = "int widens to float")]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_rad_str(&self) -> Option<&RadString> {
        match self {
            Value::Str(s) => Some(s),
            Value::Error(e) => Some(&e.message),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&RadList> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&RadMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr(false))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

impl From<RadString> for Value {
    fn from(s: RadString) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<RadMap> for Value {
    fn from(map: RadMap) -> Self {
        Value::Map(map)
    }
}

/// Shared, mutable list. Cloning aliases the same storage.
#[derive(Clone, Default)]
pub struct RadList(Rc<RefCell<Vec<Value>>>);

impl RadList {
    pub fn new(items: Vec<Value>) -> Self {
        RadList(Rc::new(RefCell::new(items)))
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        self.0.borrow_mut()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, needle: &Value) -> bool {
        self.0.borrow().iter().any(|v| v.equals(needle))
    }

    pub fn ptr_eq(&self, other: &RadList) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RadList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

/// Error value: a message plus the code it was raised with.
#[derive(Clone, Debug)]
pub struct RadError {
    pub message: RadString,
    pub code: ErrorCode,
    pub hint: Option<String>,
}

impl RadError {
    pub fn new(message: impl Into<String>) -> Self {
        RadError {
            message: RadString::new(message),
            code: ErrorCode::GenericRuntime,
            hint: None,
        }
    }
}

/// A callable value.
#[derive(Clone)]
pub enum FnValue {
    User(Rc<UserFn>),
    Builtin(Rc<Builtin>),
}

impl FnValue {
    pub fn name(&self) -> Option<&str> {
        match self {
            FnValue::User(f) => f.def.name.as_ref().map(|n| n.name.as_str()),
            FnValue::Builtin(b) => Some(b.name()),
        }
    }

    pub fn ptr_eq(&self, other: &FnValue) -> bool {
        match (self, other) {
            (FnValue::User(a), FnValue::User(b)) => Rc::ptr_eq(a, b),
            (FnValue::Builtin(a), FnValue::Builtin(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A script-defined function together with the scope it closes over.
pub struct UserFn {
    pub def: Rc<FnDef>,
    pub closure: Environment,
}

#[cfg(test)]
mod tests;
