//! Insertion-ordered maps.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::Value;

/// Hashable form of a map key.
///
/// Keys compare the way `==` does: `1` and `1.0` are the same key, and an
/// error key matches a string with the same message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapKey {
    Str(String),
    Int(i64),
    Float(u64),
    Bool(bool),
}

impl MapKey {
    /// `None` for values that cannot be keys (lists, maps, functions, null).
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "whole floats inside the i64 range key like the equal int"
    )]
    pub fn from_value(value: &Value) -> Option<MapKey> {
        match value {
            Value::Str(s) => Some(MapKey::Str(s.plain().into_owned())),
            Value::Error(e) => Some(MapKey::Str(e.message.plain().into_owned())),
            Value::Int(i) => Some(MapKey::Int(*i)),
            Value::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(MapKey::Int(*f as i64))
                } else {
                    Some(MapKey::Float(f.to_bits()))
                }
            }
            Value::Bool(b) => Some(MapKey::Bool(*b)),
            Value::Null | Value::List(_) | Value::Map(_) | Value::Fn(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapData {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<MapKey, usize>,
}

impl MapData {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let key = MapKey::from_value(key)?;
        self.index.get(&key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        MapKey::from_value(key).is_some_and(|k| self.index.contains_key(&k))
    }

    /// Insert or overwrite. Returns `false` if `key` cannot be a map key.
    pub fn insert(&mut self, key: Value, value: Value) -> bool {
        let Some(hashed) = MapKey::from_value(&key) else {
            return false;
        };
        if let Some(&i) = self.index.get(&hashed) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(hashed, self.entries.len());
            self.entries.push((key, value));
        }
        true
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let hashed = MapKey::from_value(key)?;
        let i = self.index.remove(&hashed)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Shared, mutable map. Cloning aliases the same storage.
#[derive(Clone, Debug, Default)]
pub struct RadMap(Rc<RefCell<MapData>>);

impl RadMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs; invalid keys are reported as `Err` with the key.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Value, Value)>) -> Result<Self, Value> {
        let mut data = MapData::default();
        for (key, value) in pairs {
            if MapKey::from_value(&key).is_none() {
                return Err(key);
            }
            data.insert(key, value);
        }
        Ok(RadMap(Rc::new(RefCell::new(data))))
    }

    pub fn borrow(&self) -> Ref<'_, MapData> {
        self.0.borrow()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Convenience lookup by string key.
    pub fn get_str(&self, key: &str) -> Option<Value> {
        self.get(&Value::str(key))
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn insert(&self, key: Value, value: Value) -> bool {
        self.0.borrow_mut().insert(key, value)
    }

    pub fn set_str(&self, key: &str, value: Value) {
        self.0.borrow_mut().insert(Value::str(key), value);
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        self.0.borrow_mut().remove(key)
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().values().cloned().collect()
    }

    /// Whether both handles share storage.
    pub fn ptr_eq(&self, other: &RadMap) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// New map with the same entries.
    #[must_use]
    pub fn shallow_copy(&self) -> RadMap {
        RadMap(Rc::new(RefCell::new(self.0.borrow().clone())))
    }
}
