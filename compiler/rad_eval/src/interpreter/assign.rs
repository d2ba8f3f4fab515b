//! Assignment targets: `a = ..`, `a[i] = ..`, `a.b[c] = ..`, and `del`.

use rad_ir::ast::{PathSegment, Target};

use super::expr::{get_field, get_index, resolve_index};
use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{cannot_index, invalid_map_key, key_not_found, undefined_variable, EvalResult};
use crate::value::Value;

/// Last step of a target path, with its index already evaluated.
enum Place {
    Index(Value),
    Field(String),
}

impl Interpreter<'_> {
    /// Store `value` at `target`. A bare name binds in the current frame;
    /// a path mutates the container it ends in.
    pub(super) fn assign(&mut self, target: &Target, value: Value, env: &Environment) -> EvalResult<()> {
        if target.segments.is_empty() {
            env.define(&target.root.name, value);
            return Ok(());
        }
        let (container, place) = self.resolve_place(target, env)?;
        store(&container, place, value).map_err(|e| e.or_span(target.span))
    }

    /// Current value at `target`, for compound assignment.
    pub(super) fn read_target(&mut self, target: &Target, env: &Environment) -> EvalResult<Value> {
        if target.segments.is_empty() {
            return self.root_value(target, env);
        }
        let (container, place) = self.resolve_place(target, env)?;
        match place {
            Place::Index(index) => get_index(&container, &index),
            Place::Field(name) => get_field(&container, &name),
        }
        .map_err(|e| e.or_span(target.span))
    }

    /// `del target`.
    pub(super) fn delete(&mut self, target: &Target, env: &Environment) -> EvalResult<()> {
        if target.segments.is_empty() {
            return env
                .remove(&target.root.name)
                .map(drop)
                .ok_or_else(|| undefined_variable(&target.root.name).with_span(target.root.span));
        }
        let (container, place) = self.resolve_place(target, env)?;
        match (&container, place) {
            (Value::List(list), Place::Index(index)) => {
                let i = index.as_int().ok_or_else(|| cannot_index(&container))?;
                let i = resolve_index(i, list.len())?;
                list.borrow_mut().remove(i);
                Ok(())
            }
            (Value::Map(map), Place::Index(key)) => map
                .remove(&key)
                .map(drop)
                .ok_or_else(|| key_not_found(&key)),
            (Value::Map(map), Place::Field(name)) => {
                let key = Value::str(name);
                map.remove(&key).map(drop).ok_or_else(|| key_not_found(&key))
            }
            _ => Err(cannot_index(&container)),
        }
        .map_err(|e| e.or_span(target.span))
    }

    fn root_value(&self, target: &Target, env: &Environment) -> EvalResult<Value> {
        env.lookup(&target.root.name)
            .ok_or_else(|| undefined_variable(&target.root.name).with_span(target.root.span))
    }

    /// Walk every segment but the last, returning the container the last one
    /// addresses.
    fn resolve_place(&mut self, target: &Target, env: &Environment) -> EvalResult<(Value, Place)> {
        let mut current = self.root_value(target, env)?;
        let Some((last, path)) = target.segments.split_last() else {
            return Err(cannot_index(&current).with_span(target.span));
        };
        for segment in path {
            current = match segment {
                PathSegment::Index(expr) => {
                    let index = self.eval_expr(expr, env)?;
                    get_index(&current, &index).map_err(|e| e.with_span(expr.span))?
                }
                PathSegment::Field(name) => {
                    get_field(&current, &name.name).map_err(|e| e.with_span(name.span))?
                }
            };
        }
        let place = match last {
            PathSegment::Index(expr) => Place::Index(self.eval_expr(expr, env)?),
            PathSegment::Field(name) => Place::Field(name.name.clone()),
        };
        Ok((current, place))
    }
}

fn store(container: &Value, place: Place, value: Value) -> EvalResult<()> {
    match (container, place) {
        (Value::List(list), Place::Index(index)) => {
            let i = index.as_int().ok_or_else(|| cannot_index(container))?;
            let i = resolve_index(i, list.len())?;
            list.borrow_mut()[i] = value;
            Ok(())
        }
        (Value::Map(map), Place::Index(key)) => {
            if map.insert(key.clone(), value) {
                Ok(())
            } else {
                Err(invalid_map_key(&key))
            }
        }
        (Value::Map(map), Place::Field(name)) => {
            map.set_str(&name, value);
            Ok(())
        }
        _ => Err(cannot_index(container)),
    }
}
