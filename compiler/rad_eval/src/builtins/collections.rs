//! List and map builtins.

use rad_diagnostic::ErrorCode;

use super::{bool_arg, list_arg, map_arg, some, str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::{integer_overflow, other, EvalResult};
use crate::format::to_rad_string;
use crate::interpreter::Interpreter;
use crate::operators::compare_values;
use crate::value::{RadMap, RadString, Value};

pub(super) const ENTRIES: &[Entry] = &[
    (r"len(_val: list|str|map) -> int", len),
    (r"range(_arg1: num, _arg2: num?, _step: num = 1) -> list", range),
    (r"keys(_map: map) -> list", keys),
    (r"values(_map: map) -> list", values),
    (
        r"sort(_val: list|str, *, reverse: bool = false) -> list|str",
        sort,
    ),
    (r"reverse(_val: str|list) -> str|list", reverse),
    (r"unique(_list: list) -> list", unique),
    (
        r#"join(_list: list, joiner: str = "", prefix: str = "", suffix: str = "") -> str"#,
        join,
    ),
    (r"sum(_nums: num[]) -> num", sum),
    (r"min(_nums: num[]) -> num", min),
    (r"max(_nums: num[]) -> num", max),
    (r"map(_coll: list|map, _fn: fn) -> list|map", map),
    (r"filter(_coll: list|map, _fn: fn) -> list|map", filter),
    (
        r"zip(*_lists: list, *, fill: any?, strict: bool = false) -> list",
        zip,
    ),
    (r"flat_map(_coll: list, _fn: fn?) -> list", flat_map),
    (r"count(_subject: str|list, _inner: any) -> int", count),
];

fn int_len(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

fn len(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let n = match args.get("_val") {
        Value::Str(s) => s.char_len(),
        Value::List(l) => l.len(),
        Value::Map(m) => m.len(),
        _ => 0,
    };
    some(int_len(n))
}

/// `range(end)`, `range(start, end)`, `range(start, end, step)`. All-int
/// arguments produce ints; any float makes every element a float.
fn range(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let first = args.get("_arg1");
    let (start, end) = match args.opt("_arg2") {
        Some(end) => (first, end.clone()),
        None => (Value::Int(0), first),
    };
    let step = args.get("_step");

    if let (Value::Int(start), Value::Int(end), Value::Int(step)) = (&start, &end, &step) {
        let (mut current, end, step) = (*start, *end, *step);
        if step == 0 {
            return Err(zero_step());
        }
        let mut items = Vec::new();
        while (step > 0 && current < end) || (step < 0 && current > end) {
            items.push(Value::Int(current));
            current = current
                .checked_add(step)
                .ok_or_else(|| integer_overflow("range"))?;
        }
        return some(items);
    }

    let start = start.as_float().unwrap_or_default();
    let end = end.as_float().unwrap_or_default();
    let step = step.as_float().unwrap_or(1.0);
    if step == 0.0 {
        return Err(zero_step());
    }
    let mut items = Vec::new();
    let mut i = 0.0;
    loop {
        // Multiplying avoids accumulating rounding error.
        let current = start + i * step;
        if !((step > 0.0 && current < end) || (step < 0.0 && current > end)) {
            break;
        }
        items.push(Value::Float(current));
        i += 1.0;
    }
    some(items)
}

#[cold]
fn zero_step() -> crate::errors::EvalError {
    other(ErrorCode::NumInvalidRange, "range() step cannot be 0")
}

fn keys(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    some(map_arg(args, "_map")?.keys())
}

fn values(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    some(map_arg(args, "_map")?.values())
}

/// Stable sort in the total order of [`compare_values`]. Strings sort
/// their characters.
fn sort(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let reverse = bool_arg(args, "reverse")?;
    match args.get("_val") {
        Value::Str(s) => {
            let mut chars: Vec<char> = s.plain().chars().collect();
            chars.sort_unstable();
            if reverse {
                chars.reverse();
            }
            some(chars.into_iter().collect::<String>())
        }
        _ => {
            let mut items = list_arg(args, "_val")?.to_vec();
            items.sort_by(|a, b| {
                let ord = compare_values(a, b);
                if reverse {
                    ord.reverse()
                } else {
                    ord
                }
            });
            some(items)
        }
    }
}

fn reverse(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    match args.get("_val") {
        Value::Str(s) => {
            let len = s.char_len();
            let reversed = (0..len)
                .rev()
                .map(|i| s.char_slice(i, i + 1))
                .fold(RadString::new(""), |acc, c| acc.concat(&c));
            some(reversed)
        }
        _ => {
            let mut items = list_arg(args, "_val")?.to_vec();
            items.reverse();
            some(items)
        }
    }
}

/// First occurrences, in order.
fn unique(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let mut seen: Vec<Value> = Vec::new();
    for item in list_arg(args, "_list")?.to_vec() {
        if !seen.iter().any(|s| s.equals(&item)) {
            seen.push(item);
        }
    }
    some(seen)
}

fn join(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let joiner = str_arg(args, "joiner")?;
    let mut out = str_arg(args, "prefix")?;
    for (i, item) in list_arg(args, "_list")?.borrow().iter().enumerate() {
        if i > 0 {
            out = out.concat(&joiner);
        }
        out = out.concat(&to_rad_string(item));
    }
    some(out.concat(&str_arg(args, "suffix")?))
}

/// Int if every element is an int, float otherwise.
fn sum(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let items = list_arg(args, "_nums")?.to_vec();
    if items.iter().all(|v| matches!(v, Value::Int(_))) {
        let mut total: i64 = 0;
        for item in &items {
            total = total
                .checked_add(item.as_int().unwrap_or_default())
                .ok_or_else(|| integer_overflow("sum"))?;
        }
        return some(total);
    }
    some(items.iter().filter_map(Value::as_float).sum::<f64>())
}

fn extreme(args: &BoundArgs, name: &str, want_greater: bool) -> EvalResult<Option<Value>> {
    let items = list_arg(args, "_nums")?.to_vec();
    let mut best: Option<Value> = None;
    for item in items {
        let better = match &best {
            None => true,
            Some(current) => {
                let (a, b) = (
                    item.as_float().unwrap_or_default(),
                    current.as_float().unwrap_or_default(),
                );
                if want_greater {
                    a > b
                } else {
                    a < b
                }
            }
        };
        if better {
            best = Some(item);
        }
    }
    match best {
        Some(value) => Ok(Some(value)),
        None => Err(other(
            ErrorCode::EmptyList,
            format!("Cannot find the {name} of an empty list"),
        )),
    }
}

fn min(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    extreme(args, "min", false)
}

fn max(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    extreme(args, "max", true)
}

/// Lists map each element; maps call `fn(key, value)` and keep the keys.
fn map(interp: &mut Interpreter<'_>, ctx: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let func = args.get("_fn");
    match args.get("_coll") {
        Value::Map(source) => {
            let result = RadMap::new();
            for (k, v) in source.entries() {
                let mapped = interp.invoke(&func, vec![k.clone(), v], ctx.span)?;
                result.insert(k, mapped);
            }
            some(result)
        }
        _ => {
            let mut out = Vec::new();
            for item in list_arg(args, "_coll")?.to_vec() {
                out.push(interp.invoke(&func, vec![item], ctx.span)?);
            }
            some(out)
        }
    }
}

fn filter(interp: &mut Interpreter<'_>, ctx: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let func = args.get("_fn");
    match args.get("_coll") {
        Value::Map(source) => {
            let result = RadMap::new();
            for (k, v) in source.entries() {
                if interp
                    .invoke(&func, vec![k.clone(), v.clone()], ctx.span)?
                    .is_truthy()
                {
                    result.insert(k, v);
                }
            }
            some(result)
        }
        _ => {
            let mut out = Vec::new();
            for item in list_arg(args, "_coll")?.to_vec() {
                if interp.invoke(&func, vec![item.clone()], ctx.span)?.is_truthy() {
                    out.push(item);
                }
            }
            some(out)
        }
    }
}

/// Tuples of the n-th elements. Stops at the shortest list unless `fill` is
/// given; `strict` rejects lists of different lengths.
fn zip(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let lists: Vec<Vec<Value>> = list_arg(args, "_lists")?
        .borrow()
        .iter()
        .filter_map(|l| l.as_list().map(crate::value::RadList::to_vec))
        .collect();
    let shortest = lists.iter().map(Vec::len).min().unwrap_or(0);
    let longest = lists.iter().map(Vec::len).max().unwrap_or(0);
    if bool_arg(args, "strict")? && shortest != longest {
        return Err(other(
            ErrorCode::ZipStrict,
            format!("Strict mode enabled: all lists must have the same length, but got lengths {shortest} and {longest}"),
        ));
    }
    let fill = args.opt("fill").cloned();
    let rows = if fill.is_some() { longest } else { shortest };
    let zipped = (0..rows)
        .map(|row| {
            let tuple = lists
                .iter()
                .map(|list| {
                    list.get(row)
                        .cloned()
                        .or_else(|| fill.clone())
                        .unwrap_or(Value::Null)
                })
                .collect();
            Value::list(tuple)
        })
        .collect::<Vec<_>>();
    some(zipped)
}

/// Maps (when `_fn` is given) and flattens one level.
fn flat_map(interp: &mut Interpreter<'_>, ctx: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let func = args.opt("_fn").cloned();
    let mut out = Vec::new();
    for item in list_arg(args, "_coll")?.to_vec() {
        let mapped = match &func {
            Some(func) => interp.invoke(func, vec![item], ctx.span)?,
            None => item,
        };
        match mapped {
            Value::List(inner) => out.extend(inner.to_vec()),
            other => out.push(other),
        }
    }
    some(out)
}

/// Non-overlapping substring occurrences, or equal list elements.
fn count(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let inner = args.get("_inner");
    match args.get("_subject") {
        Value::Str(s) => {
            let Some(needle) = inner.as_rad_str() else {
                return Err(other(
                    ErrorCode::InvalidArgType,
                    format!(
                        "Cannot count {} occurrences in a str",
                        inner.type_name()
                    ),
                ));
            };
            let needle = needle.plain();
            let haystack = s.plain();
            let n = if needle.is_empty() {
                haystack.chars().count() + 1
            } else {
                haystack.matches(needle.as_ref()).count()
            };
            some(int_len(n))
        }
        _ => {
            let list = list_arg(args, "_subject")?;
            let n = list.borrow().iter().filter(|v| v.equals(&inner)).count();
            some(int_len(n))
        }
    }
}
