//! Printable forms of values.

use std::fmt::Write;

use super::{FnValue, Value};

/// Containers nested deeper than this print as `...`.
const MAX_PRINT_DEPTH: usize = 64;

/// Floats print in shortest form without an exponent: `2.0` prints `2`.
pub fn format_float(f: f64) -> String {
    format!("{f}")
}

impl Value {
    /// Form used by `print` and interpolation: strings appear raw.
    pub fn to_printable(&self, color: bool) -> String {
        match self {
            Value::Str(s) => s.render(color),
            Value::Error(e) => e.message.render(color),
            _ => self.repr(color),
        }
    }

    /// Form used inside containers and error messages: strings are quoted.
    pub fn repr(&self, color: bool) -> String {
        let mut out = String::new();
        write_repr(&mut out, self, color, 0);
        out
    }

    /// Form used in table cells: strings raw at every level, map keys
    /// unquoted.
    pub fn cell_text(&self) -> String {
        let mut out = String::new();
        write_cell(&mut out, self, 0);
        out
    }
}

fn write_repr(out: &mut String, value: &Value, color: bool, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Str(s) => quote_into(out, &s.render(color)),
        Value::Error(e) => quote_into(out, &e.message.render(color)),
        Value::Fn(f) => write_fn(out, f),
        Value::List(list) => {
            if depth >= MAX_PRINT_DEPTH {
                out.push_str("[ ... ]");
                return;
            }
            let items = list.borrow();
            if items.is_empty() {
                out.push_str("[ ]");
                return;
            }
            out.push_str("[ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, item, color, depth + 1);
            }
            out.push_str(" ]");
        }
        Value::Map(map) => {
            if depth >= MAX_PRINT_DEPTH {
                out.push_str("{ ... }");
                return;
            }
            let data = map.borrow();
            if data.is_empty() {
                out.push_str("{ }");
                return;
            }
            out.push_str("{ ");
            for (i, (k, v)) in data.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, k, color, depth + 1);
                out.push_str(": ");
                write_repr(out, v, color, depth + 1);
            }
            out.push_str(" }");
        }
    }
}

fn write_cell(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Str(s) => out.push_str(&s.plain()),
        Value::Error(e) => out.push_str(&e.message.plain()),
        Value::List(list) => {
            if depth >= MAX_PRINT_DEPTH {
                out.push_str("[...]");
                return;
            }
            out.push('[');
            for (i, item) in list.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_cell(out, item, depth + 1);
            }
            out.push(']');
        }
        Value::Map(map) => {
            if depth >= MAX_PRINT_DEPTH {
                out.push_str("{...}");
                return;
            }
            let data = map.borrow();
            if data.is_empty() {
                out.push_str("{ }");
                return;
            }
            out.push_str("{ ");
            for (i, (k, v)) in data.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_cell(out, k, depth + 1);
                out.push_str(": ");
                write_cell(out, v, depth + 1);
            }
            out.push_str(" }");
        }
        Value::Null
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Fn(_) => write_repr(out, value, false, depth),
    }
}

fn write_fn(out: &mut String, f: &FnValue) {
    match f.name() {
        Some(name) => {
            let _ = write!(out, "<fn {name}>");
        }
        None => out.push_str("<fn>"),
    }
}

fn quote_into(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
