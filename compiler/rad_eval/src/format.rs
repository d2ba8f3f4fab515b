//! String interpolation formatting: `{expr:<10}`, `{x:.2}`.

use rad_ir::ast::{Align, FormatSpec};

use crate::errors::{cannot_format, EvalResult};
use crate::value::{RadString, Value};

/// Printable form of `value`, keeping string attributes.
pub fn to_rad_string(value: &Value) -> RadString {
    match value {
        Value::Str(s) => s.clone(),
        Value::Error(e) => e.message.clone(),
        other => RadString::new(other.to_printable(false)),
    }
}

/// Format one interpolated value.
///
/// # Errors
///
/// RAD30003 when a precision is given for a non-number.
pub fn format_interp(value: &Value, spec: Option<&FormatSpec>) -> EvalResult<RadString> {
    let Some(spec) = spec else {
        return Ok(to_rad_string(value));
    };
    let text = match spec.precision {
        Some(precision) => match value {
            Value::Int(i) if precision == 0 => RadString::new(i.to_string()),
            Value::Int(i) => RadString::new(format!("{i}.{}", "0".repeat(precision))),
            Value::Float(f) => RadString::new(format!("{f:.precision$}")),
            _ => return Err(cannot_format(value, format!(".{precision}"))),
        },
        None => to_rad_string(value),
    };
    Ok(match spec.width {
        Some(width) => pad(&text, width, spec.align),
        None => text,
    })
}

/// Pad to `width` characters; longer text is left alone.
pub fn pad(text: &RadString, width: usize, align: Align) -> RadString {
    let len = text.char_len();
    if len >= width {
        return text.clone();
    }
    let fill = RadString::new(" ".repeat(width - len));
    match align {
        Align::Left => text.concat(&fill),
        Align::Right => fill.concat(text),
    }
}
