//! Process, environment and file builtins, plus `error`.

use std::io;
use std::rc::Rc;
use std::time::Duration;

use rad_diagnostic::ErrorCode;
use tracing::debug;

use super::{bool_arg, int_arg, some, str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::{exit as exit_error, other, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{RadError, RadMap, Value};

pub(super) const ENTRIES: &[Entry] = &[
    (r"error(_msg: str) -> error", error),
    (r"exit(_code: int|bool = 0) -> void", exit),
    (r"sleep(_duration: float|str, *, title: str?) -> void", sleep),
    (r"get_env(_var: str) -> str", get_env),
    (r"is_defined(_var: str) -> bool", is_defined),
    (r"read_file(_path: str) -> map", read_file),
    (
        r"write_file(_path: str, _content: str, *, append: bool = false) -> map",
        write_file,
    ),
    (
        r"get_default(_map: map, key: any, default: any) -> any",
        get_default,
    ),
];

/// Builds the value; raising happens only if a function returns it.
fn error(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let message = str_arg(args, "_msg")?;
    Ok(Some(Value::Error(Rc::new(RadError {
        message,
        code: ErrorCode::GenericRuntime,
        hint: None,
    }))))
}

fn exit(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let code = match args.get("_code") {
        Value::Bool(b) => i32::from(b),
        _ => {
            let code = int_arg(args, "_code")?;
            i32::try_from(code).map_err(|_| {
                other(
                    ErrorCode::NumInvalidRange,
                    format!("Exit code {code} is out of range"),
                )
            })?
        }
    };
    Err(exit_error(code))
}

/// `300ms`, `1.5s`, `2m`, `1h30m`: unit-suffixed components.
fn parse_duration(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| *c != ' ').collect();
    if let Ok(seconds) = compact.parse::<f64>() {
        return Some(seconds);
    }
    if compact.is_empty() {
        return None;
    }
    let mut seconds = 0.0;
    let mut rest = compact.as_str();
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let amount: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];
        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1e-9,
            "us" | "\u{b5}s" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };
        rest = &rest[unit_len..];
        seconds += amount * scale;
    }
    Some(seconds)
}

/// Numbers are seconds.
fn sleep(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let seconds = match args.get("_duration") {
        Value::Str(s) => {
            let plain = s.plain();
            parse_duration(&plain).ok_or_else(|| {
                other(
                    ErrorCode::SleepStr,
                    format!("Invalid string argument: \"{plain}\""),
                )
            })?
        }
        value => value.as_float().unwrap_or_default(),
    };
    if seconds < 0.0 || !seconds.is_finite() {
        return Err(other(
            ErrorCode::NumInvalidRange,
            format!("sleep() cannot take a negative duration: {seconds}s"),
        ));
    }
    if let Some(title) = args.opt("title") {
        let line = format!("{}\n", title.to_printable(interp.config.color));
        interp.print.print(&line);
    }
    debug!(seconds, "sleeping");
    std::thread::sleep(Duration::from_secs_f64(seconds));
    Ok(None)
}

/// Unset variables read as `""`.
fn get_env(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let name = str_arg(args, "_var")?;
    some(std::env::var(name.plain().as_ref()).unwrap_or_default())
}

fn is_defined(_: &mut Interpreter<'_>, ctx: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let name = str_arg(args, "_var")?;
    some(ctx.env.is_defined(&name.plain()))
}

fn file_error(err: &io::Error, path: &str, writing: bool) -> EvalError {
    let code = match err.kind() {
        io::ErrorKind::NotFound => ErrorCode::FileNoExist,
        io::ErrorKind::PermissionDenied => ErrorCode::FileNoPermission,
        _ if writing => ErrorCode::FileWrite,
        _ => ErrorCode::FileRead,
    };
    let verb = if writing { "write" } else { "read" };
    other(code, format!("Cannot {verb} file '{path}': {err}"))
}

fn read_file(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let path = str_arg(args, "_path")?;
    let path = path.plain();
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| file_error(&e, &path, false))?;
    let result = RadMap::new();
    result.set_str("size_bytes", Value::Int(byte_count(content.len())));
    result.set_str("content", Value::str(content));
    some(result)
}

fn write_file(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    use std::io::Write;

    let path = str_arg(args, "_path")?.plain().into_owned();
    let content = str_arg(args, "_content")?.plain().into_owned();
    let append = bool_arg(args, "append")?;
    let written = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(&path)
        .and_then(|mut file| file.write_all(content.as_bytes()));
    written.map_err(|e| file_error(&e, &path, true))?;
    let result = RadMap::new();
    result.set_str("bytes_written", Value::Int(byte_count(content.len())));
    result.set_str("path", Value::str(path));
    some(result)
}

fn byte_count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

fn get_default(_: &mut Interpreter<'_>, _: &CallCtx, _: &BoundArgs) -> EvalResult<Option<Value>> {
    Err(other(
        ErrorCode::GenericRuntime,
        "get_default was removed in favor of the fallback operator",
    )
    .with_hint("Use `map[key] ?? default` instead"))
}

#[cfg(test)]
mod tests {
    use super::parse_duration;

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("1.5"), Some(1.5));
        assert_eq!(parse_duration("250ms"), Some(0.25));
        assert_eq!(parse_duration("1m 30s"), Some(90.0));
        assert_eq!(parse_duration("1h"), Some(3600.0));
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("5x"), None);
        assert_eq!(parse_duration(""), None);
    }
}
