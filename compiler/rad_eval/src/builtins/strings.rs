//! String builtins. Regex arguments use the `regex` crate's syntax.

use rad_diagnostic::ErrorCode;
use regex::Regex;

use super::{bool_arg, int_arg, some, str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::{invalid_regex, other, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{RadString, Value};

pub(super) const ENTRIES: &[Entry] = &[
    (r"upper(_val: str) -> str", upper),
    (r"lower(_val: str) -> str", lower),
    (r#"trim(_subject: str, to_trim: str = " ") -> str"#, trim),
    (r#"trim_prefix(_subject: str, to_trim: str = " ") -> str"#, trim_prefix),
    (r#"trim_suffix(_subject: str, to_trim: str = " ") -> str"#, trim_suffix),
    (r"split(_val: str, _sep: str) -> list", split),
    (
        r"replace(_original: str, _find: str, _replace: str) -> str",
        replace,
    ),
    (
        r"matches(_val: str, _pattern: str, *, partial: bool = false) -> bool",
        matches,
    ),
    (r"starts_with(_val: str, _start: str) -> bool", starts_with),
    (r"ends_with(_val: str, _end: str) -> bool", ends_with),
    (r"truncate(_str: str, _len: int) -> str", truncate),
];

fn compile(pattern: &str) -> EvalResult<Regex> {
    Regex::new(pattern).map_err(|e| invalid_regex(pattern, &e))
}

fn upper(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    some(str_arg(args, "_val")?.map_text(str::to_uppercase))
}

fn lower(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    some(str_arg(args, "_val")?.map_text(str::to_lowercase))
}

#[derive(Clone, Copy)]
enum Side {
    Both,
    Start,
    End,
}

/// Strip any of the characters in `to_trim` from the chosen sides, keeping
/// the attributes of what remains.
fn trim_chars(args: &BoundArgs, side: Side) -> EvalResult<Option<Value>> {
    let subject = str_arg(args, "_subject")?;
    let to_trim: Vec<char> = str_arg(args, "to_trim")?.plain().chars().collect();
    let chars: Vec<char> = subject.plain().chars().collect();
    let strip = |c: &char| to_trim.contains(c);

    let mut start = 0;
    let mut end = chars.len();
    if matches!(side, Side::Both | Side::Start) {
        start = chars.iter().take_while(|c| strip(c)).count();
    }
    if matches!(side, Side::Both | Side::End) {
        end -= chars[start..].iter().rev().take_while(|c| strip(c)).count();
    }
    some(subject.char_slice(start, end))
}

fn trim(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    trim_chars(args, Side::Both)
}

fn trim_prefix(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    trim_chars(args, Side::Start)
}

fn trim_suffix(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    trim_chars(args, Side::End)
}

/// The separator is a regex; one that does not compile splits literally.
fn split(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_val")?.plain().into_owned();
    let sep = str_arg(args, "_sep")?.plain().into_owned();
    let parts: Vec<Value> = if sep.is_empty() {
        text.chars().map(|c| Value::str(c.to_string())).collect()
    } else if let Ok(re) = Regex::new(&sep) {
        re.split(&text).map(Value::str).collect()
    } else {
        text.split(sep.as_str()).map(Value::str).collect()
    };
    some(parts)
}

/// Regex replace-all; `$1` refers to capture groups.
fn replace(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let original = str_arg(args, "_original")?.plain().into_owned();
    let re = compile(&str_arg(args, "_find")?.plain())?;
    let replacement = str_arg(args, "_replace")?.plain().into_owned();
    some(re.replace_all(&original, replacement.as_str()).into_owned())
}

/// Whole-string match unless `partial` is set.
fn matches(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_val")?.plain().into_owned();
    let pattern = str_arg(args, "_pattern")?.plain().into_owned();
    if bool_arg(args, "partial")? {
        return some(compile(&pattern)?.is_match(&text));
    }
    compile(&pattern)?;
    let anchored = compile(&format!("^(?:{pattern})$"))?;
    some(anchored.is_match(&text))
}

fn starts_with(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_val")?;
    let prefix = str_arg(args, "_start")?;
    some(text.plain().starts_with(prefix.plain().as_ref()))
}

fn ends_with(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_val")?;
    let suffix = str_arg(args, "_end")?;
    some(text.plain().ends_with(suffix.plain().as_ref()))
}

/// At most `_len` characters, the last three replaced by `...` when cut.
fn truncate(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_str")?;
    let max_len = int_arg(args, "_len")?;
    let Ok(max_len) = usize::try_from(max_len) else {
        return Err(other(
            ErrorCode::NumInvalidRange,
            format!("truncate() takes a non-negative int, got {max_len}"),
        ));
    };
    if max_len >= text.char_len() {
        return some(text);
    }
    let kept = text.char_slice(0, max_len.saturating_sub(3));
    some(kept.concat(&RadString::new("...")))
}
