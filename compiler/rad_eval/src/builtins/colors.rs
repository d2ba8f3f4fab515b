//! Color and emphasis builtins. Each returns its argument as a string with
//! the attribute applied to every segment.

use super::{str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::{invalid_color, EvalResult};
use crate::format::to_rad_string;
use crate::interpreter::Interpreter;
use crate::value::{Color, TextAttrs, Value};

pub(super) const ENTRIES: &[Entry] = &[
    (r"plain(_item: any) -> str", plain),
    (r"black(_item: any) -> str", black),
    (r"red(_item: any) -> str", red),
    (r"green(_item: any) -> str", green),
    (r"yellow(_item: any) -> str", yellow),
    (r"blue(_item: any) -> str", blue),
    (r"magenta(_item: any) -> str", magenta),
    (r"cyan(_item: any) -> str", cyan),
    (r"white(_item: any) -> str", white),
    (r"orange(_item: any) -> str", orange),
    (r"pink(_item: any) -> str", pink),
    (r"bold(_item: any) -> str", bold),
    (r"italic(_item: any) -> str", italic),
    (r"underline(_item: any) -> str", underline),
    (r"color(_item: any, _color: str) -> str", color),
];

fn styled(args: &BoundArgs, f: impl Fn(TextAttrs) -> TextAttrs) -> EvalResult<Option<Value>> {
    let text = to_rad_string(&args.get("_item"));
    Ok(Some(Value::Str(text.map_attrs(f))))
}

fn colored(args: &BoundArgs, color: Color) -> EvalResult<Option<Value>> {
    styled(args, |attrs| TextAttrs {
        color: Some(color),
        ..attrs
    })
}

/// Strips every attribute.
fn plain(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    styled(args, |_| TextAttrs::default())
}

fn black(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Black)
}

fn red(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Red)
}

fn green(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Green)
}

fn yellow(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Yellow)
}

fn blue(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Blue)
}

fn magenta(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Magenta)
}

fn cyan(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Cyan)
}

fn white(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::White)
}

fn orange(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Orange)
}

fn pink(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    colored(args, Color::Pink)
}

fn bold(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    styled(args, |attrs| TextAttrs { bold: true, ..attrs })
}

fn italic(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    styled(args, |attrs| TextAttrs {
        italic: true,
        ..attrs
    })
}

fn underline(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    styled(args, |attrs| TextAttrs {
        underline: true,
        ..attrs
    })
}

fn color(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let name = str_arg(args, "_color")?.plain().into_owned();
    let Some(color) = Color::from_name(&name) else {
        return Err(invalid_color(&name));
    };
    colored(args, color)
}
