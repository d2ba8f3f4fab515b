//! `print`, `print_err`, `pprint`, `debug`.

use super::{list_arg, str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::json;
use crate::value::Value;

pub(super) const ENTRIES: &[Entry] = &[
    (
        r#"print(*_items: any, *, sep: str = " ", end: str = "\n") -> void"#,
        print,
    ),
    (
        r#"print_err(*_items: any, *, sep: str = " ", end: str = "\n") -> void"#,
        print_err,
    ),
    (r"pprint(_item: any) -> void", pprint),
    (
        r#"debug(*_items: any, *, sep: str = " ", end: str = "\n") -> void"#,
        debug,
    ),
];

/// Items in printable form joined by `sep`, followed by `end`.
fn render_items(interp: &Interpreter<'_>, args: &BoundArgs) -> EvalResult<String> {
    let color = interp.config.color;
    let sep = str_arg(args, "sep")?.render(color);
    let end = str_arg(args, "end")?.render(color);
    let items = list_arg(args, "_items")?;
    let mut text = items
        .borrow()
        .iter()
        .map(|item| item.to_printable(color))
        .collect::<Vec<_>>()
        .join(&sep);
    text.push_str(&end);
    Ok(text)
}

fn print(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = render_items(interp, args)?;
    interp.print.print(&text);
    Ok(None)
}

fn print_err(
    interp: &mut Interpreter<'_>,
    _: &CallCtx,
    args: &BoundArgs,
) -> EvalResult<Option<Value>> {
    let text = render_items(interp, args)?;
    interp.print.print_err(&text);
    Ok(None)
}

/// Debug output goes to stderr so it never mixes with a script's data.
fn debug(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = render_items(interp, args)?;
    interp.print.print_err(&text);
    Ok(None)
}

/// Indented JSON; values with no JSON form fall back to their printable form.
fn pprint(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let item = args.get("_item");
    let mut text = json::to_string_pretty(&item).unwrap_or_else(|_| item.repr(false));
    text.push('\n');
    interp.print.print(&text);
    Ok(None)
}
