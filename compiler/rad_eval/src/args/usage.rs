//! `--help` text for a script.

use std::fmt::Write;

use rad_ir::ast::{ArgBlock, ArgConstraint, ArgDecl};

/// Usage text: description, a synopsis line, then one aligned line per
/// argument with its comment and default.
pub fn usage(script_name: &str, description: Option<&str>, block: Option<&ArgBlock>) -> String {
    let mut out = String::new();
    if let Some(description) = description {
        out.push_str(description.trim_end());
        out.push_str("\n\n");
    }

    out.push_str("Usage:\n  ");
    out.push_str(script_name);
    let decls = block.map_or(&[][..], |b| b.decls.as_slice());
    for decl in decls {
        out.push(' ');
        out.push_str(&synopsis(decl));
    }
    out.push('\n');

    if decls.is_empty() {
        return out;
    }
    out.push_str("\nScript args:\n");
    let lines: Vec<(String, String)> = decls
        .iter()
        .map(|decl| (flag_column(decl), describe(decl, block)))
        .collect();
    let width = lines.iter().map(|(flag, _)| flag.chars().count()).max().unwrap_or(0);
    for (flag, text) in lines {
        let _ = writeln!(out, "{flag:<width$}   {text}");
    }
    out
}

fn synopsis(decl: &ArgDecl) -> String {
    let name = decl.flag_name();
    if decl.variadic {
        format!("[{name}...]")
    } else if decl.ty.is_flag() {
        match decl.short {
            Some(short) => format!("[-{short}, --{name}]"),
            None => format!("[--{name}]"),
        }
    } else if decl.optional || decl.default.is_some() {
        format!("[{name}]")
    } else {
        format!("<{name}>")
    }
}

fn flag_column(decl: &ArgDecl) -> String {
    let name = decl.flag_name();
    let mut column = match decl.short {
        Some(short) => format!("  -{short}, --{name}"),
        None => format!("      --{name}"),
    };
    if !decl.ty.is_flag() {
        let _ = write!(column, " {}", decl.ty);
    }
    column
}

fn describe(decl: &ArgDecl, block: Option<&ArgBlock>) -> String {
    let mut text = decl.comment.clone().unwrap_or_default();
    let enum_values = block.and_then(|b| {
        b.constraints.iter().find_map(|c| match c {
            ArgConstraint::Enum { arg, values } if arg.name == decl.name.name => Some(values),
            _ => None,
        })
    });
    if let Some(values) = enum_values {
        if !text.is_empty() {
            text.push(' ');
        }
        let _ = write!(text, "Valid values: [{}].", values.join(", "));
    }
    if decl.optional {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str("(optional)");
    }
    text
}
