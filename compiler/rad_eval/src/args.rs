//! Script arguments: binding the command line against an `args:` block.
//!
//! Binding happens in three passes, each of which can fail on its own:
//! 1. split argv into flag values and positionals
//! 2. convert every raw value to its declared type, apply defaults, and
//!    report required arguments that are still missing
//! 3. check `enum`/`regex`/`range` and `requires`/`excludes` constraints
//!
//! Only after all three succeed are the values defined as globals.

mod usage;

pub use usage::usage;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{
    ArgBlock, ArgConstraint, ArgDecl, ArgScalar, Expr, ExprKind, RangeBound, StringPart,
    UnaryOp,
};
use regex::Regex;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::typing::{scientific_int, NotAnInt};
use crate::value::{format_float, Value};

/// Why the command line could not be bound.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("flag {0} requires a value")]
    MissingValue(String),
    #[error("non-bool flag -{0} must be last in cluster")]
    ShortNotLast(char),
    #[error("invalid {ty} value for {name}: {value}")]
    Conversion {
        name: String,
        ty: ArgScalar,
        value: String,
    },
    #[error("unexpected positional argument: {0}")]
    UnexpectedPositional(String),
    #[error("Missing required arguments: [{}]", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error("Default for '{0}' must be a literal of its declared type")]
    InvalidDefault(String),
    #[error("Scientific notation value does not evaluate to a whole number: {literal} (default for '{name}')")]
    ScientificNotWhole { name: String, literal: String },
    #[error("Default for '{name}' is outside the int range: {literal}")]
    IntOutOfRange { name: String, literal: String },
    /// `enum`, `regex`, `range` and `requires` violations.
    #[error("{0}")]
    Constraint(String),
    #[error("Invalid args: '{arg}' excludes '{other}', but '{other}' was set")]
    Excludes { arg: String, other: String },
}

impl ArgError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ArgError::Constraint(_) => ErrorCode::ArgsContradict,
            ArgError::Excludes { .. } => ErrorCode::MutualExclArgs,
            ArgError::ScientificNotWhole { .. } => ErrorCode::ScientificNotationNotWholeNumber,
            ArgError::IntOutOfRange { .. } => ErrorCode::NumInvalidRange,
            _ => ErrorCode::UserInput,
        }
    }
}

/// Arguments bound to their declared names, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptArgs {
    values: Vec<(String, Value)>,
}

impl ScriptArgs {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of a successful bind.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    Args(ScriptArgs),
    /// `--help`/`-h` was given.
    Help,
}

/// Raw strings collected for one declaration.
#[derive(Clone, Debug, Default)]
struct Raw {
    values: Vec<String>,
    /// Set on the command line, as opposed to defaulted.
    given: bool,
}

/// Bind `argv` (script arguments only, without the script path) against
/// `block`. A script without an `args:` block accepts no arguments.
///
/// # Errors
///
/// Unknown flags, conversion failures, missing required arguments, and
/// constraint violations.
#[tracing::instrument(level = "debug", skip_all, fields(argc = argv.len()))]
pub fn bind(block: Option<&ArgBlock>, argv: &[String]) -> Result<Binding, ArgError> {
    let empty = ArgBlock {
        decls: Vec::new(),
        constraints: Vec::new(),
        span: rad_ir::Span::DUMMY,
    };
    let block = block.unwrap_or(&empty);

    let Some((mut raw, groups)) = split_argv(block, argv)? else {
        return Ok(Binding::Help);
    };
    assign_positionals(block, &mut raw, groups)?;

    let mut values = Vec::with_capacity(block.decls.len());
    let mut missing = Vec::new();
    for (decl, raw) in block.decls.iter().zip(&raw) {
        match finalize(decl, raw)? {
            Some(value) => values.push((decl.name.name.clone(), value)),
            None => missing.push(decl.flag_name().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(ArgError::MissingRequired(missing));
    }

    let args = ScriptArgs { values };
    let given: FxHashSet<&str> = block
        .decls
        .iter()
        .zip(&raw)
        .filter(|(_, raw)| raw.given)
        .map(|(decl, _)| decl.name.name.as_str())
        .collect();
    for constraint in &block.constraints {
        check_constraint(constraint, &args, &given)?;
    }
    debug!(bound = args.len(), "script arguments bound");
    Ok(Binding::Args(args))
}

fn wants_help(block: &ArgBlock, arg: &str) -> bool {
    match arg {
        "--help" => block.decls.iter().all(|d| d.flag_name() != "help"),
        "-h" => block.decls.iter().all(|d| d.short != Some('h')),
        _ => false,
    }
}

fn find_long<'b>(block: &'b ArgBlock, name: &str) -> Option<(usize, &'b ArgDecl)> {
    block
        .decls
        .iter()
        .enumerate()
        .find(|(_, d)| d.flag_name() == name || d.flag_name().replace('_', "-") == name)
}

fn find_short(block: &ArgBlock, short: char) -> Option<(usize, &ArgDecl)> {
    block
        .decls
        .iter()
        .enumerate()
        .find(|(_, d)| d.short == Some(short))
}

/// `-5` and `-1.5` are values, not flags.
fn is_flag_like(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-') && arg.parse::<f64>().is_err()
}

/// Flags fill `Raw` slots directly; positionals come back grouped by the
/// flags that separate them. `None` means help was requested.
#[expect(clippy::type_complexity, reason = "private helper with one caller")]
fn split_argv(block: &ArgBlock, argv: &[String]) -> Result<Option<(Vec<Raw>, Vec<Vec<String>>)>, ArgError> {
    let mut raw = vec![Raw::default(); block.decls.len()];
    let mut groups: Vec<Vec<String>> = vec![Vec::new()];
    let mut iter = argv.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            if let Some(group) = groups.last_mut() {
                group.extend(iter.by_ref().cloned());
            }
            break;
        }
        if wants_help(block, arg) {
            return Ok(None);
        }
        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (long, None),
            };
            let (idx, decl) = find_long(block, name).ok_or_else(|| ArgError::UnknownFlag(arg.clone()))?;
            let value = if decl.ty.is_flag() {
                inline.unwrap_or_else(|| "true".to_string())
            } else {
                match inline {
                    Some(value) => value,
                    None => iter
                        .next()
                        .cloned()
                        .ok_or_else(|| ArgError::MissingValue(format!("--{name}")))?,
                }
            };
            raw[idx].values.push(value);
            raw[idx].given = true;
            groups.push(Vec::new());
        } else if is_flag_like(arg) {
            let shorts: Vec<char> = arg.chars().skip(1).collect();
            for (pos, short) in shorts.iter().enumerate() {
                let (idx, decl) = find_short(block, *short)
                    .ok_or_else(|| ArgError::UnknownFlag(format!("-{short}")))?;
                let value = if decl.ty.is_flag() {
                    "true".to_string()
                } else if pos + 1 == shorts.len() {
                    iter.next()
                        .cloned()
                        .ok_or_else(|| ArgError::MissingValue(format!("-{short}")))?
                } else {
                    return Err(ArgError::ShortNotLast(*short));
                };
                raw[idx].values.push(value);
                raw[idx].given = true;
            }
            groups.push(Vec::new());
        } else {
            if let Some(group) = groups.last_mut() {
                group.push(arg.clone());
            }
        }
    }
    Ok(Some((raw, groups)))
}

/// Positionals fill unset non-flag arguments in declaration order. A
/// variadic takes the rest of the run it starts in.
fn assign_positionals(block: &ArgBlock, raw: &mut [Raw], groups: Vec<Vec<String>>) -> Result<(), ArgError> {
    let mut runs = groups.into_iter().filter(|g| !g.is_empty());
    let mut current: std::vec::IntoIter<String> = Vec::new().into_iter();

    for (decl, slot) in block.decls.iter().zip(raw.iter_mut()) {
        if slot.given || decl.ty.is_flag() {
            continue;
        }
        if current.as_slice().is_empty() {
            match runs.next() {
                Some(run) => current = run.into_iter(),
                None => break,
            }
        }
        if decl.variadic {
            slot.values.extend(current.by_ref());
        } else if let Some(value) = current.next() {
            slot.values.push(value);
        }
        slot.given = true;
    }

    match current.next().or_else(|| runs.next().and_then(|run| run.into_iter().next())) {
        Some(extra) => Err(ArgError::UnexpectedPositional(extra)),
        None => Ok(()),
    }
}

/// The bound value for `decl`, or `None` if it is required and missing.
fn finalize(decl: &ArgDecl, raw: &Raw) -> Result<Option<Value>, ArgError> {
    if raw.given {
        return convert_all(decl, &raw.values).map(Some);
    }
    if let Some(default) = &decl.default {
        return literal_default(decl, default).map(Some);
    }
    if decl.ty.is_flag() {
        return Ok(Some(Value::Bool(false)));
    }
    if decl.variadic {
        return Ok(Some(Value::list(Vec::new())));
    }
    Ok(decl.optional.then_some(Value::Null))
}

fn convert_all(decl: &ArgDecl, values: &[String]) -> Result<Value, ArgError> {
    let convert_one = |text: &str| {
        convert(text, decl.ty.scalar).ok_or_else(|| ArgError::Conversion {
            name: decl.flag_name().to_string(),
            ty: decl.ty.scalar,
            value: text.to_string(),
        })
    };
    if decl.variadic || decl.ty.list {
        let items = values
            .iter()
            .flat_map(|v| {
                if decl.ty.list {
                    v.split(',').map(str::trim).collect::<Vec<_>>()
                } else {
                    vec![v.as_str()]
                }
            })
            .filter(|v| !v.is_empty())
            .map(convert_one)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::list(items));
    }
    // A repeated scalar flag keeps the last value.
    values
        .last()
        .map_or(Ok(Value::Null), |text| convert_one(text))
}

fn convert(text: &str, scalar: ArgScalar) -> Option<Value> {
    match scalar {
        ArgScalar::Str => Some(Value::str(text)),
        ArgScalar::Int => text.parse::<i64>().ok().map(Value::Int),
        ArgScalar::Float => text.parse::<f64>().ok().map(Value::Float),
        ArgScalar::Bool => match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
    }
}

/// Defaults are literals, checked against the declared type.
fn literal_default(decl: &ArgDecl, expr: &Expr) -> Result<Value, ArgError> {
    if decl.ty.list {
        let ExprKind::List(items) = &expr.kind else {
            return Err(ArgError::InvalidDefault(decl.name.name.clone()));
        };
        let items = items
            .iter()
            .map(|item| literal_scalar(decl, item))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::list(items));
    }
    literal_scalar(decl, expr)
}

#[expect(clippy::cast_precision_loss, reason = "int defaults widen to float args")]
fn literal_scalar(decl: &ArgDecl, expr: &Expr) -> Result<Value, ArgError> {
    let invalid = || ArgError::InvalidDefault(decl.name.name.clone());
    let (value, scientific) = literal_value(expr).ok_or_else(invalid)?;
    match (decl.ty.scalar, value) {
        (ArgScalar::Int, Value::Float(f)) if scientific => match scientific_int(f) {
            Ok(i) => Ok(Value::Int(i)),
            Err(NotAnInt::Fractional) => Err(ArgError::ScientificNotWhole {
                name: decl.name.name.clone(),
                literal: format_float(f),
            }),
            Err(NotAnInt::OutOfRange) => Err(ArgError::IntOutOfRange {
                name: decl.name.name.clone(),
                literal: format!("{f:e}"),
            }),
        },
        (ArgScalar::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
        (ArgScalar::Str, v @ Value::Str(_))
        | (ArgScalar::Int, v @ Value::Int(_))
        | (ArgScalar::Float, v @ Value::Float(_))
        | (ArgScalar::Bool, v @ Value::Bool(_)) => Ok(v),
        _ => Err(invalid()),
    }
}

/// A literal's value, and whether it was written in scientific notation.
fn literal_value(expr: &Expr) -> Option<(Value, bool)> {
    let value = match &expr.kind {
        ExprKind::Bool(b) => Value::Bool(*b),
        ExprKind::Int(i) => Value::Int(*i),
        ExprKind::Float { value, scientific } => return Some((Value::Float(*value), *scientific)),
        ExprKind::Str(parts) => {
            let mut text = String::new();
            for part in parts {
                match part {
                    StringPart::Text(t) => text.push_str(t),
                    StringPart::Interp { .. } => return None,
                }
            }
            Value::str(text)
        }
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => {
            return match literal_value(operand)? {
                (Value::Int(i), sci) => Some((Value::Int(i.checked_neg()?), sci)),
                (Value::Float(f), sci) => Some((Value::Float(-f), sci)),
                _ => None,
            }
        }
        _ => return None,
    };
    Some((value, false))
}

fn check_constraint(
    constraint: &ArgConstraint,
    args: &ScriptArgs,
    given: &FxHashSet<&str>,
) -> Result<(), ArgError> {
    match constraint {
        ArgConstraint::Enum { arg, values } => {
            for value in present_values(args, &arg.name) {
                let text = value.to_printable(false);
                if !values.contains(&text) {
                    return Err(ArgError::Constraint(format!(
                        "Invalid '{}' value: {text} (valid values: {})",
                        arg.name,
                        values.join(", ")
                    )));
                }
            }
            Ok(())
        }
        ArgConstraint::Regex { arg, pattern } => {
            let regex = Regex::new(pattern).map_err(|e| {
                ArgError::Constraint(format!("Invalid regex for '{}': {e}", arg.name))
            })?;
            for value in present_values(args, &arg.name) {
                let text = value.to_printable(false);
                if !regex.is_match(&text) {
                    return Err(ArgError::Constraint(format!(
                        "Invalid '{}' value: {text} (must match regex: {pattern})",
                        arg.name
                    )));
                }
            }
            Ok(())
        }
        ArgConstraint::Range { arg, min, max } => {
            for value in present_values(args, &arg.name) {
                let Some(number) = value.as_float() else {
                    continue;
                };
                check_range(&arg.name, &value, number, min.as_ref(), max.as_ref())?;
            }
            Ok(())
        }
        ArgConstraint::Requires {
            arg,
            others,
            mutual,
        } => {
            for other in others {
                if given.contains(arg.name.as_str()) && !given.contains(other.name.as_str()) {
                    return Err(requires(&arg.name, &other.name));
                }
                if *mutual && given.contains(other.name.as_str()) && !given.contains(arg.name.as_str()) {
                    return Err(requires(&other.name, &arg.name));
                }
            }
            Ok(())
        }
        // Exclusion is symmetric; `mutually` only documents intent.
        ArgConstraint::Excludes { arg, others, .. } => {
            for other in others {
                if given.contains(arg.name.as_str()) && given.contains(other.name.as_str()) {
                    return Err(ArgError::Excludes {
                        arg: arg.name.clone(),
                        other: other.name.clone(),
                    });
                }
            }
            Ok(())
        }
    }
}

fn requires(arg: &str, other: &str) -> ArgError {
    ArgError::Constraint(format!(
        "Invalid args: '{arg}' requires '{other}', but '{other}' was not given"
    ))
}

/// Non-null values of `name`; list arguments contribute each element.
fn present_values(args: &ScriptArgs, name: &str) -> Vec<Value> {
    match args.get(name) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::List(list)) => list.to_vec(),
        Some(value) => vec![value.clone()],
    }
}

fn check_range(
    name: &str,
    value: &Value,
    number: f64,
    min: Option<&RangeBound>,
    max: Option<&RangeBound>,
) -> Result<(), ArgError> {
    let shown = value.to_printable(false);
    if let Some(min) = min {
        if min.inclusive && number < min.value {
            return Err(ArgError::Constraint(format!(
                "'{name}' value {shown} is < minimum {}",
                format_float(min.value)
            )));
        }
        if !min.inclusive && number <= min.value {
            return Err(ArgError::Constraint(format!(
                "'{name}' value {shown} is <= minimum (exclusive) {}",
                format_float(min.value)
            )));
        }
    }
    if let Some(max) = max {
        if max.inclusive && number > max.value {
            return Err(ArgError::Constraint(format!(
                "'{name}' value {shown} is > maximum {}",
                format_float(max.value)
            )));
        }
        if !max.inclusive && number >= max.value {
            return Err(ArgError::Constraint(format!(
                "'{name}' value {shown} is >= maximum (exclusive) {}",
                format_float(max.value)
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
