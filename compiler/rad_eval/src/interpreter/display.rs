//! Table blocks: build rows, then filter, sort, map, color, and print
//! them.
//!
//! `rad` and `request` first bind their fields from a fetched JSON
//! document. They write the filtered, sorted columns back to the field
//! variables; `request` stops there without printing.

use std::cmp::Ordering;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{ColumnOp, DisplayBlock, Expr, FieldModifier, SortKey, TableKind};
use regex::Regex;
use tracing::debug;

use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{invalid_color, invalid_regex, other, undefined_variable, EvalResult};
use crate::operators::compare_values;
use crate::table;
use crate::value::{Color, RadString, TextAttrs, Value};

/// One table row; `None` is a cell the source had no value for.
type Row = Vec<Option<Value>>;

impl Interpreter<'_> {
    pub(super) fn exec_display(&mut self, display: &DisplayBlock, env: &Environment) -> EvalResult<()> {
        let names: Vec<&str> = display.fields.iter().map(|f| f.name.as_str()).collect();
        let mut rows = match (&display.source, display.kind) {
            (Some(source), TableKind::Display) => self.rows_from_source(source, &names, env)?,
            (Some(source), TableKind::Rad | TableKind::Request) => {
                self.fetch_json_fields(display, source, env)?;
                rows_from_columns(display, env)?
            }
            (None, _) => rows_from_columns(display, env)?,
        };
        let kind = display.kind.keyword();
        debug!(kind, rows = rows.len(), columns = names.len(), "table block");

        for (col, modifier) in column_modifiers(display) {
            for op in &modifier.ops {
                if let ColumnOp::Filter(expr) = op {
                    let func = self.eval_expr(expr, env)?;
                    let mut kept = Vec::with_capacity(rows.len());
                    for row in rows {
                        let cell = row[col].clone().unwrap_or(Value::Null);
                        if self.invoke(&func, vec![cell], expr.span)?.is_truthy() {
                            kept.push(row);
                        }
                    }
                    rows = kept;
                }
            }
        }

        sort_rows(&mut rows, &display.sorts, &names);

        if display.kind != TableKind::Display {
            for (col, field) in display.fields.iter().enumerate() {
                let column = rows.iter().filter_map(|row| row[col].clone()).collect();
                env.define(&field.name, Value::list(column));
            }
            if display.kind == TableKind::Request {
                return Ok(());
            }
        }

        let mut columns: Vec<Vec<Option<Value>>> = (0..names.len())
            .map(|col| rows.iter().map(|row| row[col].clone()).collect())
            .collect();
        for (col, modifier) in column_modifiers(display) {
            for op in &modifier.ops {
                if let ColumnOp::Map(expr) = op {
                    let func = self.eval_expr(expr, env)?;
                    for cell in columns[col].iter_mut().flatten() {
                        *cell = self.invoke(&func, vec![cell.clone()], expr.span)?;
                    }
                }
            }
        }

        let mut cells: Vec<Vec<RadString>> = columns
            .into_iter()
            .map(|column| column.iter().map(|cell| cell_string(cell.as_ref())).collect())
            .collect();
        for (col, modifier) in column_modifiers(display) {
            for op in &modifier.ops {
                if let ColumnOp::Color { color, pattern } = op {
                    let (color, regex) = self.eval_color_rule(color, pattern, env)?;
                    for cell in &mut cells[col] {
                        *cell = color_matches(cell, color, &regex);
                    }
                }
            }
        }

        let headers: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
        let rendered = table::render(&headers, &cells, self.config.color);
        self.print.print(&rendered);
        Ok(())
    }

    /// Rows from a list of maps, or a single map as one row.
    fn rows_from_source(&mut self, source: &Expr, names: &[&str], env: &Environment) -> EvalResult<Vec<Row>> {
        let value = self.eval_expr(source, env)?;
        let records = match &value {
            Value::List(list) => list.to_vec(),
            Value::Map(_) => vec![value.clone()],
            other_value => {
                return Err(other(
                    ErrorCode::TypeMismatch,
                    format!(
                        "Display block source can only be a list or a map. Got {}",
                        other_value.type_name()
                    ),
                )
                .with_span(source.span))
            }
        };
        records
            .iter()
            .map(|record| match record {
                Value::Map(map) => Ok(names.iter().map(|name| map.get_str(name)).collect()),
                _ => Err(other(
                    ErrorCode::TypeMismatch,
                    format!("Display rows must be maps. Got {}", record.type_name()),
                )
                .with_span(source.span)),
            })
            .collect()
    }

    fn eval_color_rule(&mut self, color: &Expr, pattern: &Expr, env: &Environment) -> EvalResult<(Color, Regex)> {
        let name = self.eval_expr(color, env)?.to_printable(false);
        let color_value = Color::from_name(&name).ok_or_else(|| invalid_color(&name).with_span(color.span))?;
        let pattern_text = self.eval_expr(pattern, env)?.to_printable(false);
        let regex = Regex::new(&pattern_text)
            .map_err(|e| invalid_regex(&pattern_text, &e).with_span(pattern.span))?;
        Ok((color_value, regex))
    }
}

/// Without a source, each field names a list variable holding one column.
fn rows_from_columns(display: &DisplayBlock, env: &Environment) -> EvalResult<Vec<Row>> {
    let mut columns = Vec::with_capacity(display.fields.len());
    for field in &display.fields {
        let value = env
            .lookup(&field.name)
            .ok_or_else(|| undefined_variable(&field.name).with_span(field.span))?;
        let column = match &value {
            Value::List(list) => list.to_vec(),
            scalar => vec![scalar.clone()],
        };
        columns.push(column);
    }
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    Ok((0..height)
        .map(|i| columns.iter().map(|column| column.get(i).cloned()).collect())
        .collect())
}

/// Column index of each modifier's fields, in declaration order.
fn column_modifiers(display: &DisplayBlock) -> Vec<(usize, &FieldModifier)> {
    let mut out = Vec::new();
    for modifier in &display.modifiers {
        for field in &modifier.fields {
            if let Some(col) = display.fields.iter().position(|f| f.name == field.name) {
                out.push((col, modifier));
            }
        }
    }
    out
}

fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort. A key without a field orders by every column left to right.
fn sort_rows(rows: &mut [Row], sorts: &[SortKey], names: &[&str]) {
    if sorts.is_empty() {
        return;
    }
    let mut keys: Vec<(usize, bool)> = Vec::new();
    for key in sorts {
        match &key.field {
            Some(field) => {
                if let Some(col) = names.iter().position(|n| *n == field.name) {
                    keys.push((col, key.descending));
                }
            }
            None => keys.extend((0..names.len()).map(|col| (col, key.descending))),
        }
    }
    rows.sort_by(|a, b| {
        keys.iter()
            .map(|&(col, descending)| {
                let ord = compare_cells(a[col].as_ref(), b[col].as_ref());
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// Strings keep their own attributes in a cell.
fn cell_string(cell: Option<&Value>) -> RadString {
    match cell {
        None => RadString::new(""),
        Some(Value::Str(s)) => s.clone(),
        Some(value) => RadString::new(value.cell_text()),
    }
}

fn color_matches(cell: &RadString, color: Color, regex: &Regex) -> RadString {
    let plain = cell.plain();
    let mut out = RadString::new("");
    let mut last = 0;
    for found in regex.find_iter(&plain) {
        if found.start() == found.end() {
            continue;
        }
        let start = plain[..found.start()].chars().count();
        let end = start + found.as_str().chars().count();
        out = out
            .concat(&cell.char_slice(last, start))
            .concat(&cell.char_slice(start, end).map_attrs(|attrs| TextAttrs {
                color: Some(color),
                ..attrs
            }));
        last = end;
    }
    out.concat(&cell.char_slice(last, cell.char_len()))
}
