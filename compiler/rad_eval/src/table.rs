//! Aligned table output for `display` blocks.

use rad_ir::ast::Align;

use crate::format::pad;
use crate::value::{RadString, TextAttrs};

const COLUMN_GAP: &str = "  ";

/// Render parallel columns under `headers`. Short columns are padded with
/// empty cells; widths ignore color.
pub fn render(headers: &[String], columns: &[Vec<RadString>], color: bool) -> String {
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    let empty = RadString::new("");
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let cells = columns.get(i).map_or(0, |col| {
                col.iter().map(RadString::char_len).max().unwrap_or(0)
            });
            header.chars().count().max(cells)
        })
        .collect();

    let header_attrs = TextAttrs {
        bold: true,
        ..TextAttrs::default()
    };
    let mut out = String::new();
    let header_cells: Vec<RadString> = headers
        .iter()
        .map(|h| RadString::styled(h.as_str(), header_attrs))
        .collect();
    push_row(&mut out, &header_cells, &widths, color);

    for row in 0..rows {
        let cells: Vec<RadString> = (0..headers.len())
            .map(|i| {
                columns
                    .get(i)
                    .and_then(|col| col.get(row))
                    .unwrap_or(&empty)
                    .clone()
            })
            .collect();
        push_row(&mut out, &cells, &widths, color);
    }
    out
}

fn push_row(out: &mut String, cells: &[RadString], widths: &[usize], color: bool) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(&pad(cell, *width, Align::Left).render(color));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
