//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.
//!
//! Each labeled line is shown with one line of context above and two below;
//! overlapping context windows merge and gaps are marked with `...`.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label, Severity};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const GREEN: &str = "\x1b[32m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RESET: &str = "\x1b[0m";
}

/// Source lines longer than this are cut and end in `...`.
const MAX_LINE_CHARS: usize = 120;

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// For `Auto`, `is_tty` decides.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Script text that diagnostics point into.
#[derive(Clone, Debug)]
pub struct SourceFile {
    name: String,
    text: String,
    lines: LineOffsetTable,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineOffsetTable::build(&text);
        SourceFile {
            name: name.into(),
            text,
            lines,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &LineOffsetTable {
        &self.lines
    }
}

/// A label resolved to 0-based rows and character columns.
struct PlacedLabel<'a> {
    label: &'a Label,
    start_row: u32,
    start_col: usize,
    end_row: u32,
    end_col: usize,
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    source: Option<SourceFile>,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    ///
    /// `is_tty` is only consulted for [`ColorMode::Auto`].
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
        }
    }

    /// Render snippets from this source. Without one, only the header,
    /// hints, and notes are printed.
    #[must_use]
    pub fn with_source(mut self, source: SourceFile) -> Self {
        self.source = Some(source);
        self
    }

    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.colors {
            format!("{color}{text}{}", colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn write_header(&mut self, diagnostic: &Diagnostic) {
        let severity_color = match diagnostic.severity {
            Severity::Error => colors::RED,
            Severity::Warning => colors::YELLOW,
            Severity::Note => colors::CYAN,
        };
        let severity = self.paint(&diagnostic.severity.to_string(), severity_color);
        let code = self.paint(&format!("[{}]", diagnostic.code), colors::RED);
        let _ = writeln!(self.writer, "{severity}{code}: {}", diagnostic.message);
    }

    fn write_snippet(&mut self, diagnostic: &Diagnostic) {
        let Some(source) = self.source.take() else {
            return;
        };
        if !diagnostic.labels.is_empty() {
            self.write_labels(diagnostic, &source);
        }
        self.source = Some(source);
    }

    fn write_labels(&mut self, diagnostic: &Diagnostic, source: &SourceFile) {
        let mut placed: Vec<PlacedLabel<'_>> = diagnostic
            .labels
            .iter()
            .map(|label| place(label, source))
            .collect();
        placed.sort_by_key(|p| p.start_row);

        if let Some(primary) = diagnostic.primary_span() {
            let (line, col) = source.lines.offset_to_line_col(&source.text, primary.start);
            let location = format!("  --> {}:{line}:{col}", source.name);
            let location = self.paint(&location, colors::BLUE);
            let _ = writeln!(self.writer, "{location}");
        }

        let max_row = placed.iter().map(|p| p.end_row).max().unwrap_or(0);
        let gutter_width = (max_row + 1).to_string().len();
        let total_lines = u32::try_from(source.lines.line_count()).unwrap_or(u32::MAX);

        let mut shown = BTreeSet::new();
        for p in &placed {
            let first = p.start_row.saturating_sub(1);
            let last = (p.start_row + 2).min(total_lines.saturating_sub(1));
            shown.extend(first..=last);
        }

        let bar = self.paint(&format!("{} |", " ".repeat(gutter_width)), colors::BLUE);
        let open = self.paint(&format!("{}|", " ".repeat(gutter_width + 1)), colors::BLUE);
        let _ = writeln!(self.writer, "{open}");

        let mut prev: Option<u32> = None;
        for row in shown {
            if prev.is_some_and(|p| row > p + 1) {
                let ellipsis = self.paint("...", colors::BLUE);
                let _ = writeln!(self.writer, "{ellipsis}");
            }
            prev = Some(row);

            let text = source.lines.line_text(&source.text, row + 1).unwrap_or("");
            let gutter = self.paint(&format!("{:>gutter_width$} |", row + 1), colors::BLUE);
            let _ = writeln!(self.writer, "{gutter} {}", truncate_line(text));

            let on_line: Vec<&PlacedLabel<'_>> =
                placed.iter().filter(|p| p.start_row == row).collect();
            if !on_line.is_empty() {
                self.write_underline(&on_line, text, &bar);
            }
        }

        let _ = writeln!(self.writer, "{open}");
    }

    fn write_underline(&mut self, labels: &[&PlacedLabel<'_>], line: &str, bar: &str) {
        let line_len = line.chars().count();
        let mut underline = vec![' '; line_len + 10];
        let mut message: Option<&PlacedLabel<'_>> = None;

        for p in labels {
            let start = p.start_col.min(line_len);
            let end = if p.start_row == p.end_row {
                p.end_col.min(line_len)
            } else {
                line_len
            };
            // Zero-width spans still get one caret.
            let end = end.max(start + 1);
            let mark = if p.label.is_primary { '^' } else { '-' };
            for slot in underline.iter_mut().take(end).skip(start) {
                *slot = mark;
            }
            let further_right = match message {
                Some(m) => p.start_col > m.start_col,
                None => true,
            };
            if !p.label.message.is_empty() && further_right {
                message = Some(p);
            }
        }

        let underline: String = underline.into_iter().collect();
        let underline = underline.trim_end();
        if underline.is_empty() {
            return;
        }

        let first_color = if labels[0].label.is_primary {
            colors::RED
        } else {
            colors::BLUE
        };
        let underline = self.paint(underline, first_color);
        match message {
            Some(p) => {
                let color = if p.label.is_primary {
                    colors::RED
                } else {
                    colors::BLUE
                };
                let text = self.paint(&p.label.message, color);
                let _ = writeln!(self.writer, "{bar} {underline} {text}");
            }
            None => {
                let _ = writeln!(self.writer, "{bar} {underline}");
            }
        }
    }
}

fn place<'a>(label: &'a Label, source: &SourceFile) -> PlacedLabel<'a> {
    let ((start_line, start_col), (end_line, end_col)) =
        source.lines.span_bounds(&source.text, label.span);
    PlacedLabel {
        label,
        start_row: start_line - 1,
        start_col: (start_col - 1) as usize,
        end_row: end_line - 1,
        end_col: (end_col - 1) as usize,
    }
}

fn truncate_line(line: &str) -> String {
    if line.chars().count() > MAX_LINE_CHARS {
        let kept: String = line.chars().take(MAX_LINE_CHARS - 3).collect();
        format!("{kept}...")
    } else {
        line.to_string()
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_header(diagnostic);
        self.write_snippet(diagnostic);

        for hint in &diagnostic.hints {
            let prefix = self.paint("= help:", colors::GREEN);
            let _ = writeln!(self.writer, "   {prefix} {hint}");
        }
        for note in &diagnostic.notes {
            let prefix = self.paint("= note:", colors::BLUE);
            let _ = writeln!(self.writer, "   {prefix} {note}");
        }
        let info = self.paint(
            &format!("= info: rad --explain {}", diagnostic.code),
            colors::CYAN,
        );
        let _ = writeln!(self.writer, "   {info}");
        let _ = writeln!(self.writer);
    }

    fn emit_truncated(&mut self, remaining: usize) {
        if remaining > 0 {
            let text = self.paint(&format!("...and {remaining} more errors"), colors::YELLOW);
            let _ = writeln!(self.writer, "{text}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;
    use rad_ir::Span;

    use super::*;
    use crate::ErrorCode;

    fn render(diag: &Diagnostic, source: &str, mode: ColorMode) -> String {
        let mut output = Vec::new();
        {
            let mut emitter = TerminalEmitter::with_color_mode(&mut output, mode, false)
                .with_source(SourceFile::new("TestCase", source));
            emitter.emit(diag);
            emitter.flush();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_snippet_layout() {
        let source = "\nprint(truncate(\"hello\", 0))\n";
        let diag = Diagnostic::error(ErrorCode::NumInvalidRange)
            .with_message("Requires at least 1, got 0")
            .with_label(Span::new(7, 27), "");
        let expected = [
            "error[RAD20017]: Requires at least 1, got 0",
            "  --> TestCase:2:7",
            "  |",
            "1 | ",
            "2 | print(truncate(\"hello\", 0))",
            "  |       ^^^^^^^^^^^^^^^^^^^^",
            "3 | ",
            "  |",
            "   = info: rad --explain RAD20017",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(render(&diag, source, ColorMode::Never), expected);
    }

    #[test]
    fn test_hints_and_label_message() {
        let source = "for idx, item in [1, 2, 3]:\n    print(idx)\n";
        let diag = Diagnostic::error(ErrorCode::UnpackMismatch)
            .with_message("Cannot unpack \"int\" into 2 values")
            .with_label(Span::new(4, 13), "here")
            .with_hint("Use `for item in items with loop:` for the index");
        let text = render(&diag, source, ColorMode::Never);
        assert!(text.contains("1 | for idx, item in [1, 2, 3]:"));
        assert!(text.contains("  |     ^^^^^^^^^ here"));
        assert!(text.contains("   = help: Use `for item in items with loop:` for the index"));
        assert!(text.contains("   = info: rad --explain RAD20033"));
    }

    #[test]
    fn test_gap_between_labels_shows_ellipsis() {
        let source = "a\nb\nc\nd\ne\nf\ng\nh\n";
        let diag = Diagnostic::error(ErrorCode::TypeMismatch)
            .with_message("mismatch")
            .with_label(Span::new(0, 1), "first")
            .with_secondary_label(Span::new(14, 15), "second");
        let text = render(&diag, source, ColorMode::Never);
        assert!(text.contains("\n...\n"), "missing ellipsis:\n{text}");
        assert!(text.contains("  | - second"));
    }

    #[test]
    fn test_no_source_renders_header_only() {
        let mut output = Vec::new();
        {
            let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
            emitter.emit(
                &Diagnostic::error(ErrorCode::UserInput)
                    .with_message("Missing required argument 'name'")
                    .with_label(Span::new(0, 3), ""),
            );
        }
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "error[RAD20010]: Missing required argument 'name'\n   = info: rad --explain RAD20010\n\n"
        );
    }

    #[test]
    fn test_color_mode_always_emits_ansi() {
        let diag = Diagnostic::error(ErrorCode::InvalidSyntax)
            .with_message("bad")
            .with_label(Span::new(0, 1), "");
        assert!(render(&diag, "x", ColorMode::Always).contains("\x1b["));
        assert!(!render(&diag, "x", ColorMode::Never).contains("\x1b["));
    }

    #[test]
    fn test_truncated_count() {
        let mut output = Vec::new();
        {
            let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
            emitter.emit_truncated(0);
            emitter.emit_truncated(4);
        }
        assert_eq!(String::from_utf8(output).unwrap(), "...and 4 more errors\n");
    }

    #[test]
    fn test_color_mode_resolution() {
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
        assert_eq!(ColorMode::default(), ColorMode::Auto);
    }

    #[test]
    fn test_long_lines_are_cut() {
        let long = "x".repeat(200);
        assert_eq!(truncate_line(&long).chars().count(), MAX_LINE_CHARS);
        assert!(truncate_line(&long).ends_with("..."));
        assert_eq!(truncate_line("short"), "short");
    }
}
