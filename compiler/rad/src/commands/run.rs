//! Parse, bind arguments, and run a script.

use std::io::{IsTerminal, Write};

use rad_diagnostic::emitter::{ColorMode, SourceFile, TerminalEmitter};
use rad_diagnostic::queue::{DiagnosticCollector, DiagnosticConfig};
use rad_diagnostic::Diagnostic;
use rad_eval::args::{self, usage, Binding};
use rad_eval::collab::{HttpClient, MockHttpClient, ShellExecutor, SystemShell, UnavailableHttpClient};
use rad_eval::diagnostics::to_diagnostic;
use rad_eval::{stdout_handler, BuiltinRegistry, InterpreterBuilder, SharedPrintHandler};
use tracing::debug;

use crate::config::RunConfig;

/// Where a run's output and side effects go.
pub struct RunIo<'a> {
    pub print: SharedPrintHandler,
    pub shell: Box<dyn ShellExecutor>,
    /// Diagnostics are written here, not through `print`.
    pub diagnostics: &'a mut dyn Write,
    pub stdout_is_tty: bool,
    pub stderr_is_tty: bool,
}

/// Run the script at `config.script` against the real terminal and shell.
pub fn run_file(config: RunConfig) -> i32 {
    let source = match std::fs::read_to_string(&config.script) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", config.script.display());
            return 1;
        }
    };
    let mut stderr = std::io::stderr();
    let io = RunIo {
        print: stdout_handler(),
        shell: Box::new(SystemShell),
        stdout_is_tty: std::io::stdout().is_terminal(),
        stderr_is_tty: stderr.is_terminal(),
        diagnostics: &mut stderr,
    };
    run_source(config, &source, io)
}

/// Run `source` as the script described by `config`; returns the exit code.
#[tracing::instrument(level = "debug", skip_all, fields(script = %config.script.display()))]
pub fn run_source(config: RunConfig, source: &str, io: RunIo<'_>) -> i32 {
    let script_name = config.script_name();
    let interpreter_config = config.interpreter_config(io.stdout_is_tty);
    let mut reporter = Reporter {
        out: io.diagnostics,
        source: SourceFile::new(config.script.display().to_string(), source),
        color: config.color,
        is_tty: io.stderr_is_tty,
        error_limit: config.error_limit,
    };

    let parsed = rad_parse::parse(source);
    if parsed.has_errors() {
        debug!(errors = parsed.errors.len(), "parse failed");
        reporter.report(parsed.errors.iter().map(rad_parse::ParseError::to_diagnostic));
        return 1;
    }
    if config.check_only {
        return 0;
    }

    let program = parsed.program;
    let help = || {
        usage(
            &script_name,
            program.description.as_deref(),
            program.args.as_ref(),
        )
    };
    let script_args = match args::bind(program.args.as_ref(), &config.script_args) {
        Ok(Binding::Args(bound)) => bound,
        Ok(Binding::Help) => {
            io.print.print(&help());
            return 0;
        }
        Err(err) => {
            reporter.report([Diagnostic::error(err.code()).with_message(err.to_string())]);
            io.print.print_err(&help());
            return 1;
        }
    };

    let http: Box<dyn HttpClient> = if config.mocks.is_empty() {
        Box::new(UnavailableHttpClient)
    } else {
        Box::new(MockHttpClient::new(config.mocks))
    };
    let builtins = BuiltinRegistry::new();
    let mut interpreter = InterpreterBuilder::new(&builtins)
        .config(interpreter_config)
        .print_handler(io.print)
        .shell(io.shell)
        .http_client(http)
        .build();
    let outcome = interpreter.run(&program, &script_args);

    reporter.report(outcome.errors.iter().map(to_diagnostic));
    if outcome.exit_code == 0 && !outcome.errors.is_empty() {
        1
    } else {
        outcome.exit_code
    }
}

/// Renders diagnostics against the script source through a bounded collector.
struct Reporter<'a> {
    out: &'a mut dyn Write,
    source: SourceFile,
    color: ColorMode,
    is_tty: bool,
    error_limit: usize,
}

impl Reporter<'_> {
    fn report(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        let mut collector = DiagnosticCollector::with_config(DiagnosticConfig {
            error_limit: self.error_limit,
        });
        for diagnostic in diagnostics {
            // Past the limit this only counts, for the summary line.
            collector.add(diagnostic);
        }
        if collector.total_emitted() == 0 {
            return;
        }
        let mut emitter = TerminalEmitter::with_color_mode(&mut *self.out, self.color, self.is_tty)
            .with_source(self.source.clone());
        collector.emit_to(&mut emitter);
    }
}

#[cfg(test)]
mod tests;
