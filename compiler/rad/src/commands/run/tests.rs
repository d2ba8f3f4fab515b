use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rad_diagnostic::emitter::ColorMode;
use rad_eval::buffer_handler;
use rad_eval::collab::{MockResponse, MockShell};

use super::*;

fn config(args: &[&str]) -> RunConfig {
    RunConfig {
        script: PathBuf::from("scripts/greet.rad"),
        script_args: args.iter().map(ToString::to_string).collect(),
        check_only: false,
        color: ColorMode::Never,
        mocks: Vec::new(),
        error_limit: 10,
        confirm_shell: false,
        stack_depth: 1000,
    }
}

struct Finished {
    code: i32,
    stdout: String,
    stderr: String,
    diagnostics: String,
}

fn run(config: RunConfig, source: &str) -> Finished {
    let print = buffer_handler();
    let mut diagnostics = Vec::new();
    let code = run_source(
        config,
        source,
        RunIo {
            print: print.clone(),
            shell: Box::new(MockShell::new()),
            diagnostics: &mut diagnostics,
            stdout_is_tty: false,
            stderr_is_tty: false,
        },
    );
    Finished {
        code,
        stdout: print.get_output(),
        stderr: print.get_error_output(),
        diagnostics: String::from_utf8_lossy(&diagnostics).into_owned(),
    }
}

const GREET: &str = "---\nGreets someone.\n---\nargs:\n    name str # who to greet\n    times t int = 1\nfor i in range(times):\n    print(\"hi {name}\")\n";

#[test]
fn test_runs_with_bound_arguments() {
    let done = run(config(&["ana", "-t", "2"]), GREET);
    assert_eq!(done.code, 0);
    assert_eq!(done.stdout, "hi ana\nhi ana\n");
    assert_eq!(done.diagnostics, "");
}

#[test]
fn test_help_prints_usage() {
    let done = run(config(&["--help"]), GREET);
    assert_eq!(done.code, 0);
    assert!(done.stdout.starts_with("Greets someone.\n\nUsage:\n  greet.rad <name> [times]\n"));
    assert!(done.stdout.contains("who to greet"));
}

#[test]
fn test_bad_arguments_report_and_show_usage() {
    let done = run(config(&[]), GREET);
    assert_eq!(done.code, 1);
    assert!(done.diagnostics.starts_with("error[RAD20010]: Missing required arguments: [name]"));
    assert!(done.stderr.contains("Usage:"));
    assert_eq!(done.stdout, "");
}

#[test]
fn test_fractional_scientific_default_is_reported() {
    let done = run(config(&[]), "args:\n    num int = 1e-5\nprint(num)\n");
    assert_eq!(done.code, 1);
    assert!(done.diagnostics.starts_with(
        "error[RAD40001]: Scientific notation value does not evaluate to a whole number"
    ));
    assert_eq!(done.stdout, "");
}

#[test]
fn test_parse_errors_stop_before_running() {
    let done = run(config(&[]), "print(1)\nx = (\n");
    assert_eq!(done.code, 1);
    assert_eq!(done.stdout, "");
    assert!(done.diagnostics.contains("scripts/greet.rad:"));
}

#[test]
fn test_check_only_does_not_run() {
    let mut check = config(&[]);
    check.check_only = true;
    let done = run(check, "print(\"side effect\")\n");
    assert_eq!(done.code, 0);
    assert_eq!(done.stdout, "");
}

#[test]
fn test_runtime_errors_are_rendered_with_source() {
    let done = run(config(&[]), "x = 1\nprint(y)\n");
    assert_eq!(done.code, 1);
    assert!(done.diagnostics.starts_with("error[RAD20028]: Undefined variable: y"));
    assert!(done.diagnostics.contains("2 | print(y)"));
    assert!(done.diagnostics.contains("rad --explain RAD20028"));
}

#[test]
fn test_error_limit_summarizes_the_rest() {
    let mut limited = config(&[]);
    limited.error_limit = 1;
    let done = run(limited, "defer:\n    print(a)\ndefer:\n    print(b)\nprint(c)\n");
    assert_eq!(done.diagnostics.matches("error[").count(), 1);
    assert!(done.diagnostics.contains("...and 2 more errors"));
}

#[test]
fn test_exit_code_passes_through() {
    assert_eq!(run(config(&[]), "exit(7)\n").code, 7);
}

#[test]
fn test_mocked_http() {
    let mut mocked = config(&[]);
    match MockResponse::inline("example\\.com", "{\"ok\": true}") {
        Ok(mock) => mocked.mocks.push(mock),
        Err(err) => panic!("{err}"),
    }
    let done = run(
        mocked,
        "r = http_get(\"https://example.com/status\")\nprint(parse_json(r.body).ok)\n",
    );
    assert_eq!(done.stdout, "true\n");
}
