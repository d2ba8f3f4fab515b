//! What the `rad` binary can do.

mod explain;
mod run;

use std::process::ExitCode;

pub use explain::{explain, explain_error, ExplainError};
pub use run::{run_file, run_source, RunIo};

use crate::config::Command;

/// Carry out `command`; returns the process exit code.
pub fn execute(command: Command) -> i32 {
    match command {
        Command::Explain(code) => explain_error(&code),
        Command::Run(config) => run_file(config),
    }
}

/// Exit codes outside `0..=255` become a generic failure.
pub fn to_exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
