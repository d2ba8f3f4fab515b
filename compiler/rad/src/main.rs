//! Rad CLI
//!
//! `rad [flags] <script> [script args...]`

use std::process::ExitCode;

use clap::Parser;
use rad::commands::{execute, to_exit_code};
use rad::config::Cli;
use rad::logging::init_tracing;

fn main() -> ExitCode {
    init_tracing();
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    match Cli::parse().resolve(no_color) {
        Ok(command) => to_exit_code(execute(command)),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
