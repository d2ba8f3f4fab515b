//! The `rad` command-line runner.
//!
//! - [`config`]: flags parsed with `clap` and the resolved [`config::RunConfig`]
//! - [`commands`]: running a script and `--explain`
//! - [`logging`]: opt-in tracing output

pub mod commands;
pub mod config;
pub mod logging;
