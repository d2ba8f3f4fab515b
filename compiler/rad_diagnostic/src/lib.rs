//! Diagnostic system for Rad.
//!
//! Every user-visible failure becomes a [`Diagnostic`]:
//! - an [`ErrorCode`] (`RADxxxxx`) that `rad --explain` can look up
//! - a one-line message
//! - primary and secondary labels pointing into the script
//! - `help` hints and `note` lines
//!
//! [`emitter::TerminalEmitter`] renders them; [`queue::DiagnosticCollector`]
//! caps how many are shown.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
