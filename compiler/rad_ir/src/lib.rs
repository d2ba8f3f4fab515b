//! Rad IR
//!
//! Shared data structures for the Rad runtime:
//! - [`Span`] source locations
//! - the syntax tree ([`ast`]) produced by `rad_parse`
//! - declared [`Type`] descriptors used by the call binder

pub mod ast;
mod span;
mod ty;

pub use span::{Span, SpanError, Spanned};
pub use ty::{StructField, Type};
