//! Call-stack tracking and conversion of runtime errors to diagnostics.
//!
//! - [`CallStack`]: live frames of user-function calls, with the depth limit
//! - [`to_diagnostic`]: turns an [`EvalError`] into a renderable
//!   [`Diagnostic`], one secondary label per frame of its backtrace

use rad_diagnostic::Diagnostic;
use rad_ir::Span;
use rad_stack::DepthLimit;

use crate::errors::{stack_overflow, BacktraceFrame, EvalBacktrace, EvalError};

/// One live call.
#[derive(Clone, Debug)]
pub struct CallFrame {
    pub name: String,
    /// Where the call was made, not where the function was defined.
    pub call_span: Span,
}

/// Frames of the user-function calls in progress.
///
/// The depth check is part of [`push`](CallStack::push), so a frame that
/// would exceed the limit is never recorded.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    depth: DepthLimit,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            depth: DepthLimit::new(max_depth),
        }
    }

    /// Push a frame.
    ///
    /// # Errors
    ///
    /// The depth limit would be exceeded; nothing is pushed.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        self.depth
            .enter()
            .map_err(|exceeded| stack_overflow(exceeded.limit).with_span(frame.call_span))?;
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
        self.depth.exit();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Snapshot of the frames, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .rev()
                .map(|f| BacktraceFrame {
                    name: f.name.clone(),
                    span: f.call_span,
                })
                .collect(),
        )
    }

    /// Attach the current frames to `err` unless it already has a backtrace.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

/// Render-ready form of a runtime error.
///
/// Errors without a span (rare; raised before any statement ran) get no
/// primary label and render as a bare message.
pub fn to_diagnostic(err: &EvalError) -> Diagnostic {
    let mut diag = Diagnostic::error(err.code()).with_message(err.message.clone());
    if let Some(span) = err.span {
        diag = diag.with_label(span, "");
    }
    if let Some(hint) = &err.hint {
        diag = diag.with_hint(hint.clone());
    }
    if let Some(backtrace) = &err.backtrace {
        for frame in backtrace.frames() {
            diag = diag.with_secondary_label(frame.span, format!("in call to '{}'", frame.name));
        }
    }
    diag
}
