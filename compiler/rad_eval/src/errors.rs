//! Runtime errors.
//!
//! Every failure the interpreter can raise is an [`EvalErrorKind`] variant
//! with a stable [`ErrorCode`]. Factory functions build errors in one place
//! so messages stay consistent; call sites attach the span.
//!
//! `exit(n)` also travels as an error ([`EvalErrorKind::Exit`]) so it unwinds
//! through every frame, but `catch` and `??` never intercept it.

use std::fmt;
use std::rc::Rc;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::BinaryOp;
use rad_ir::Span;

use crate::json_fields::ExtractError;
use crate::value::{RadError, RadString, Value};

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("Cannot invoke unknown function: {name}")]
    UnknownFunction { name: String },
    #[error("Cannot invoke '{name}' as a function: it is a {type_name}")]
    NotCallable { name: String, type_name: &'static str },

    #[error("Divisor was 0, cannot divide by 0")]
    DivisionByZero,
    #[error("Value is 0, cannot modulo by 0")]
    ModuloByZero,
    #[error("Integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },
    #[error("Invalid operand types: cannot do '{left} {op} {right}'{suffix}")]
    InvalidOperands {
        left: &'static str,
        op: String,
        right: &'static str,
        suffix: &'static str,
    },
    #[error("Invalid operand type for '{op}': {type_name}")]
    InvalidUnaryOperand { op: &'static str, type_name: &'static str },

    #[error("Index out of bounds: {index} (length {len})")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },
    #[error("Indexing not supported for {type_name}")]
    CannotIndex { type_name: &'static str },
    #[error("Cannot use {type_name} as a map key")]
    InvalidMapKey { type_name: &'static str },
    #[error("Cannot iterate through a {type_name}")]
    NotIterable { type_name: &'static str },
    #[error("Cannot unpack \"{type_name}\" into {count} values")]
    UnpackMismatch { type_name: &'static str, count: usize },
    #[error("Expected {expected} outputs, got {got}")]
    OutputCountMismatch { expected: usize, got: usize },

    #[error("No matching case found")]
    SwitchNoMatch,
    #[error("Multiple matching cases found")]
    SwitchMultipleMatch,
    #[error("Cannot 'break' outside of a for loop")]
    BreakOutsideLoop,
    #[error("Cannot 'continue' outside of a for loop")]
    ContinueOutsideLoop,
    #[error("Cannot 'return' outside of a function")]
    ReturnOutsideFunction,
    #[error("Cannot 'yield' outside of a switch")]
    YieldOutsideSwitch,
    #[error("Switch case produced no value")]
    SwitchNoValue,

    /// Call binding and return-type failures; the message is preformatted.
    #[error("{message}")]
    TypeMismatch { message: String },
    #[error("{message}")]
    Binding { message: String },
    #[error("Scientific notation value does not evaluate to a whole number: {literal}")]
    ScientificNotWhole { literal: String },
    #[error("Expected a value, but got void value from '{name}'")]
    VoidValue { name: String },
    #[error("Maximum call depth of {limit} exceeded")]
    StackOverflow { limit: usize },
    #[error("Function '{name}' has the same name as a script argument")]
    FunctionShadowsArgument { name: String },

    #[error("Cannot format {type_name} with a precision {spec:?}")]
    CannotFormat { type_name: &'static str, spec: String },
    #[error("Invalid color value {value:?}. Allowed: {allowed}")]
    InvalidColor { value: String, allowed: String },
    #[error("Invalid regex {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Command failed with exit code {code}: {command}")]
    ShellFailed { command: String, code: i32 },
    #[error("exit({code})")]
    Exit { code: i32 },

    /// An `error` value returned from a call.
    #[error("{message}")]
    Raised { code: ErrorCode, message: String },
    /// Builtin failures with their own code.
    #[error("{message}")]
    Other { code: ErrorCode, message: String },
}

impl EvalErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndefinedVariable { .. } => ErrorCode::UndefinedVariable,
            Self::UnknownFunction { .. } => ErrorCode::UnknownFunction,
            Self::NotCallable { .. } | Self::Binding { .. } => ErrorCode::InvalidArgType,
            Self::DivisionByZero | Self::ModuloByZero => ErrorCode::DivisionByZero,
            Self::IntegerOverflow { .. } | Self::InvalidUnaryOperand { .. } => {
                ErrorCode::UnsupportedOperation
            }
            Self::InvalidOperands { .. } => ErrorCode::InvalidTypeForOp,
            Self::IndexOutOfBounds { .. } => ErrorCode::IndexOutOfBounds,
            Self::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            Self::CannotIndex { .. } | Self::InvalidMapKey { .. } => ErrorCode::CannotIndex,
            Self::NotIterable { .. } => ErrorCode::NotIterable,
            Self::UnpackMismatch { .. } | Self::OutputCountMismatch { .. } => {
                ErrorCode::UnpackMismatch
            }
            Self::SwitchNoMatch => ErrorCode::SwitchNoMatch,
            Self::SwitchMultipleMatch => ErrorCode::SwitchMultipleMatch,
            Self::BreakOutsideLoop => ErrorCode::BreakOutsideLoop,
            Self::ContinueOutsideLoop => ErrorCode::ContinueOutsideLoop,
            Self::ReturnOutsideFunction
            | Self::YieldOutsideSwitch
            | Self::SwitchNoValue
            | Self::StackOverflow { .. }
            | Self::ShellFailed { .. }
            | Self::Exit { .. } => ErrorCode::GenericRuntime,
            Self::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Self::ScientificNotWhole { .. } => ErrorCode::ScientificNotationNotWholeNumber,
            Self::VoidValue { .. } => ErrorCode::VoidValue,
            Self::FunctionShadowsArgument { .. } => ErrorCode::HoistedFunctionShadowsArgument,
            Self::CannotFormat { .. } => ErrorCode::CannotFormat,
            Self::InvalidColor { .. } => ErrorCode::ColorizeValNotInEnum,
            Self::InvalidRegex { .. } => ErrorCode::InvalidRegex,
            Self::Raised { code, .. } | Self::Other { code, .. } => *code,
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Name of the called function.
    pub name: String,
    /// Where the call was made.
    pub span: Span,
}

/// Snapshot of the user-function call stack at an error site, most recent
/// call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {} at {}", frame.name, frame.span)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    pub span: Option<Span>,
    pub hint: Option<String>,
    pub backtrace: Option<EvalBacktrace>,
    /// Error value to hand to `catch`, when the failure started as one.
    pub propagated_value: Option<Rc<RadError>>,
}

impl EvalError {
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            message: kind.to_string(),
            kind,
            span: None,
            hint: None,
            backtrace: None,
            propagated_value: None,
        }
    }

    /// Failure raised by an `error` value escaping a call.
    pub fn from_error_value(error: Rc<RadError>) -> Self {
        let mut err = EvalError::from_kind(EvalErrorKind::Raised {
            code: error.code,
            message: error.message.plain().into_owned(),
        });
        err.hint.clone_from(&error.hint);
        err.propagated_value = Some(error);
        err
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if !backtrace.is_empty() && self.backtrace.is_none() {
            self.backtrace = Some(backtrace);
        }
        self
    }

    /// `exit()` unwinding; never caught.
    pub fn is_exit(&self) -> bool {
        matches!(self.kind, EvalErrorKind::Exit { .. })
    }

    /// Process exit code this failure terminates with.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            EvalErrorKind::Exit { code } | EvalErrorKind::ShellFailed { code, .. } => code,
            _ => 1,
        }
    }

    /// The `error` value `catch` produces for this failure.
    pub fn to_error_value(&self) -> Value {
        if let Some(value) = &self.propagated_value {
            return Value::Error(Rc::clone(value));
        }
        Value::Error(Rc::new(RadError {
            message: RadString::new(self.message.clone()),
            code: self.code(),
            hint: self.hint.clone(),
        }))
    }
}

// Name resolution

#[cold]
pub fn json_extraction_failed(err: &ExtractError) -> EvalError {
    let code = match err {
        ExtractError::KeyNotFound { .. } => ErrorCode::KeyNotFound,
        ExtractError::ExpectedArray { .. } | ExtractError::ExpectedMap { .. } => ErrorCode::TypeMismatch,
        ExtractError::IndexOutOfBounds { .. } => ErrorCode::IndexOutOfBounds,
        ExtractError::CannotMerge { .. } => ErrorCode::GenericRuntime,
    };
    other(code, err.to_string())
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn unknown_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_callable(name: &str, value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        name: name.to_string(),
        type_name: value.type_name(),
    })
}

// Operators

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

/// `'list + int'`-style operand mismatch. `compound` renders `+=`.
#[cold]
pub fn invalid_operands(left: &Value, op: BinaryOp, right: &Value, compound: bool) -> EvalError {
    let mut op_str = op.as_symbol().to_string();
    if compound {
        op_str.push('=');
    }
    let suffix = if op == BinaryOp::Add && matches!(left, Value::List(_)) {
        ". Did you mean to wrap the right side in a list in order to append?"
    } else {
        ""
    };
    EvalError::from_kind(EvalErrorKind::InvalidOperands {
        left: left.type_name(),
        op: op_str,
        right: right.type_name(),
        suffix,
    })
}

#[cold]
pub fn invalid_unary_operand(op: &'static str, value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOperand {
        op,
        type_name: value.type_name(),
    })
}

// Collections

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn key_not_found(key: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_printable(false),
    })
}

#[cold]
pub fn cannot_index(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotIndex {
        type_name: value.type_name(),
    })
}

#[cold]
pub fn invalid_map_key(key: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidMapKey {
        type_name: key.type_name(),
    })
}

#[cold]
pub fn not_iterable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: value.type_name(),
    })
}

#[cold]
pub fn unpack_mismatch(value: &Value, count: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnpackMismatch {
        type_name: value.type_name(),
        count,
    })
}

#[cold]
pub fn output_count_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OutputCountMismatch { expected, got })
}

// Control flow

#[cold]
pub fn switch_no_match() -> EvalError {
    EvalError::from_kind(EvalErrorKind::SwitchNoMatch)
}

#[cold]
pub fn switch_multiple_match() -> EvalError {
    EvalError::from_kind(EvalErrorKind::SwitchMultipleMatch)
}

#[cold]
pub fn break_outside_loop() -> EvalError {
    EvalError::from_kind(EvalErrorKind::BreakOutsideLoop)
}

#[cold]
pub fn continue_outside_loop() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ContinueOutsideLoop)
}

#[cold]
pub fn return_outside_function() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReturnOutsideFunction)
}

#[cold]
pub fn yield_outside_switch() -> EvalError {
    EvalError::from_kind(EvalErrorKind::YieldOutsideSwitch)
}

#[cold]
pub fn switch_no_value() -> EvalError {
    EvalError::from_kind(EvalErrorKind::SwitchNoValue)
}

#[cold]
pub fn exit(code: i32) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Exit { code })
}

// Calls and types

#[cold]
pub fn type_mismatch(message: String) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch { message })
}

#[cold]
pub fn binding_error(message: String) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Binding { message })
}

#[cold]
pub fn scientific_not_whole(literal: f64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ScientificNotWhole {
        literal: crate::value::format_float(literal),
    })
}

#[cold]
pub fn scientific_out_of_range(literal: f64) -> EvalError {
    other(
        ErrorCode::NumInvalidRange,
        format!("Scientific notation value is outside the int range: {literal:e}"),
    )
}

#[cold]
pub fn void_value(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::VoidValue {
        name: name.to_string(),
    })
}

#[cold]
pub fn stack_overflow(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { limit })
}

#[cold]
pub fn function_shadows_argument(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FunctionShadowsArgument {
        name: name.to_string(),
    })
}

// Formatting and strings

#[cold]
pub fn cannot_format(value: &Value, spec: String) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotFormat {
        type_name: value.type_name(),
        spec,
    })
}

#[cold]
pub fn invalid_color(value: &str) -> EvalError {
    let allowed: Vec<&str> = crate::value::Color::ALL.iter().map(|c| c.name()).collect();
    EvalError::from_kind(EvalErrorKind::InvalidColor {
        value: value.to_string(),
        allowed: allowed.join(", "),
    })
}

#[cold]
pub fn invalid_regex(pattern: &str, err: &regex::Error) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidRegex {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

// Collaborators

#[cold]
pub fn shell_failed(command: &str, code: i32) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ShellFailed {
        command: command.to_string(),
        code,
    })
}

/// Builtin failure with a specific code.
#[cold]
pub fn other(code: ErrorCode, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Other {
        code,
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages_follow_kind() {
        assert_eq!(
            undefined_variable("foo").message,
            "Undefined variable: foo"
        );
        assert_eq!(
            unpack_mismatch(&Value::Int(1), 2).message,
            "Cannot unpack \"int\" into 2 values"
        );
        assert_eq!(
            invalid_operands(&Value::list(vec![]), BinaryOp::Add, &Value::Int(1), true).message,
            "Invalid operand types: cannot do 'list += int'. Did you mean to wrap the right side in a list in order to append?"
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(division_by_zero().code(), ErrorCode::DivisionByZero);
        assert_eq!(switch_no_match().code(), ErrorCode::SwitchNoMatch);
        assert_eq!(
            scientific_not_whole(1e-5).code(),
            ErrorCode::ScientificNotationNotWholeNumber
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit(3).exit_code(), 3);
        assert!(exit(0).is_exit());
        assert_eq!(shell_failed("false", 2).exit_code(), 2);
        assert_eq!(undefined_variable("x").exit_code(), 1);
    }

    #[test]
    fn test_catch_value_round_trips_error_value() {
        let original = Rc::new(RadError::new("boom"));
        let err = EvalError::from_error_value(Rc::clone(&original));
        assert_eq!(err.message, "boom");
        let Value::Error(caught) = err.to_error_value() else {
            panic!("expected error value");
        };
        assert!(Rc::ptr_eq(&caught, &original));
    }

    #[test]
    fn test_or_span_keeps_precise_span() {
        let err = undefined_variable("x")
            .with_span(Span::new(4, 5))
            .or_span(Span::new(0, 10));
        assert_eq!(err.span, Some(Span::new(4, 5)));
    }
}
