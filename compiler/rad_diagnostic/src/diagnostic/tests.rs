use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::UndefinedVariable)
        .with_message("Undefined variable: foo")
        .with_label(Span::new(6, 9), "")
        .with_secondary_label(Span::new(0, 1), "similar name defined here")
        .with_hint("Define the variable before using it")
        .with_note("in 'main'");

    assert_eq!(diag.code, ErrorCode::UndefinedVariable);
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert!(!diag.labels[1].is_primary);
    assert_eq!(diag.hints, ["Define the variable before using it"]);
    assert_eq!(diag.notes, ["in 'main'"]);
}

#[test]
fn test_primary_span_prefers_primary_label() {
    let diag = Diagnostic::error(ErrorCode::TypeMismatch)
        .with_secondary_label(Span::new(0, 2), "declared here")
        .with_label(Span::new(10, 12), "");
    assert_eq!(diag.primary_span(), Some(Span::new(10, 12)));
}

#[test]
fn test_primary_span_falls_back_to_first_label() {
    let diag = Diagnostic::error(ErrorCode::TypeMismatch)
        .with_secondary_label(Span::new(3, 4), "only label");
    assert_eq!(diag.primary_span(), Some(Span::new(3, 4)));
    assert_eq!(Diagnostic::error(ErrorCode::InternalBug).primary_span(), None);
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::GenericRuntime);
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "warning");
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::DivisionByZero).with_message("Cannot divide by zero");
    assert_eq!(diag.to_string(), "error[RAD20036]: Cannot divide by zero");
}
