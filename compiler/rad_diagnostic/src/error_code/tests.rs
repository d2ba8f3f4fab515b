use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::UnexpectedToken.to_string(), "RAD10009");
    assert_eq!(ErrorCode::UndefinedVariable.as_str(), "RAD20028");
    assert_eq!(ErrorCode::GenericRuntime.as_str(), "RAD20000");
}

#[test]
fn test_error_code_categories() {
    assert!(ErrorCode::MissingColon.is_syntax_error());
    assert!(ErrorCode::SwitchNoMatch.is_runtime_error());
    assert!(ErrorCode::TypeMismatch.is_type_error());
    assert!(ErrorCode::ScientificNotationNotWholeNumber.is_validation_error());

    assert!(!ErrorCode::TypeMismatch.is_runtime_error());
    assert!(!ErrorCode::UnknownFunction.is_syntax_error());
}

#[test]
fn test_predicate_exclusivity() {
    for code in ErrorCode::ALL {
        let hits = [
            code.is_syntax_error(),
            code.is_runtime_error(),
            code.is_type_error(),
            code.is_validation_error(),
        ]
        .iter()
        .filter(|b| **b)
        .count();
        assert_eq!(hits, 1, "{code} should be in exactly one category");
    }
}

#[test]
fn test_codes_unique_and_sorted() {
    let numbers: Vec<u32> = ErrorCode::ALL.iter().map(|c| c.number()).collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(numbers, sorted);
}

#[test]
fn test_parse_accepts_prefix_variants() {
    assert_eq!(
        ErrorCode::parse("RAD20033"),
        Some(ErrorCode::UnpackMismatch)
    );
    assert_eq!(
        ErrorCode::parse("rad20033"),
        Some(ErrorCode::UnpackMismatch)
    );
    assert_eq!(ErrorCode::parse("20033"), Some(ErrorCode::UnpackMismatch));
    assert_eq!(ErrorCode::parse("RAD99999"), None);
    assert_eq!(ErrorCode::parse("nonsense"), None);
}
