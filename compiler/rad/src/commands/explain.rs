//! `--explain`: print the embedded documentation for an error code.

use rad_diagnostic::{ErrorCode, ErrorDocs};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExplainError {
    #[error("Unknown error code: {0}\n\nCodes look like RAD20028 (the RAD prefix is optional).")]
    UnknownCode(String),
    #[error("No documentation available for {0} yet; the error message itself is the best guide.")]
    NoDocs(ErrorCode),
}

/// Documentation text for `code_str`.
pub fn explain(code_str: &str) -> Result<&'static str, ExplainError> {
    let code =
        ErrorCode::parse(code_str).ok_or_else(|| ExplainError::UnknownCode(code_str.to_string()))?;
    ErrorDocs::get(code).ok_or(ExplainError::NoDocs(code))
}

/// Print the docs for `code_str` and return the exit code.
pub fn explain_error(code_str: &str) -> i32 {
    match explain(code_str) {
        Ok(doc) => {
            println!("{doc}");
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_documented_code() {
        let doc = explain("rad20028").unwrap_or_default();
        assert!(!doc.is_empty());
        assert_eq!(explain("20028"), explain("RAD20028"));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            explain("E0001"),
            Err(ExplainError::UnknownCode("E0001".to_string()))
        );
    }

    #[test]
    fn test_code_without_docs() {
        let undocumented = ErrorCode::ALL.iter().copied().find(|code| !ErrorDocs::has_docs(*code));
        let Some(code) = undocumented else {
            panic!("every code is documented");
        };
        assert_eq!(explain(code.as_str()), Err(ExplainError::NoDocs(code)));
    }
}
