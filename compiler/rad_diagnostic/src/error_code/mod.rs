//! Error codes for all Rad diagnostics.
//!
//! Each code renders as `RAD` followed by five digits. The first digit is the
//! category and is stable across releases so `rad --explain` links keep working.

use std::fmt;

macro_rules! error_codes {
    ($($(#[$doc:meta])* $name:ident = $num:literal,)*) => {
        /// Error codes for all Rad diagnostics.
        ///
        /// - RAD1xxxx: syntax errors
        /// - RAD2xxxx: runtime errors
        /// - RAD3xxxx: type errors
        /// - RAD4xxxx: validation errors
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ErrorCode {
            $($(#[$doc])* $name,)*
        }

        impl ErrorCode {
            /// All codes, in numeric order.
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$name,)*];

            /// Numeric part of the code (`20028` for `RAD20028`).
            pub const fn number(self) -> u32 {
                match self {
                    $(ErrorCode::$name => $num,)*
                }
            }

            /// Full code string, e.g. `"RAD20028"`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(ErrorCode::$name => concat!("RAD", $num),)*
                }
            }
        }
    };
}

error_codes! {
    // Syntax
    /// Catch-all syntax error
    InvalidSyntax = 10001,
    /// Block header without a trailing `:`
    MissingColon = 10002,
    /// Identifier expected
    MissingIdentifier = 10003,
    /// Expression expected
    MissingExpression = 10004,
    MissingCloseParen = 10005,
    MissingCloseBracket = 10006,
    MissingCloseBrace = 10007,
    /// Keyword used as an identifier
    ReservedKeyword = 10008,
    UnexpectedToken = 10009,

    // Runtime
    /// Failure without a more specific code
    GenericRuntime = 20000,
    ParseIntFailed = 20001,
    ParseFloatFailed = 20002,
    FileRead = 20003,
    FileNoPermission = 20004,
    FileNoExist = 20005,
    FileWrite = 20006,
    /// Script argument could not be converted or is missing
    UserInput = 20010,
    ParseJson = 20011,
    /// Two script arguments that exclude each other were both given
    MutualExclArgs = 20014,
    /// `zip(..., strict=true)` with lists of different lengths
    ZipStrict = 20015,
    Cast = 20016,
    /// Number outside the range a function accepts
    NumInvalidRange = 20017,
    EmptyList = 20018,
    /// Script argument constraint violated
    ArgsContradict = 20019,
    /// Malformed base64 or base16 input
    Decode = 20021,
    SleepStr = 20023,
    InvalidRegex = 20024,
    /// Unknown color name
    ColorizeValNotInEnum = 20025,
    StdinRead = 20026,
    UndefinedVariable = 20028,
    IndexOutOfBounds = 20029,
    BreakOutsideLoop = 20030,
    ContinueOutsideLoop = 20031,
    NotIterable = 20032,
    /// `for a, b in ...` over items that are not lists of that length
    UnpackMismatch = 20033,
    SwitchNoMatch = 20034,
    SwitchMultipleMatch = 20035,
    DivisionByZero = 20036,
    NegativeIndex = 20037,
    /// Used the result of something that produced no value
    VoidValue = 20038,
    UnsupportedOperation = 20039,
    AssertionFailed = 20040,
    KeyNotFound = 20041,
    /// Interpreter invariant broken
    InternalBug = 20042,

    // Type
    TypeMismatch = 30001,
    InvalidTypeForOp = 30002,
    CannotFormat = 30003,
    CannotIndex = 30004,
    CannotAssign = 30005,
    InvalidArgType = 30006,
    WrongArgCount = 30007,
    CannotCompare = 30008,
    CannotConvert = 30009,

    // Validation
    /// Scientific-notation literal bound to `int` is not whole
    ScientificNotationNotWholeNumber = 40001,
    /// Top-level `fn` shares a name with a script argument
    HoistedFunctionShadowsArgument = 40002,
    UnknownFunction = 40003,
}

impl ErrorCode {
    pub const fn is_syntax_error(self) -> bool {
        self.number() / 10_000 == 1
    }

    pub const fn is_runtime_error(self) -> bool {
        self.number() / 10_000 == 2
    }

    pub const fn is_type_error(self) -> bool {
        self.number() / 10_000 == 3
    }

    pub const fn is_validation_error(self) -> bool {
        self.number() / 10_000 == 4
    }

    /// Parse `RAD20028`, `rad20028`, or `20028`.
    pub fn parse(text: &str) -> Option<ErrorCode> {
        let trimmed = text.trim();
        let digits = trimmed
            .get(..3)
            .filter(|prefix| prefix.eq_ignore_ascii_case("rad"))
            .map_or(trimmed, |_| &trimmed[3..]);
        let number: u32 = digits.parse().ok()?;
        Self::ALL.iter().copied().find(|code| code.number() == number)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
