//! Diagnostic codes, levels, and records.
//!
//! The scanner and preparser never build error *strings* inline; they emit a
//! [`Diagnostic`] carrying one of the flat [`DiagnosticCode`]s plus optional
//! help/notes/detail text. The code's message template is the single source
//! of truth for the user-facing wording.

use std::fmt;

use calla_source::types::{FileID, Location};
use thiserror::Error;

/// Represents the severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// An error that prevents successful compilation
    Error,
    /// A warning about potential issues; never fails the compilation
    Warning,
}

impl DiagnosticLevel {
    /// Returns a string representation of the diagnostic level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    /// Returns the ANSI color code for the level.
    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",   // Red
            Self::Warning => "\x1b[33m", // Yellow
        }
    }

    /// Returns the ANSI reset code.
    #[must_use]
    pub const fn reset_code() -> &'static str { "\x1b[0m" }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

/// The flat enumeration of every diagnostic the scanner and preparser emit.
///
/// Each variant carries its user-facing message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DiagnosticCode {
    // Scanner
    /// A byte that starts no token
    #[error("unexpected character")]
    UnexpectedCharacter,
    /// `'...` without a closing quote
    #[error("unclosed char literal")]
    UnclosedCharLiteral,
    /// `"...` without a closing quote
    #[error("unclosed string literal")]
    UnclosedStringLiteral,
    /// `/* ...` without a closing `*/`
    #[error("unclosed comment block")]
    UnclosedCommentBlock,
    /// A `\` escape outside the supported set
    #[error("invalid escape")]
    InvalidEscape,
    /// `0x` with no hexadecimal digit
    #[error("invalid hexadecimal literal")]
    InvalidHexadecimalLiteral,
    /// `0o` with no octal digit
    #[error("invalid octal literal")]
    InvalidOctalLiteral,
    /// `0b` with no binary digit
    #[error("invalid binary literal")]
    InvalidBinLiteral,
    /// Two decimal points or two exponent markers
    #[error("invalid float literal")]
    InvalidFloatLiteral,
    /// A suffix outside the supported set, or an integer suffix on a float
    #[error("invalid literal suffix")]
    InvalidLiteralSuffix,
    /// An `I8`-suffixed literal outside the `Int8` range
    #[error("Int8 literal out of range")]
    Int8OutOfRange,
    /// An `I16`-suffixed literal outside the `Int16` range
    #[error("Int16 literal out of range")]
    Int16OutOfRange,
    /// An `I32`-suffixed literal outside the `Int32` range
    #[error("Int32 literal out of range")]
    Int32OutOfRange,
    /// An `I64`-suffixed literal outside the `Int64` range
    #[error("Int64 literal out of range")]
    Int64OutOfRange,
    /// A `U8`-suffixed literal outside the `Uint8` range
    #[error("Uint8 literal out of range")]
    Uint8OutOfRange,
    /// A `U16`-suffixed literal outside the `Uint16` range
    #[error("Uint16 literal out of range")]
    Uint16OutOfRange,
    /// A `U32`-suffixed literal outside the `Uint32` range
    #[error("Uint32 literal out of range")]
    Uint32OutOfRange,
    /// A `U64`-suffixed literal outside the `Uint64` range
    #[error("Uint64 literal out of range")]
    Uint64OutOfRange,
    /// An `Iz`-suffixed literal outside the `Isize` range
    #[error("Isize literal out of range")]
    IsizeOutOfRange,
    /// A `Uz`-suffixed literal outside the `Usize` range
    #[error("Usize literal out of range")]
    UsizeOutOfRange,
    /// An opening delimiter without its closer, or a stray closer
    #[error("mismatched closing delimiter")]
    MismatchedClosingDelimiter,

    // Preparser
    /// An identifier was required
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// `import` without its path string
    #[error("expected import value")]
    ExpectedImportValue,
    /// `module` without its name
    #[error("expected module identifier")]
    ExpectedModuleIdentifier,
    /// A data type was required
    #[error("expected data type")]
    ExpectedDataType,
    /// An expression was required
    #[error("expected expression")]
    ExpectedExpression,
    /// A specific token was required
    #[error("expected token")]
    ExpectedToken,
    /// `fun` without its name
    #[error("expected function identifier")]
    ExpectedFunIdentifier,
    /// A token that no top-level construct can start with
    #[error("unexpected token")]
    UnexpectedToken,
    /// A token that no function-body item can start with
    #[error("unexpected token in function body")]
    UnexpectedTokenInFunctionBody,
    /// End of file inside an open construct
    #[error("end of file not expected")]
    EofNotExpected,
    /// A second package name in one declaration
    #[error("package name is already defined")]
    PackageNameAlreadyDefined,
    /// A second package declaration in one file
    #[error("duplicate package declaration")]
    DuplicatePackageDeclaration,
    /// A macro with an empty body
    #[error("macro does nothing")]
    MacroDoNothing,
    /// A second `impl` clause on one object
    #[error("impl is already defined")]
    ImplIsAlreadyDefined,
    /// A second `inherit` clause on one object
    #[error("inherit is already defined")]
    InheritIsAlreadyDefined,
    /// An `impl` clause on an object kind that rejects it
    #[error("impl is not expected")]
    ImplIsNotExpected,
    /// An `inherit` clause on an object kind that rejects it
    #[error("inherit is not expected")]
    InheritIsNotExpected,
    /// A `close` modifier on an object kind that rejects it
    #[error("unexpected close")]
    UnexpectedClose,
    /// An object kind other than class/trait/record/enum
    #[error("bad kind of object")]
    BadKindOfObject,
    /// A type kind other than alias/enum/record
    #[error("bad kind of type")]
    BadKindOfType,
    /// A second `get` flag on one attribute
    #[error("get is duplicate")]
    GetIsDuplicate,
    /// A second `set` flag on one attribute
    #[error("set is duplicate")]
    SetIsDuplicate,
    /// A multiple constant with fewer expressions than names
    #[error("miss one or many expressions")]
    MissOneOrManyExpressions,
    /// A multiple constant with fewer names than expressions
    #[error("miss one or many identifiers")]
    MissOneOrManyIdentifiers,
    /// A `lib` from-string other than C/CC/CPP
    #[error("unknown `from` value in lib")]
    UnknownFromValueInLib,

    // Warnings
    /// A semicolon after a construct that already terminates itself
    #[error("unused semicolon")]
    UnusedSemicolon,
}

impl DiagnosticCode {
    /// Returns the stable kebab-case name of this code, used as the bracketed
    /// code in rendered diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter => "unexpected-character",
            Self::UnclosedCharLiteral => "unclosed-char-literal",
            Self::UnclosedStringLiteral => "unclosed-string-literal",
            Self::UnclosedCommentBlock => "unclosed-comment-block",
            Self::InvalidEscape => "invalid-escape",
            Self::InvalidHexadecimalLiteral => "invalid-hexadecimal-literal",
            Self::InvalidOctalLiteral => "invalid-octal-literal",
            Self::InvalidBinLiteral => "invalid-bin-literal",
            Self::InvalidFloatLiteral => "invalid-float-literal",
            Self::InvalidLiteralSuffix => "invalid-literal-suffix",
            Self::Int8OutOfRange => "int8-out-of-range",
            Self::Int16OutOfRange => "int16-out-of-range",
            Self::Int32OutOfRange => "int32-out-of-range",
            Self::Int64OutOfRange => "int64-out-of-range",
            Self::Uint8OutOfRange => "uint8-out-of-range",
            Self::Uint16OutOfRange => "uint16-out-of-range",
            Self::Uint32OutOfRange => "uint32-out-of-range",
            Self::Uint64OutOfRange => "uint64-out-of-range",
            Self::IsizeOutOfRange => "isize-out-of-range",
            Self::UsizeOutOfRange => "usize-out-of-range",
            Self::MismatchedClosingDelimiter => "mismatched-closing-delimiter",
            Self::ExpectedIdentifier => "expected-identifier",
            Self::ExpectedImportValue => "expected-import-value",
            Self::ExpectedModuleIdentifier => "expected-module-identifier",
            Self::ExpectedDataType => "expected-data-type",
            Self::ExpectedExpression => "expected-expression",
            Self::ExpectedToken => "expected-token",
            Self::ExpectedFunIdentifier => "expected-fun-identifier",
            Self::UnexpectedToken => "unexpected-token",
            Self::UnexpectedTokenInFunctionBody => "unexpected-token-in-function-body",
            Self::EofNotExpected => "eof-not-expected",
            Self::PackageNameAlreadyDefined => "package-name-already-defined",
            Self::DuplicatePackageDeclaration => "duplicate-package-declaration",
            Self::MacroDoNothing => "macro-do-nothing",
            Self::ImplIsAlreadyDefined => "impl-is-already-defined",
            Self::InheritIsAlreadyDefined => "inherit-is-already-defined",
            Self::ImplIsNotExpected => "impl-is-not-expected",
            Self::InheritIsNotExpected => "inherit-is-not-expected",
            Self::UnexpectedClose => "unexpected-close",
            Self::BadKindOfObject => "bad-kind-of-object",
            Self::BadKindOfType => "bad-kind-of-type",
            Self::GetIsDuplicate => "get-is-duplicate",
            Self::SetIsDuplicate => "set-is-duplicate",
            Self::MissOneOrManyExpressions => "miss-one-or-many-expressions",
            Self::MissOneOrManyIdentifiers => "miss-one-or-many-identifiers",
            Self::UnknownFromValueInLib => "unknown-from-value-in-lib",
            Self::UnusedSemicolon => "unused-semicolon",
        }
    }
}

/// A diagnostic record with source location information.
///
/// Diagnostics are built where the problem is detected and handed to the
/// [`super::DiagnosticReporter`]; the optional `help`, `notes`, and `detail`
/// fields refine the code's message template without changing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity level of this diagnostic
    pub level: DiagnosticLevel,
    /// The code identifying the issue
    pub code: DiagnosticCode,
    /// The file the issue was found in
    pub file: FileID,
    /// Source location of the issue
    pub location: Location,
    /// Help lines (actionable advice)
    pub help: Vec<String>,
    /// Additional explanatory notes
    pub notes: Vec<String>,
    /// A short detail attached to the primary message
    pub detail: Option<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub const fn error(code: DiagnosticCode, file: FileID, location: Location) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code,
            file,
            location,
            help: Vec::new(),
            notes: Vec::new(),
            detail: None,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub const fn warning(code: DiagnosticCode, file: FileID, location: Location) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code,
            file,
            location,
            help: Vec::new(),
            notes: Vec::new(),
            detail: None,
        }
    }

    /// Adds a help line to this diagnostic.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Adds an explanatory note to this diagnostic.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attaches a detail to the primary message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.level, self.code.as_str(), self.code)?;

        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }

        write!(f, " at {}", self.location)?;

        for help in &self.help {
            write!(f, "\n  help: {help}")?;
        }

        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use calla_source::types::Position;

    use super::*;

    #[test]
    fn test_warning_level_orders_after_error() {
        assert!(DiagnosticLevel::Error < DiagnosticLevel::Warning);
    }

    #[test]
    fn test_display_carries_code_and_detail() {
        let location =
            Location::new(Position::new(1, 1, 0), Position::new(1, 2, 1), FileID::new(1));
        let diagnostic = Diagnostic::error(DiagnosticCode::InvalidEscape, FileID::new(1), location)
            .with_detail("unknown escape `\\q`");
        let rendered = diagnostic.to_string();

        assert!(rendered.starts_with("error[invalid-escape]: invalid escape"));
        assert!(rendered.contains("unknown escape"));
    }
}
