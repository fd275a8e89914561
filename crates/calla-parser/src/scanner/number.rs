//! Numeric literal scanning: four bases, leading-zero normalisation, floats
//! with exponents, and typed suffixes with range checks.

use calla_ast::token::{Token, TokenKind};
use calla_source::types::Location;

use super::{Scanner, rules};
use crate::diagnostics::DiagnosticCode;

/// The outcome of a suffix scan.
enum Suffix {
    /// No suffix follows the digits
    Absent,
    /// A suffix was consumed; this is the finished literal kind
    Token(TokenKind),
    /// A diagnostic was emitted; the literal produces no token
    Dropped,
}

impl Scanner<'_> {
    /// Scans a numeric literal; the cursor must sit on a decimal digit.
    ///
    /// Dispatches on the base prefix (`0x`, `0o`, `0b`) and normalises
    /// leading zeros: a run of zeros followed by no further digit collapses
    /// to the single digit `0`.
    pub(super) fn scan_number(&mut self) -> Option<Token> {
        if self.cursor.current() == b'0' {
            match self.cursor.peek(1) {
                Some(b'x') => {
                    self.cursor.jump(2);

                    return self.scan_radix(16);
                }
                Some(b'o') => {
                    self.cursor.jump(2);

                    return self.scan_radix(8);
                }
                Some(b'b') => {
                    self.cursor.jump(2);

                    return self.scan_radix(2);
                }
                _ => {}
            }
        }

        self.scan_dec()
    }

    /// Scans the digits of a hexadecimal, octal, or binary literal after its
    /// prefix, then an optional typed suffix.
    fn scan_radix(&mut self, base: u32) -> Option<Token> {
        let mut location_error = self.here();
        let is_digit: fn(u8) -> bool = match base {
            16 => rules::is_hex_digit,
            8 => rules::is_oct_digit,
            _ => rules::is_bin_digit,
        };

        let mut digits = String::new();

        // Leading-zero normalisation
        if self.cursor.current() == b'0' {
            while self.cursor.current() == b'0' {
                self.cursor.advance();
            }

            if !is_digit(self.cursor.current()) {
                digits.push('0');
            }
        }

        while is_digit(self.cursor.current()) {
            if self.cursor.current() != b'_' {
                digits.push(self.cursor.current() as char);
            }

            self.cursor.advance();
        }

        if digits.is_empty() {
            self.close_here(&mut location_error);

            let (code, example, detail) = match base {
                16 => (
                    DiagnosticCode::InvalidHexadecimalLiteral,
                    "e.g. 0xff, 0xFF",
                    "add a digit 0 to 9 or a letter a (A) to f (F)",
                ),
                8 => (DiagnosticCode::InvalidOctalLiteral, "e.g. 0o22, 0o56", "add a digit 0 to 7"),
                _ => {
                    (DiagnosticCode::InvalidBinLiteral, "e.g. 0b0101, 0b011011", "add a digit 0 to 1")
                }
            };

            let diagnostic =
                self.error(code, location_error).with_help(example).with_detail(detail);
            self.emit(diagnostic);

            return None;
        }

        self.close_here(&mut location_error);

        match self.scan_literal_suffix(&digits, base, true, location_error) {
            Suffix::Token(kind) => self.scanned(kind),
            Suffix::Dropped => None,
            Suffix::Absent => {
                let kind = match base {
                    16 => TokenKind::LiteralInt16(digits),
                    8 => TokenKind::LiteralInt8(digits),
                    _ => TokenKind::LiteralInt2(digits),
                };

                self.scanned(kind)
            }
        }
    }

    /// Scans a decimal integer or float literal, then an optional typed
    /// suffix.
    ///
    /// A `.` directly followed by another `.` never belongs to the literal:
    /// `1..2` is the integer `1`, the range operator, and the integer `2`.
    fn scan_dec(&mut self) -> Option<Token> {
        let mut location_error = self.here();
        let mut digits = String::new();
        let mut is_float = false;
        let mut is_scientific = false;

        // Leading-zero normalisation: keep one zero only when nothing
        // numeric follows
        if self.cursor.current() == b'0' {
            while self.cursor.current() == b'0' {
                self.cursor.advance();
            }

            match self.cursor.current() {
                b'1'..=b'9' => {}
                b'.' if self.cursor.peek(1) != Some(b'.') => digits.push('0'),
                b'e' | b'E' => digits.push('0'),
                _ => {
                    self.close_here(&mut location_error);

                    return match self.scan_literal_suffix("0", 10, true, location_error) {
                        Suffix::Token(kind) => self.scanned(kind),
                        Suffix::Dropped => None,
                        Suffix::Absent => self.scanned(TokenKind::LiteralInt10("0".to_string())),
                    };
                }
            }
        }

        loop {
            match self.cursor.current() {
                b'0'..=b'9' => {
                    digits.push(self.cursor.current() as char);
                    self.cursor.advance();
                }
                b'_' => self.cursor.advance(),
                b'.' if self.cursor.peek(1) == Some(b'.') => break,
                b'.' if is_float => {
                    let mut dot_error = self.here();
                    self.cursor.advance();
                    self.close_here(&mut dot_error);

                    let diagnostic = self
                        .error(DiagnosticCode::InvalidFloatLiteral, dot_error)
                        .with_detail("in a float literal it is forbidden to add more than one `.`");
                    self.emit(diagnostic);

                    return None;
                }
                b'.' => {
                    is_float = true;
                    digits.push('.');
                    self.cursor.advance();
                }
                b'e' | b'E' if is_scientific => {
                    let mut exponent_error = self.here();
                    self.cursor.advance();
                    self.close_here(&mut exponent_error);

                    let diagnostic =
                        self.error(DiagnosticCode::InvalidFloatLiteral, exponent_error).with_detail(
                            "in a float literal it is forbidden to add more than one `e` or `E`",
                        );
                    self.emit(diagnostic);

                    return None;
                }
                b'e' | b'E' => {
                    is_scientific = true;
                    digits.push(self.cursor.current() as char);
                    self.cursor.advance();

                    if matches!(self.cursor.current(), b'-' | b'+') {
                        digits.push(self.cursor.current() as char);
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }

        self.close_here(&mut location_error);

        let is_int = !(is_float || is_scientific);

        match self.scan_literal_suffix(&digits, 10, is_int, location_error) {
            Suffix::Token(kind) => self.scanned(kind),
            Suffix::Dropped => None,
            Suffix::Absent if is_int => self.scanned(TokenKind::LiteralInt10(digits)),
            Suffix::Absent => self.scanned(TokenKind::LiteralFloat(digits)),
        }
    }

    /// Scans an optional typed suffix after a digit sequence.
    ///
    /// Integer suffixes are range-checked in the literal's base; on overflow
    /// the matching out-of-range diagnostic is emitted, the suffix bytes are
    /// skipped, and the literal is dropped. Float suffixes apply without
    /// range checking. An unknown suffix beginning with `I`, `U`, or `F` —
    /// including any integer suffix on a float literal — drops the literal
    /// with `InvalidLiteralSuffix`.
    #[allow(clippy::too_many_lines)]
    fn scan_literal_suffix(
        &mut self,
        digits: &str,
        base: u32,
        is_int: bool,
        location_error: Location,
    ) -> Suffix {
        let c1 = self.cursor.current();
        let c2 = self.cursor.peek(1);
        let c3 = self.cursor.peek(2);

        match (c1, c2, c3) {
            (b'I', Some(b'8'), _) if is_int => match i8::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(2);

                    Suffix::Token(TokenKind::LiteralSuffixInt8(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Int8OutOfRange,
                    "the range of the Int8 type is between -128 and 127",
                    2,
                    location_error,
                ),
            },
            (b'I', Some(b'1'), Some(b'6')) if is_int => match i16::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(3);

                    Suffix::Token(TokenKind::LiteralSuffixInt16(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Int16OutOfRange,
                    "the range of the Int16 type is between -32_768 and 32_767",
                    3,
                    location_error,
                ),
            },
            (b'I', Some(b'3'), Some(b'2')) if is_int => match i32::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(3);

                    Suffix::Token(TokenKind::LiteralSuffixInt32(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Int32OutOfRange,
                    "the range of the Int32 type is between -2_147_483_648 and 2_147_483_647",
                    3,
                    location_error,
                ),
            },
            (b'I', Some(b'6'), Some(b'4')) if is_int => match i64::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(3);

                    Suffix::Token(TokenKind::LiteralSuffixInt64(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Int64OutOfRange,
                    "the range of the Int64 type is between -9_223_372_036_854_775_808 and 9_223_372_036_854_775_807",
                    3,
                    location_error,
                ),
            },
            (b'I', Some(b'z'), _) if is_int => match isize::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(2);

                    Suffix::Token(TokenKind::LiteralSuffixIsize(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::IsizeOutOfRange,
                    "the range of the Isize type is between -9_223_372_036_854_775_808 and 9_223_372_036_854_775_807",
                    2,
                    location_error,
                ),
            },
            (b'U', Some(b'8'), _) if is_int => match u8::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(2);

                    Suffix::Token(TokenKind::LiteralSuffixUint8(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Uint8OutOfRange,
                    "the range of the Uint8 type is between 0 and 255",
                    2,
                    location_error,
                ),
            },
            (b'U', Some(b'1'), Some(b'6')) if is_int => match u16::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(3);

                    Suffix::Token(TokenKind::LiteralSuffixUint16(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Uint16OutOfRange,
                    "the range of the Uint16 type is between 0 and 65_535",
                    3,
                    location_error,
                ),
            },
            (b'U', Some(b'3'), Some(b'2')) if is_int => match u32::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(3);

                    Suffix::Token(TokenKind::LiteralSuffixUint32(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Uint32OutOfRange,
                    "the range of the Uint32 type is between 0 and 4_294_967_295",
                    3,
                    location_error,
                ),
            },
            (b'U', Some(b'6'), Some(b'4')) if is_int => match u64::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(3);

                    Suffix::Token(TokenKind::LiteralSuffixUint64(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::Uint64OutOfRange,
                    "the range of the Uint64 type is between 0 and 18_446_744_073_709_551_615",
                    3,
                    location_error,
                ),
            },
            (b'U', Some(b'z'), _) if is_int => match usize::from_str_radix(digits, base) {
                Ok(value) => {
                    self.cursor.jump(2);

                    Suffix::Token(TokenKind::LiteralSuffixUsize(value))
                }
                Err(_) => self.out_of_range(
                    DiagnosticCode::UsizeOutOfRange,
                    "the range of the Usize type is between 0 and 18_446_744_073_709_551_615",
                    2,
                    location_error,
                ),
            },
            (b'F', Some(b'3'), Some(b'2')) => {
                // TODO: range-check float suffixes once the precision
                // guarantees are settled
                self.cursor.jump(3);

                Suffix::Token(TokenKind::LiteralSuffixFloat32(
                    digits.parse::<f32>().unwrap_or_default(),
                ))
            }
            (b'F', Some(b'6'), Some(b'4')) => {
                self.cursor.jump(3);

                Suffix::Token(TokenKind::LiteralSuffixFloat64(
                    digits.parse::<f64>().unwrap_or_default(),
                ))
            }
            (b'I' | b'U' | b'F', _, _) => {
                let mut diagnostic =
                    self.error(DiagnosticCode::InvalidLiteralSuffix, location_error).with_help(
                        "here is the valid literal suffix: I8, I16, I32, I64, U8, U16, U32, U64, \
                         F32, F64, Uz, Iz",
                    );

                if !is_int {
                    diagnostic = diagnostic
                        .with_note("it is not possible to use an integer suffix on a float literal");
                }

                self.emit(diagnostic);

                Suffix::Dropped
            }
            _ => Suffix::Absent,
        }
    }

    /// Emits an out-of-range diagnostic, skips the suffix bytes, and drops
    /// the literal.
    fn out_of_range(
        &mut self,
        code: DiagnosticCode,
        range_help: &str,
        suffix_length: usize,
        location_error: Location,
    ) -> Suffix {
        let diagnostic = self.error(code, location_error).with_help(range_help);
        self.emit(diagnostic);
        self.cursor.jump(suffix_length);

        Suffix::Dropped
    }
}
