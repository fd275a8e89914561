//! # Scanner module for the Calla programming language.
//!
//! The scanner is hand-written and byte-oriented. It turns the bytes of one
//! source file into a flat token vector and guarantees, even for erroneous
//! input, that bracket groups are recursively balanced: every `(`, `[`, `{`
//! token is followed, at the same nesting depth, by its matching closer
//! before any other closer. Later stages exploit this to treat any bracketed
//! span as a single cursor jump.
//!
//! The scanner handles:
//! - Maximal-munch operator recognition
//! - Identifiers, keywords, and the joined `not=` / `xor=` forms
//! - Char, string, and bit literals with escape translation
//! - Numeric literals in four bases, with typed suffixes and range checks
//! - Line, block, and documentation comments
//! - Error recovery: after every diagnostic the scanner advances past the
//!   offending construct and keeps scanning until end of file

mod cursor;
mod number;
mod rules;

use calla_ast::token::{Token, TokenKind};
use calla_source::types::{FileID, Location, Position, SourceFile};
pub use cursor::Cursor;
pub use rules::{is_id_continue, is_id_start, is_whitespace, keyword};

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticReporter};

/// The hand-written scanner over one source file.
///
/// A scanner is single-use: [`Scanner::run`] consumes it and returns the
/// token vector, always terminated by exactly one [`TokenKind::Eof`] token.
/// Diagnostics go to the shared reporter; the scanner itself never aborts
/// before end of file.
#[derive(Debug)]
pub struct Scanner<'a> {
    /// File identifier, attached to every location
    file_id: FileID,
    /// The cursor over the file's bytes
    cursor: Cursor<'a>,
    /// File name, used by the dump listing
    file_name: &'a str,
    /// The location being built for the current token
    location: Location,
    /// The output token vector
    tokens: Vec<Token>,
    /// The shared diagnostic sink
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner over the given file.
    #[must_use]
    pub fn new(
        file_id: FileID,
        file: &'a SourceFile,
        reporter: &'a mut DiagnosticReporter,
    ) -> Self {
        Self {
            file_id,
            cursor: Cursor::new(file.bytes()),
            file_name: &file.name,
            location: Location::open(file_id),
            tokens: Vec::new(),
            reporter,
        }
    }

    /// Consumes all bytes and returns the token vector.
    ///
    /// The vector always ends with exactly one `Eof` token. When `dump` is
    /// set, a token listing is printed after scanning.
    #[must_use]
    pub fn run(mut self, dump: bool) -> Vec<Token> {
        while !self.cursor.is_at_end() {
            self.skip_whitespace();

            if self.cursor.is_at_end() {
                break;
            }

            if let Some(token) = self.scan_token() {
                self.push_token(token);
            }
        }

        // Close the trailing sentinel on the final cursor position
        self.start_token();
        self.close_token();
        self.tokens.push(Token::new(TokenKind::Eof, self.location));

        if dump {
            #[allow(clippy::print_stdout)]
            {
                println!("====Scanner({})====", self.file_name);

                for token in &self.tokens {
                    println!("{token}");
                }
            }
        }

        self.tokens
    }

    // ------------------------------------------------------------------
    // Token vector and location bookkeeping
    // ------------------------------------------------------------------

    /// Pushes a token unless it is a discarded comment form.
    fn push_token(&mut self, token: Token) {
        #[cfg(feature = "comment-debug")]
        if matches!(token.kind, TokenKind::CommentDebug(_)) {
            return;
        }

        match token.kind {
            TokenKind::CommentLine | TokenKind::CommentBlock => {}
            _ => self.tokens.push(token),
        }
    }

    /// Pins the working location's start on the cursor.
    fn start_token(&mut self) {
        self.location.start_at(self.cursor.line(), self.cursor.column(), self.cursor.position());
    }

    /// Closes the working location on the cursor (exclusive end).
    fn close_token(&mut self) {
        self.location.end_at(self.cursor.line(), self.cursor.column(), self.cursor.position());
    }

    /// Returns an open location pinned at the cursor, for error reporting.
    fn here(&self) -> Location {
        let position = Position::new(self.cursor.line(), self.cursor.column(), self.cursor.position());

        Location::new(position, position, self.file_id)
    }

    /// Closes an error location on the cursor.
    fn close_here(&self, location: &mut Location) {
        location.end_at(self.cursor.line(), self.cursor.column(), self.cursor.position());
    }

    /// Consumes `length` bytes and returns an operator or keyword token.
    fn fixed(&mut self, kind: TokenKind, length: usize) -> Option<Token> {
        self.cursor.jump(length);
        self.close_token();

        Some(Token::new(kind, self.location))
    }

    /// Closes the working location and returns a token whose bytes have
    /// already been consumed.
    fn scanned(&mut self, kind: TokenKind) -> Option<Token> {
        self.close_token();

        Some(Token::new(kind, self.location))
    }

    /// Builds an error diagnostic for this file.
    const fn error(&self, code: DiagnosticCode, location: Location) -> Diagnostic {
        Diagnostic::error(code, self.file_id, location)
    }

    /// Emits a diagnostic to the shared sink.
    fn emit(&mut self, diagnostic: Diagnostic) { self.reporter.emit(diagnostic); }

    // ------------------------------------------------------------------
    // Whitespace and comments
    // ------------------------------------------------------------------

    /// Skips inter-token whitespace.
    fn skip_whitespace(&mut self) {
        while !self.cursor.is_at_end() && is_whitespace(self.cursor.current()) {
            self.cursor.advance();
        }
    }

    /// Skips a line comment up to (not including) the newline.
    fn skip_comment_line(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current() != b'\n' {
            self.cursor.advance();
        }
    }

    /// Skips a block comment, `/*` already consumed. Block comments do not
    /// nest.
    fn skip_comment_block(&mut self) {
        let mut location_error = self.here();

        loop {
            if self.cursor.is_at_end() {
                self.close_here(&mut location_error);
                let diagnostic = self
                    .error(DiagnosticCode::UnclosedCommentBlock, location_error)
                    .with_help("close comment multi line with `*/`");
                self.emit(diagnostic);

                return;
            }

            if self.cursor.current() == b'*' && self.cursor.peek(1) == Some(b'/') {
                self.cursor.jump(2);

                return;
            }

            self.cursor.advance();
        }
    }

    /// Scans documentation text up to (not including) the newline.
    fn scan_comment_text(&mut self) -> String {
        let mut text = String::new();

        while !self.cursor.is_at_end() && self.cursor.current() != b'\n' {
            text.push(self.cursor.current() as char);
            self.cursor.advance();
        }

        text
    }

    // ------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------

    /// Scans an identifier lexeme; the cursor must sit on an identifier
    /// start.
    fn scan_identifier(&mut self) -> String {
        let mut lexeme = String::new();

        while rules::is_id_continue(self.cursor.current()) {
            lexeme.push(self.cursor.current() as char);
            self.cursor.advance();
        }

        lexeme
    }

    /// Scans a backtick-delimited string-form identifier, preserved verbatim.
    fn scan_string_identifier(&mut self) -> Option<String> {
        let mut location_error = self.here();
        self.cursor.advance(); // opening backtick

        let mut lexeme = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.close_here(&mut location_error);
                let diagnostic = self
                    .error(DiagnosticCode::ExpectedIdentifier, location_error)
                    .with_detail("unclosed string-form identifier, add a closing backtick");
                self.emit(diagnostic);

                return None;
            }

            if self.cursor.current() == b'`' {
                self.cursor.advance();

                return Some(lexeme);
            }

            lexeme.push(self.cursor.current() as char);
            self.cursor.advance();
        }
    }

    // ------------------------------------------------------------------
    // Char and string literals
    // ------------------------------------------------------------------

    /// Scans one character unit: a plain byte or a backslash escape,
    /// translated to its character value.
    fn scan_character(&mut self) -> Option<char> {
        if self.cursor.current() != b'\\' {
            let character = self.cursor.current() as char;
            self.cursor.advance();

            return Some(character);
        }

        let mut location_error = self.here();
        self.cursor.advance(); // backslash

        let escaped = match self.cursor.current() {
            b'n' => '\n',
            b't' => '\t',
            b'r' => '\r',
            b'b' => '\u{0008}',
            b'\\' => '\\',
            b'\'' => '\'',
            b'"' => '"',
            other => {
                self.close_here(&mut location_error);

                if self.cursor.is_at_end() {
                    let diagnostic =
                        self.error(DiagnosticCode::UnclosedCharLiteral, location_error);
                    self.emit(diagnostic);
                } else {
                    let diagnostic = self
                        .error(DiagnosticCode::InvalidEscape, location_error)
                        .with_detail(format!("unknown escape `\\{}`", other as char));
                    self.emit(diagnostic);
                    self.cursor.advance();
                }

                return None;
            }
        };

        self.cursor.advance();

        Some(escaped)
    }

    /// Scans a char literal; the cursor must sit on the opening quote.
    fn scan_char_literal(&mut self) -> Option<char> {
        let mut location_error = self.here();
        self.cursor.advance(); // opening quote

        if self.cursor.current() == b'\'' {
            self.cursor.advance();
            self.close_here(&mut location_error);
            let diagnostic = self
                .error(DiagnosticCode::UnclosedCharLiteral, location_error)
                .with_help("please close this char literal with `'`")
                .with_detail("unexpected token here: `'`");
            self.emit(diagnostic);

            return None;
        }

        if self.cursor.is_at_end() {
            self.close_here(&mut location_error);
            let diagnostic = self.error(DiagnosticCode::UnclosedCharLiteral, location_error);
            self.emit(diagnostic);

            return None;
        }

        let character = self.scan_character()?;

        if self.cursor.current() != b'\'' {
            self.close_here(&mut location_error);
            let diagnostic = self
                .error(DiagnosticCode::UnclosedCharLiteral, location_error)
                .with_help("please close this char literal with `'`");
            self.emit(diagnostic);

            return None;
        }

        self.cursor.advance(); // closing quote

        Some(character)
    }

    /// Scans a string literal; the cursor must sit on the opening quote.
    fn scan_string_literal(&mut self) -> Option<String> {
        let mut location_error = self.here();
        self.cursor.advance(); // opening quote

        let mut text = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.close_here(&mut location_error);
                let diagnostic = self
                    .error(DiagnosticCode::UnclosedStringLiteral, location_error)
                    .with_help("add `\"` to the end of string literal");
                self.emit(diagnostic);

                return None;
            }

            if self.cursor.current() == b'"' {
                self.cursor.advance();

                return Some(text);
            }

            text.push(self.scan_character()?);
        }
    }

    // ------------------------------------------------------------------
    // Bracket balancing
    // ------------------------------------------------------------------

    /// Scans and pushes tokens until the matching closer is found, then
    /// returns the closing token.
    ///
    /// The opening token has already been pushed. Nested groups are handled
    /// by recursion through [`Scanner::scan_token`], which guarantees that
    /// after scanning, every opening delimiter is followed at the same depth
    /// by its own closer before any other closer.
    fn scan_closing(&mut self, target: u8) -> Option<Token> {
        let location_error = self.location;

        loop {
            self.skip_whitespace();

            if self.cursor.is_at_end() {
                let diagnostic = self
                    .error(DiagnosticCode::MismatchedClosingDelimiter, location_error)
                    .with_detail(
                        "expected closing delimiter after this token, such as `)`, `}` or `]`",
                    );
                self.emit(diagnostic);

                return None;
            }

            if self.cursor.current() == target {
                break;
            }

            if let Some(token) = self.scan_token() {
                self.push_token(token);
            }
        }

        self.start_token();
        self.cursor.advance();
        self.close_token();

        let kind = match target {
            b')' => TokenKind::RParen,
            b']' => TokenKind::RHook,
            _ => TokenKind::RBrace,
        };

        Some(Token::new(kind, self.location))
    }

    // ------------------------------------------------------------------
    // Token dispatch
    // ------------------------------------------------------------------

    /// Scans one token starting at the cursor.
    ///
    /// Returns `None` when the construct was erroneous; a diagnostic has been
    /// emitted and the cursor has advanced past the problem.
    #[allow(clippy::too_many_lines)]
    fn scan_token(&mut self) -> Option<Token> {
        let c1 = self.cursor.peek(1);
        let c2 = self.cursor.peek(2);

        self.start_token();

        match self.cursor.current() {
            // &= &
            b'&' if c1 == Some(b'=') => self.fixed(TokenKind::AmpersandEq, 2),
            b'&' => self.fixed(TokenKind::Ampersand, 1),

            // @
            b'@' => self.fixed(TokenKind::At, 1),

            // \
            b'\\' => self.fixed(TokenKind::Backslash, 1),

            // !
            b'!' => self.fixed(TokenKind::Bang, 1),

            // |= |> |
            b'|' if c1 == Some(b'=') => self.fixed(TokenKind::BarEq, 2),
            b'|' if c1 == Some(b'>') => self.fixed(TokenKind::BarRShift, 2),
            b'|' => self.fixed(TokenKind::Bar, 1),

            // :: := :> :
            b':' if c1 == Some(b':') => self.fixed(TokenKind::ColonColon, 2),
            b':' if c1 == Some(b'=') => self.fixed(TokenKind::ColonEq, 2),
            b':' if c1 == Some(b'>') => self.fixed(TokenKind::ColonRShift, 2),
            b':' => self.fixed(TokenKind::Colon, 1),

            // ,
            b',' => self.fixed(TokenKind::Comma, 1),

            // $<id> $
            b'$' if c1.is_some_and(rules::is_id_start) => {
                self.cursor.advance(); // dollar sign
                let name = self.scan_identifier();

                self.scanned(TokenKind::IdentifierDollar(name))
            }
            b'$' => self.fixed(TokenKind::Dollar, 1),

            // ... .. .? .* .
            b'.' if c1 == Some(b'.') && c2 == Some(b'.') => self.fixed(TokenKind::DotDotDot, 3),
            b'.' if c1 == Some(b'.') => self.fixed(TokenKind::DotDot, 2),
            b'.' if c1 == Some(b'?') => self.fixed(TokenKind::DotInterrogation, 2),
            b'.' if c1 == Some(b'*') => self.fixed(TokenKind::DotStar, 2),
            b'.' => self.fixed(TokenKind::Dot, 1),

            // == => =
            b'=' if c1 == Some(b'=') => self.fixed(TokenKind::EqEq, 2),
            b'=' if c1 == Some(b'>') => self.fixed(TokenKind::FatArrow, 2),
            b'=' => self.fixed(TokenKind::Eq, 1),

            // #
            b'#' => self.fixed(TokenKind::Hashtag, 1),

            // ^= ^
            b'^' if c1 == Some(b'=') => self.fixed(TokenKind::HatEq, 2),
            b'^' => self.fixed(TokenKind::Hat, 1),

            // ?
            b'?' => self.fixed(TokenKind::Interrogation, 1),

            // Opening delimiters: push the opener, then recursively scan up
            // to and including the matching closer
            b'{' | b'[' | b'(' => {
                let (open, target) = match self.cursor.current() {
                    b'{' => (TokenKind::LBrace, b'}'),
                    b'[' => (TokenKind::LHook, b']'),
                    _ => (TokenKind::LParen, b')'),
                };

                let token = self.fixed(open, 1)?;
                self.push_token(token);

                self.scan_closing(target)
            }

            // A closer here was not opened at this depth
            b'}' | b']' | b')' => {
                let stray = self.cursor.current() as char;
                let mut location_error = self.here();

                self.cursor.advance();
                self.close_here(&mut location_error);

                let diagnostic = self
                    .error(DiagnosticCode::MismatchedClosingDelimiter, location_error)
                    .with_help(format!("remove this `{stray}`"));
                self.emit(diagnostic);

                None
            }

            // <<= << <= <- <
            b'<' if c1 == Some(b'<') && c2 == Some(b'=') => {
                self.fixed(TokenKind::LShiftLShiftEq, 3)
            }
            b'<' if c1 == Some(b'<') => self.fixed(TokenKind::LShiftLShift, 2),
            b'<' if c1 == Some(b'=') => self.fixed(TokenKind::LShiftEq, 2),
            b'<' if c1 == Some(b'-') => self.fixed(TokenKind::InverseArrow, 2),
            b'<' => self.fixed(TokenKind::LShift, 1),

            // --= -= -- -> -
            b'-' if c1 == Some(b'-') && c2 == Some(b'=') => self.fixed(TokenKind::MinusMinusEq, 3),
            b'-' if c1 == Some(b'=') => self.fixed(TokenKind::MinusEq, 2),
            b'-' if c1 == Some(b'-') => self.fixed(TokenKind::MinusMinus, 2),
            b'-' if c1 == Some(b'>') => self.fixed(TokenKind::Arrow, 2),
            b'-' => self.fixed(TokenKind::Minus, 1),

            // %= %
            b'%' if c1 == Some(b'=') => self.fixed(TokenKind::PercentageEq, 2),
            b'%' => self.fixed(TokenKind::Percentage, 1),

            // ++= += ++ +
            b'+' if c1 == Some(b'+') && c2 == Some(b'=') => self.fixed(TokenKind::PlusPlusEq, 3),
            b'+' if c1 == Some(b'=') => self.fixed(TokenKind::PlusEq, 2),
            b'+' if c1 == Some(b'+') => self.fixed(TokenKind::PlusPlus, 2),
            b'+' => self.fixed(TokenKind::Plus, 1),

            // >>= >> >= >
            b'>' if c1 == Some(b'>') && c2 == Some(b'=') => {
                self.fixed(TokenKind::RShiftRShiftEq, 3)
            }
            b'>' if c1 == Some(b'>') => self.fixed(TokenKind::RShiftRShift, 2),
            b'>' if c1 == Some(b'=') => self.fixed(TokenKind::RShiftEq, 2),
            b'>' => self.fixed(TokenKind::RShift, 1),

            // ;
            b';' => self.fixed(TokenKind::Semicolon, 1),

            // /// <comment doc> /= /* <comment block> // <comment line> /
            b'/' => self.scan_slash(c1, c2),

            // **= ** *= *
            b'*' if c1 == Some(b'*') && c2 == Some(b'=') => self.fixed(TokenKind::StarStarEq, 3),
            b'*' if c1 == Some(b'*') => self.fixed(TokenKind::StarStar, 2),
            b'*' if c1 == Some(b'=') => self.fixed(TokenKind::StarEq, 2),
            b'*' => self.fixed(TokenKind::Star, 1),

            // ~= ~
            b'~' if c1 == Some(b'=') => self.fixed(TokenKind::WaveEq, 2),
            b'~' => self.fixed(TokenKind::Wave, 1),

            // char literal
            b'\'' => {
                let character = self.scan_char_literal()?;

                self.scanned(TokenKind::LiteralChar(character))
            }

            // string literal
            b'"' => {
                let text = self.scan_string_literal()?;

                self.scanned(TokenKind::LiteralString(text))
            }

            // string-form identifier
            b'`' => {
                let name = self.scan_string_identifier()?;

                self.scanned(TokenKind::IdentifierString(name))
            }

            // number
            b'0'..=b'9' => self.scan_number(),

            // bit char literal, bit string literal, <id>, not= xor=, <keyword>
            byte if rules::is_id_start(byte) => {
                if byte == b'b' && c1 == Some(b'\'') {
                    self.cursor.advance(); // bit marker
                    let character = self.scan_char_literal()?;

                    return self.scanned(TokenKind::LiteralBitChar(character as u8));
                }

                if byte == b'b' && c1 == Some(b'"') {
                    self.cursor.advance(); // bit marker
                    let text = self.scan_string_literal()?;

                    return self.scanned(TokenKind::LiteralBitString(text));
                }

                let lexeme = self.scan_identifier();

                match rules::keyword(&lexeme) {
                    Option::None => self.scanned(TokenKind::Identifier(lexeme)),
                    Some(TokenKind::Not) if self.cursor.current() == b'=' => {
                        self.cursor.advance();

                        self.scanned(TokenKind::NotEq)
                    }
                    Some(TokenKind::Xor) if self.cursor.current() == b'=' => {
                        self.cursor.advance();

                        self.scanned(TokenKind::HatEq)
                    }
                    Some(kind) => self.scanned(kind),
                }
            }

            // anything else starts no token
            other => {
                let mut location_error = self.here();

                self.cursor.advance();
                self.close_here(&mut location_error);

                let diagnostic = self
                    .error(DiagnosticCode::UnexpectedCharacter, location_error)
                    .with_help(format!("remove this character `{}`", other as char));
                self.emit(diagnostic);

                None
            }
        }
    }

    /// Scans the `/` family: doc comments, debug comments (feature-gated),
    /// `/=`, block comments, line comments, and the bare slash.
    fn scan_slash(&mut self, c1: Option<u8>, c2: Option<u8>) -> Option<Token> {
        #[cfg(feature = "comment-debug")]
        if c1 == Some(b'-') && c2 == Some(b'-') {
            self.cursor.jump(3);
            let text = self.scan_comment_text();

            return self.scanned(TokenKind::CommentDebug(text));
        }

        if c1 == Some(b'/') && c2 == Some(b'/') {
            self.cursor.jump(3);
            let text = self.scan_comment_text();

            return self.scanned(TokenKind::CommentDoc(text));
        }

        if c1 == Some(b'=') {
            return self.fixed(TokenKind::SlashEq, 2);
        }

        if c1 == Some(b'*') {
            self.cursor.jump(2);
            self.skip_comment_block();

            return self.scanned(TokenKind::CommentBlock);
        }

        if c1 == Some(b'/') {
            self.skip_comment_line();

            return self.scanned(TokenKind::CommentLine);
        }

        self.fixed(TokenKind::Slash, 1)
    }
}
