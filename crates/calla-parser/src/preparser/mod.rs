//! # Preparser module for the Calla programming language.
//!
//! The preparser consumes the scanner's token vector and classifies each
//! top-level construct, building a [`PreparseInfo`]: imports and macros split
//! by visibility, at most one package declaration, and the ordered
//! declaration skeletons. Nested expressions are captured verbatim as token
//! slices; no expression is parsed here.
//!
//! The preparser relies on the scanner's bracket guarantee: every opening
//! delimiter is followed, at the same depth, by its matching closer. Any
//! bracketed span can therefore be absorbed with a simple depth counter and
//! never re-balanced.
//!
//! Error discipline: a routine that cannot build its construct emits a
//! diagnostic, skips to the next plausible block start with
//! [`Preparser::go_to_next_block`], and returns `None`. The top-level
//! dispatch never gives up before the end-of-file token.

mod body;
mod decl;
mod fun;
mod library;
mod object;
mod types;

use calla_ast::info::PreparseInfo;
use calla_ast::nodes::{Decl, TokenSlice, Visibility};
use calla_ast::token::{Token, TokenKind};
use calla_source::types::{FileID, Location};

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticReporter};

/// A predicate over the current token kind, used to parameterise
/// block-preparsing routines by their closing condition.
pub(crate) type ClosePredicate = fn(&TokenKind) -> bool;

/// Configuration threaded into a [`Preparser`].
#[derive(Debug, Default, Clone)]
pub struct PreparseOptions {
    /// Prefix for sub-package global names
    pub default_package_access: Option<String>,
    /// Print the recognised declarations after preparsing
    pub dump: bool,
}

/// The preparser over one file's token vector.
///
/// The declaration visibility and the two working locations are *ambient*
/// values tied to the recursion: routines that recurse into nested
/// declarations snapshot and restore them, so nothing leaks back to the
/// parent construct.
#[derive(Debug)]
pub struct Preparser<'a, 't> {
    /// File identifier, used for diagnostics
    file_id: FileID,
    /// The scanner's token vector; always terminated by `Eof`
    tokens: &'t [Token],
    /// Current position in the token vector
    position: usize,
    /// The output being built
    info: PreparseInfo<'t>,
    /// Ambient visibility for the next declaration
    pub(crate) visibility: Visibility,
    /// Configuration
    options: PreparseOptions,
    /// The shared diagnostic sink
    reporter: &'a mut DiagnosticReporter,
}

impl<'a, 't> Preparser<'a, 't> {
    /// Creates a new preparser over the given token vector.
    ///
    /// The vector must be a scanner output: non-empty, with a trailing
    /// [`TokenKind::Eof`] token.
    #[must_use]
    pub fn new(
        file_id: FileID,
        tokens: &'t [Token],
        options: PreparseOptions,
        reporter: &'a mut DiagnosticReporter,
    ) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|token| token.kind.is_eof()),
            "the token vector must end with an Eof token"
        );

        Self {
            file_id,
            tokens,
            position: 0,
            info: PreparseInfo::new(),
            visibility: Visibility::Private,
            options,
            reporter,
        }
    }

    /// Walks the whole token vector and returns the preparse result.
    #[must_use]
    pub fn run(mut self) -> PreparseInfo<'t> {
        if self.tokens.is_empty() {
            return self.info;
        }

        while !self.current_kind().is_eof() {
            self.visibility = Visibility::Private;

            if let Some(decl) = self.preparse_next() {
                self.info.decls.push(decl);
            }
        }

        if self.options.dump {
            #[allow(clippy::print_stdout)]
            {
                println!("====Preparser({})====", self.file_id);

                for decl in &self.info.decls {
                    println!("{decl:?}");
                }
            }
        }

        self.info
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// Returns the token under the cursor; the trailing `Eof` is sticky.
    pub(crate) fn current(&self) -> &'t Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the token under the cursor.
    pub(crate) fn current_kind(&self) -> &'t TokenKind { &self.current().kind }

    /// Returns the token `n` positions ahead, clamped to the trailing `Eof`.
    pub(crate) fn peek(&self, n: usize) -> &'t Token {
        &self.tokens[(self.position + n).min(self.tokens.len() - 1)]
    }

    /// Advances one token; never moves past the trailing `Eof`.
    pub(crate) fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        } else {
            self.position = self.tokens.len() - 1;
        }
    }

    /// Advances `n` tokens.
    pub(crate) fn jump(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Checks the current token against a kind, ignoring payloads.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool { self.current().is(kind) }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    /// Returns the location of the token under the cursor.
    pub(crate) fn token_location(&self) -> Location { self.current().location }

    /// Returns the location of the most recently consumed token.
    pub(crate) fn previous_location(&self) -> Location {
        self.tokens[self.position.saturating_sub(1)].location
    }

    /// Builds a declaration location from the location of its first token
    /// through the most recently consumed token.
    pub(crate) fn span_from(&self, start: Location) -> Location {
        let end = self.previous_location();

        Location::new(start.start, end.end, self.file_id)
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Builds an error diagnostic for this file.
    pub(crate) const fn error(&self, code: DiagnosticCode, location: Location) -> Diagnostic {
        Diagnostic::error(code, self.file_id, location)
    }

    /// Builds a warning diagnostic for this file.
    pub(crate) const fn warning(&self, code: DiagnosticCode, location: Location) -> Diagnostic {
        Diagnostic::warning(code, self.file_id, location)
    }

    /// Emits a diagnostic to the shared sink.
    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) { self.reporter.emit(diagnostic); }

    /// Emits an `UnexpectedToken` diagnostic at the current token.
    pub(crate) fn unexpected_token(&mut self) {
        let diagnostic = self
            .error(DiagnosticCode::UnexpectedToken, self.token_location())
            .with_detail(format!("unexpected `{}`", self.current_kind()));
        self.emit(diagnostic);
    }

    /// Consumes the expected token, or emits `ExpectedToken` and stays put.
    ///
    /// Returns whether the token was present.
    pub(crate) fn expect(&mut self, kind: &TokenKind, detail: &str) -> bool {
        if self.check(kind) {
            self.advance();

            true
        } else {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedToken, self.token_location())
                .with_detail(detail.to_string());
            self.emit(diagnostic);

            false
        }
    }

    /// Accepts a normal or string-form identifier.
    ///
    /// On mismatch, emits `ExpectedIdentifier` and returns the literal name
    /// `__error__` so parsing can continue.
    pub(crate) fn get_name(&mut self, detail: &str) -> String {
        match self.current_kind().name_text() {
            Some(name) => {
                let name = name.to_string();
                self.advance();

                name
            }
            None => {
                let diagnostic = self
                    .error(DiagnosticCode::ExpectedIdentifier, self.token_location())
                    .with_detail(detail.to_string());
                self.emit(diagnostic);

                "__error__".to_string()
            }
        }
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Returns true when the current token can start a new block: `fun`,
    /// `macro`, `module`, `object`, `pub`, `type`, a doc comment, `#`, or an
    /// identifier immediately followed by `!`.
    pub(crate) fn is_new_block_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Fun
            | TokenKind::Macro
            | TokenKind::Module
            | TokenKind::Object
            | TokenKind::Pub
            | TokenKind::Type
            | TokenKind::CommentDoc(_)
            | TokenKind::Hashtag => true,
            TokenKind::Identifier(_) => matches!(self.peek(1).kind, TokenKind::Bang),
            _ => false,
        }
    }

    /// Skips tokens until a new-block starter or a block closer.
    ///
    /// This is the coarse recovery used after a malformed declaration: the
    /// failed routine has already emitted its diagnostic, and the dispatch
    /// continues with the next candidate.
    pub(crate) fn go_to_next_block(&mut self) {
        while !self.is_new_block_start()
            && !matches!(self.current_kind(), TokenKind::End | TokenKind::RBrace | TokenKind::Eof)
        {
            self.advance();
        }
    }

    // ------------------------------------------------------------------
    // Shared capture sub-routines
    // ------------------------------------------------------------------

    /// Captures token references while the stop predicate does not hold,
    /// tracking bracket depth so that separators inside nested `{...}`,
    /// `[...]`, `(...)` groups never terminate the capture.
    ///
    /// A closing delimiter at depth zero belongs to an enclosing group and
    /// ends the capture without being consumed.
    pub(crate) fn capture_until(&mut self, stop: impl Fn(&TokenKind) -> bool) -> TokenSlice<'t> {
        let start = self.position;
        let mut depth = 0usize;

        loop {
            let kind = self.current_kind();

            if kind.is_eof() {
                break;
            }

            if depth == 0 && stop(kind) {
                break;
            }

            if kind.is_opening_delimiter() {
                depth += 1;
            } else if kind.is_closing_delimiter() {
                if depth == 0 {
                    break;
                }

                depth -= 1;
            }

            self.advance();
        }

        &self.tokens[start..self.position]
    }

    /// Consumes a balanced delimited sequence and returns the token slices
    /// split at top-level commas.
    ///
    /// The cursor must sit on the opening delimiter; the matching closer is
    /// consumed. Inner bracket groups are captured wholesale into the current
    /// item. An empty `()` or `[]` yields an empty list.
    pub(crate) fn preparse_comma_separated(&mut self, close: &TokenKind) -> Vec<TokenSlice<'t>> {
        self.advance(); // opening delimiter

        let mut items = Vec::new();
        let mut start = self.position;
        let mut depth = 0usize;

        loop {
            let kind = self.current_kind();

            if kind.is_eof() {
                if self.position > start {
                    items.push(&self.tokens[start..self.position]);
                }

                break;
            }

            if depth == 0 && self.current().is(close) {
                if self.position > start {
                    items.push(&self.tokens[start..self.position]);
                }

                self.advance(); // closing delimiter
                break;
            }

            if depth == 0 && matches!(kind, TokenKind::Comma) {
                items.push(&self.tokens[start..self.position]);
                self.advance();
                start = self.position;

                continue;
            }

            if kind.is_opening_delimiter() {
                depth += 1;
            } else if kind.is_closing_delimiter() {
                depth = depth.saturating_sub(1);
            }

            self.advance();
        }

        items
    }

    /// Consumes one balanced bracket group and returns the tokens between the
    /// delimiters.
    ///
    /// The cursor must sit on the opening delimiter; the matching closer is
    /// consumed.
    pub(crate) fn capture_group(&mut self, close: &TokenKind) -> TokenSlice<'t> {
        self.advance(); // opening delimiter

        let start = self.position;
        let mut depth = 0usize;

        loop {
            let kind = self.current_kind();

            if kind.is_eof() {
                break;
            }

            if depth == 0 && self.current().is(close) {
                break;
            }

            if kind.is_opening_delimiter() {
                depth += 1;
            } else if kind.is_closing_delimiter() {
                depth = depth.saturating_sub(1);
            }

            self.advance();
        }

        let slice = &self.tokens[start..self.position];

        if !self.current_kind().is_eof() {
            self.advance(); // closing delimiter
        }

        slice
    }

    /// Captures a `+`-joined list of bracket-delimited condition or path
    /// slices, stopping at `stop`.
    pub(crate) fn preparse_plus_separated(&mut self, stop: &TokenKind) -> Vec<TokenSlice<'t>> {
        let mut items = Vec::new();

        loop {
            let item = self.capture_until(|kind| {
                matches!(kind, TokenKind::Plus) || std::mem::discriminant(kind) == std::mem::discriminant(stop)
            });
            items.push(item);

            if self.check(&TokenKind::Plus) {
                self.advance();
            } else {
                break;
            }
        }

        items
    }

    // ------------------------------------------------------------------
    // Top-level dispatch
    // ------------------------------------------------------------------

    /// Preparses one top-level construct.
    ///
    /// Imports, macros, and the package declaration attach directly to the
    /// output; declaration forms are returned for the caller to collect,
    /// which lets module bodies recurse through the same dispatch.
    pub(crate) fn preparse_next(&mut self) -> Option<Decl<'t>> {
        match self.current_kind() {
            TokenKind::Import => {
                self.preparse_import();

                None
            }
            TokenKind::Macro => {
                self.preparse_macro_decl();

                None
            }
            TokenKind::Package => {
                self.preparse_package();

                None
            }
            TokenKind::Pub => self.preparse_pub(),
            TokenKind::Module => self.preparse_module(self.token_location()),
            TokenKind::Fun => self.preparse_fun_decl(self.token_location()),
            TokenKind::Val => self.preparse_constant(self.token_location()),
            TokenKind::Type => self.preparse_type_decl(self.token_location()),
            TokenKind::Error => self.preparse_error_decl(self.token_location()),
            TokenKind::Use => self.preparse_use(self.token_location()),
            TokenKind::Include => self.preparse_include(self.token_location()),
            TokenKind::Object => self.preparse_object(self.token_location(), false),
            TokenKind::Lib => self.preparse_lib(self.token_location()),
            TokenKind::Test => {
                self.preparse_test();

                None
            }
            TokenKind::When => self.preparse_when_block(),
            TokenKind::Hashtag => {
                self.skip_preprocess();

                None
            }
            TokenKind::CommentDoc(_) => {
                self.advance();

                None
            }
            TokenKind::Identifier(name) if name == "close" => {
                let start = self.token_location();
                self.advance();

                self.preparse_object(start, true)
            }
            TokenKind::Identifier(_) if matches!(self.peek(1).kind, TokenKind::Bang) => {
                let start = self.token_location();

                self.preparse_macro_expand(start).map(Decl::MacroExpand)
            }
            _ => {
                self.unexpected_token();
                self.advance();

                None
            }
        }
    }

    /// Preparses a `pub`-prefixed declaration.
    ///
    /// `pub` sets the ambient visibility for the next declaration only and
    /// accepts the subset {import, fun, val, module, type, macro, object,
    /// close}.
    fn preparse_pub(&mut self) -> Option<Decl<'t>> {
        let start = self.token_location();

        self.advance();
        self.visibility = Visibility::Public;

        match self.current_kind() {
            TokenKind::Import => {
                self.preparse_import();

                None
            }
            TokenKind::Fun => self.preparse_fun_decl(start),
            TokenKind::Val => self.preparse_constant(start),
            TokenKind::Module => self.preparse_module(start),
            TokenKind::Type => self.preparse_type_decl(start),
            TokenKind::Macro => {
                self.preparse_macro_decl();

                None
            }
            TokenKind::Object => self.preparse_object(start, false),
            TokenKind::Identifier(name) if name == "close" => {
                self.advance();

                self.preparse_object(start, true)
            }
            _ => {
                self.unexpected_token();
                self.advance();

                None
            }
        }
    }

    /// Preparses a top-level `when` block: the condition is skipped up to
    /// `:`, then only `fun` or `pub fun` is accepted.
    fn preparse_when_block(&mut self) -> Option<Decl<'t>> {
        let start = self.token_location();

        self.advance(); // when
        let _ = self.capture_until(|kind| matches!(kind, TokenKind::Colon));

        if !self.expect(&TokenKind::Colon, "expected `:` after the `when` condition") {
            self.go_to_next_block();

            return None;
        }

        match self.current_kind() {
            TokenKind::Fun => self.preparse_fun_decl(start),
            TokenKind::Pub if matches!(self.peek(1).kind, TokenKind::Fun) => {
                self.advance();
                self.visibility = Visibility::Public;

                self.preparse_fun_decl(start)
            }
            _ => {
                self.unexpected_token();
                self.go_to_next_block();

                None
            }
        }
    }

    /// Skips a `#` preprocess directive: the marker, a directive name, and an
    /// optional bracketed argument group.
    fn skip_preprocess(&mut self) {
        self.advance(); // hashtag

        if self.current_kind().name_text().is_some() {
            self.advance();
        }

        if matches!(self.current_kind(), TokenKind::LHook) {
            let _ = self.capture_group(&TokenKind::RHook);
        } else if matches!(self.current_kind(), TokenKind::LParen) {
            let _ = self.capture_group(&TokenKind::RParen);
        }
    }

    /// Preparses and discards a `test` block:
    /// `test [<name>] = <body> end`.
    ///
    /// Test blocks have no slot in the preparse output; they are recognised
    /// so the dispatch can step over them without spurious diagnostics.
    fn preparse_test(&mut self) {
        self.advance(); // test

        if self.current_kind().name_text().is_some()
            || matches!(self.current_kind(), TokenKind::LiteralString(_))
        {
            self.advance();
        }

        if !self.expect(&TokenKind::Eq, "expected `=` after the test name") {
            self.go_to_next_block();

            return;
        }

        let _ = self.preparse_fun_body(body::must_close_fun_block);

        if !self.check(&TokenKind::End) {
            let diagnostic = self
                .error(DiagnosticCode::EofNotExpected, self.token_location())
                .with_detail("expected `end` to close the test block");
            self.emit(diagnostic);

            return;
        }

        self.advance(); // end
    }

    /// Returns the configured default package access prefix.
    pub(crate) fn default_package_access(&self) -> Option<&str> {
        self.options.default_package_access.as_deref()
    }

    /// Attaches an import to the visibility-matching list.
    pub(crate) fn push_import(&mut self, import: calla_ast::nodes::Import) {
        if self.visibility == Visibility::Public {
            self.info.public_imports.push(import);
        } else {
            self.info.private_imports.push(import);
        }
    }

    /// Attaches a macro to the visibility-matching list.
    pub(crate) fn push_macro(&mut self, macro_decl: calla_ast::nodes::MacroDecl<'t>) {
        if self.visibility == Visibility::Public {
            self.info.public_macros.push(macro_decl);
        } else {
            self.info.private_macros.push(macro_decl);
        }
    }

    /// Returns the package slot of the output being built.
    pub(crate) fn package_mut(&mut self) -> &mut Option<calla_ast::nodes::Package> {
        &mut self.info.package
    }
}
