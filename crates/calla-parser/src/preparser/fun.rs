//! Function-declaration preparsing: the header clauses and the body hookup.

use calla_ast::nodes::{Decl, Fun};
use calla_ast::token::TokenKind;
use calla_source::types::Location;

use super::{Preparser, body};
use crate::diagnostics::DiagnosticCode;

/// Returns true for token kinds that can name an operator function.
pub(super) const fn is_operator_kind(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ampersand
            | TokenKind::Bang
            | TokenKind::Bar
            | TokenKind::BarRShift
            | TokenKind::DotDot
            | TokenKind::EqEq
            | TokenKind::Hat
            | TokenKind::Interrogation
            | TokenKind::LShift
            | TokenKind::LShiftEq
            | TokenKind::LShiftLShift
            | TokenKind::Minus
            | TokenKind::MinusMinus
            | TokenKind::NotEq
            | TokenKind::Percentage
            | TokenKind::Plus
            | TokenKind::PlusPlus
            | TokenKind::RShift
            | TokenKind::RShiftEq
            | TokenKind::RShiftRShift
            | TokenKind::Slash
            | TokenKind::Star
            | TokenKind::StarStar
            | TokenKind::Wave
    )
}

impl<'t> Preparser<'_, 't> {
    /// Preparses a `fun` declaration, `fun` under the cursor.
    pub(super) fn preparse_fun_decl(&mut self, start: Location) -> Option<Decl<'t>> {
        self.preparse_fun(start).map(Decl::Fun)
    }

    /// Preparses a function with a body:
    ///
    /// ```text
    /// fun [@<object-impl-path>] <name-or-operator>
    ///     [ [<generics>] ] [ (<params>) ]
    ///     [ when [<cond>]+ ..., ]? [ req [<cond>]+ ..., ]?
    ///     [ comptime (req|when) [<cond>]+ ... ]?
    ///     [ <return-data-type> ] = <body> end
    /// ```
    pub(super) fn preparse_fun(&mut self, start: Location) -> Option<Fun<'t>> {
        self.advance(); // fun

        let mut object_impl = None;

        if self.check(&TokenKind::At) {
            self.advance();
            object_impl = Some(self.preparse_dotted_name("expected the object path after `@`"));
        }

        let mut is_operator = false;
        let name = match self.current_kind().name_text() {
            Some(name) => {
                let name = name.to_string();
                self.advance();

                name
            }
            None if is_operator_kind(self.current_kind()) => {
                is_operator = true;
                let name = self.current_kind().to_string();
                self.advance();

                name
            }
            None => {
                let diagnostic = self
                    .error(DiagnosticCode::ExpectedFunIdentifier, self.token_location())
                    .with_detail("expected the function name after `fun`");
                self.emit(diagnostic);

                "__error__".to_string()
            }
        };

        let generic_params = if self.check(&TokenKind::LHook) {
            Some(self.preparse_comma_separated(&TokenKind::RHook))
        } else {
            None
        };

        let params = if self.check(&TokenKind::LParen) {
            Some(self.preparse_comma_separated(&TokenKind::RParen))
        } else {
            None
        };

        let mut when = Vec::new();
        let mut req = Vec::new();
        let mut when_is_comptime = false;
        let mut req_is_comptime = false;

        loop {
            match self.current_kind() {
                TokenKind::When => {
                    self.advance();
                    when = self.preparse_condition_list();
                }
                TokenKind::Req => {
                    self.advance();
                    req = self.preparse_condition_list();
                }
                TokenKind::Comptime => {
                    self.advance();

                    match self.current_kind() {
                        TokenKind::When => {
                            self.advance();
                            when_is_comptime = true;
                            when = self.preparse_condition_list();
                        }
                        TokenKind::Req => {
                            self.advance();
                            req_is_comptime = true;
                            req = self.preparse_condition_list();
                        }
                        _ => {
                            self.unexpected_token();

                            break;
                        }
                    }
                }
                _ => break,
            }
        }

        let return_data_type = self.capture_until(|kind| matches!(kind, TokenKind::Eq));

        if !self.expect(&TokenKind::Eq, "expected `=` before the function body") {
            self.go_to_next_block();

            return None;
        }

        let fun_body = self.preparse_fun_body(body::must_close_fun_block);

        match self.current_kind() {
            TokenKind::End => self.advance(),
            TokenKind::Eof => {
                let diagnostic = self
                    .error(DiagnosticCode::EofNotExpected, self.token_location())
                    .with_detail("expected `end` to close the function body");
                self.emit(diagnostic);
            }
            _ => {
                let diagnostic = self
                    .error(DiagnosticCode::ExpectedToken, self.token_location())
                    .with_detail("expected `end` to close the function body");
                self.emit(diagnostic);
            }
        }

        let mut fun =
            Fun::new(name, return_data_type, fun_body, self.visibility, self.span_from(start));

        fun.is_operator = is_operator;
        fun.when = when;
        fun.req = req;
        fun.when_is_comptime = when_is_comptime;
        fun.req_is_comptime = req_is_comptime;

        if let Some(object_impl) = object_impl {
            fun = fun.with_object_impl(object_impl);
        }

        if let Some(generic_params) = generic_params {
            fun = fun.with_generic_params(generic_params);
        }

        if let Some(params) = params {
            fun = fun.with_params(params);
        }

        Some(fun)
    }

    /// Preparses a `when`/`req` condition list: bracket-delimited slices
    /// joined by `+`, with an optional trailing comma before the next clause.
    fn preparse_condition_list(&mut self) -> Vec<calla_ast::nodes::TokenSlice<'t>> {
        let mut conditions = Vec::new();

        loop {
            if !self.check(&TokenKind::LHook) {
                let diagnostic = self
                    .error(DiagnosticCode::ExpectedToken, self.token_location())
                    .with_detail("expected `[` to open the condition");
                self.emit(diagnostic);

                break;
            }

            conditions.push(self.capture_group(&TokenKind::RHook));

            if self.check(&TokenKind::Plus) {
                self.advance();
            } else {
                break;
            }
        }

        if self.check(&TokenKind::Comma) {
            self.advance();
        }

        conditions
    }

    /// Preparses a dotted identifier chain, joining the segments with `.`.
    pub(super) fn preparse_dotted_name(&mut self, detail: &str) -> String {
        let mut name = self.get_name(detail);

        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.get_name("expected a path segment after `.`"));
        }

        name
    }
}
