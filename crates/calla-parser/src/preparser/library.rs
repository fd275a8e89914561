//! Foreign-library preparsing: `lib ( "<C|CC|CPP>" ) <name>? = <body> end`.

use calla_ast::nodes::{Decl, Lib, LibBodyItem, LibConstant, LibFrom, LibFun};
use calla_ast::token::TokenKind;
use calla_source::types::Location;

use super::Preparser;
use crate::diagnostics::DiagnosticCode;

impl<'t> Preparser<'_, 't> {
    /// Preparses a foreign library declaration.
    pub(super) fn preparse_lib(&mut self, start: Location) -> Option<Decl<'t>> {
        self.advance(); // lib

        if !self.expect(&TokenKind::LParen, "expected `(` after `lib`") {
            self.go_to_next_block();

            return None;
        }

        let from = match self.current_kind() {
            TokenKind::LiteralString(value) if value == "C" || value == "CC" => {
                self.advance();

                LibFrom::Cc
            }
            TokenKind::LiteralString(value) if value == "CPP" => {
                self.advance();

                LibFrom::Cpp
            }
            TokenKind::LiteralString(_) => {
                let diagnostic = self
                    .error(DiagnosticCode::UnknownFromValueInLib, self.token_location())
                    .with_help("the supported values are \"C\", \"CC\", and \"CPP\"");
                self.emit(diagnostic);
                self.advance();

                LibFrom::Cc
            }
            _ => {
                let diagnostic = self
                    .error(DiagnosticCode::UnknownFromValueInLib, self.token_location())
                    .with_detail("expected the foreign language as a string");
                self.emit(diagnostic);

                LibFrom::Cc
            }
        };

        let _ = self.expect(&TokenKind::RParen, "expected `)` after the lib language");

        let name = if self.current_kind().name_text().is_some() {
            Some(self.get_name("expected the library name"))
        } else {
            None
        };

        if !self.expect(&TokenKind::Eq, "expected `=` before the lib body") {
            self.go_to_next_block();

            return None;
        }

        let mut body = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End => {
                    self.advance();

                    break;
                }
                TokenKind::Eof => {
                    let diagnostic = self
                        .error(DiagnosticCode::EofNotExpected, self.token_location())
                        .with_detail("expected `end` to close the lib body");
                    self.emit(diagnostic);

                    break;
                }
                TokenKind::CommentDoc(_) => self.advance(),
                TokenKind::Val => {
                    if let Some(constant) = self.preparse_lib_constant() {
                        body.push(LibBodyItem::Constant(constant));
                    }
                }
                TokenKind::Fun => {
                    if let Some(fun) = self.preparse_lib_fun() {
                        body.push(LibBodyItem::Fun(fun));
                    }
                }
                _ => {
                    // `type` and `object` items are reserved by the grammar
                    // but not implemented
                    self.unexpected_token();
                    self.advance();
                }
            }
        }

        Some(Decl::Lib(Lib::new(name, from, body, self.span_from(start))))
    }

    /// Preparses a constant prototype: `val <name> <type> ;`.
    fn preparse_lib_constant(&mut self) -> Option<LibConstant<'t>> {
        let start = self.token_location();

        self.advance(); // val

        let name = self.get_name("expected the constant name");
        let data_type =
            self.capture_until(|kind| matches!(kind, TokenKind::Semicolon | TokenKind::End));

        if data_type.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedDataType, self.token_location())
                .with_detail("a lib constant declares its data type after the name");
            self.emit(diagnostic);
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` after the constant prototype");

        Some(LibConstant { name, data_type, location: self.span_from(start) })
    }

    /// Preparses a function prototype:
    /// `fun <name> [ (<params>) ] <ret> [ := <new-name> ] ;`.
    fn preparse_lib_fun(&mut self) -> Option<LibFun<'t>> {
        let start = self.token_location();

        self.advance(); // fun

        let name = self.get_name("expected the function name");

        let params = if self.check(&TokenKind::LParen) {
            Some(self.preparse_comma_separated(&TokenKind::RParen))
        } else {
            None
        };

        let return_data_type = self.capture_until(|kind| {
            matches!(kind, TokenKind::ColonEq | TokenKind::Semicolon | TokenKind::End)
        });

        let link_name = if self.check(&TokenKind::ColonEq) {
            self.advance();

            Some(self.get_name("expected the linked symbol name after `:=`"))
        } else {
            None
        };

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` after the function prototype");

        Some(LibFun { name, params, return_data_type, link_name, location: self.span_from(start) })
    }
}
