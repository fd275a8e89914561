//! Type-declaration preparsing: aliases, enums, and records.

use calla_ast::nodes::{
    AliasType,
    Decl,
    EnumType,
    EnumVariant,
    RecordField,
    RecordType,
    TokenSlice,
    TypeDecl,
};
use calla_ast::token::TokenKind;
use calla_source::types::Location;

use super::Preparser;
use crate::diagnostics::DiagnosticCode;

impl<'t> Preparser<'_, 't> {
    /// Preparses
    /// `type <name> [ [<generics>] ] ( alias | enum | record ) = <body> [end|;]`.
    pub(super) fn preparse_type_decl(&mut self, start: Location) -> Option<Decl<'t>> {
        self.advance(); // type

        let name = self.get_name("expected the type name");

        let generic_params = if self.check(&TokenKind::LHook) {
            Some(self.preparse_comma_separated(&TokenKind::RHook))
        } else {
            None
        };

        let kind = match self.current_kind() {
            TokenKind::Alias | TokenKind::Enum | TokenKind::Record => {
                let kind = self.current_kind().clone();
                self.advance();

                kind
            }
            _ => {
                let diagnostic = self
                    .error(DiagnosticCode::BadKindOfType, self.token_location())
                    .with_help("a type declaration is an `alias`, an `enum`, or a `record`");
                self.emit(diagnostic);
                self.go_to_next_block();

                return None;
            }
        };

        if !self.expect(&TokenKind::Eq, "expected `=` before the type body") {
            self.go_to_next_block();

            return None;
        }

        let type_decl = match kind {
            TokenKind::Alias => {
                let data_type = self.capture_until(|k| matches!(k, TokenKind::Semicolon));

                if data_type.is_empty() {
                    let diagnostic =
                        self.error(DiagnosticCode::ExpectedDataType, self.token_location());
                    self.emit(diagnostic);
                }

                let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the alias");

                TypeDecl::Alias(AliasType {
                    name,
                    generic_params,
                    data_type,
                    visibility: self.visibility,
                    location: self.span_from(start),
                })
            }
            TokenKind::Enum => {
                let variants = self.preparse_enum_variants();
                self.close_type_body("expected `end` to close the enum");

                TypeDecl::Enum(EnumType {
                    name,
                    generic_params,
                    variants,
                    visibility: self.visibility,
                    location: self.span_from(start),
                })
            }
            _ => {
                let fields = self.preparse_record_fields();
                self.close_type_body("expected `end` to close the record");

                TypeDecl::Record(RecordType {
                    name,
                    generic_params,
                    fields,
                    visibility: self.visibility,
                    location: self.span_from(start),
                })
            }
        };

        Some(Decl::Type(type_decl))
    }

    /// Consumes the `end` of an enum or record body, or reports what is
    /// there instead.
    fn close_type_body(&mut self, detail: &str) {
        if self.check(&TokenKind::End) {
            self.advance();

            return;
        }

        let code = if self.current_kind().is_eof() {
            DiagnosticCode::EofNotExpected
        } else {
            DiagnosticCode::ExpectedToken
        };

        let diagnostic = self.error(code, self.token_location()).with_detail(detail.to_string());
        self.emit(diagnostic);
    }

    /// Preparses enum variants: `<name> [ : <data type> ] ;` up to `end`.
    pub(super) fn preparse_enum_variants(&mut self) -> Vec<EnumVariant<'t>> {
        let mut variants = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::CommentDoc(_) => {
                    self.advance();

                    continue;
                }
                _ => {}
            }

            if let Some(variant) = self.preparse_enum_variant() {
                variants.push(variant);
            }
        }

        variants
    }

    /// Preparses one enum variant.
    pub(super) fn preparse_enum_variant(&mut self) -> Option<EnumVariant<'t>> {
        let start = self.token_location();

        if self.current_kind().name_text().is_none() {
            self.unexpected_token();
            self.advance();

            return None;
        }

        let name = self.get_name("expected the variant name");

        let data_type = if self.check(&TokenKind::Colon) {
            self.advance();

            let slice = self.capture_until(|k| matches!(k, TokenKind::Semicolon | TokenKind::End));

            if slice.is_empty() {
                let diagnostic =
                    self.error(DiagnosticCode::ExpectedDataType, self.token_location());
                self.emit(diagnostic);

                None
            } else {
                Some(slice)
            }
        } else {
            None
        };

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` after the variant");

        Some(EnumVariant { name, data_type, location: self.span_from(start) })
    }

    /// Preparses record fields:
    /// `[pub] [mut] <name> <data type> [ := <default> ] ;` up to `end`.
    pub(super) fn preparse_record_fields(&mut self) -> Vec<RecordField<'t>> {
        let mut fields = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::CommentDoc(_) => {
                    self.advance();

                    continue;
                }
                _ => {}
            }

            if let Some(field) = self.preparse_record_field() {
                fields.push(field);
            }
        }

        fields
    }

    /// Preparses one record field.
    pub(super) fn preparse_record_field(&mut self) -> Option<RecordField<'t>> {
        let start = self.token_location();

        let is_pub = self.check(&TokenKind::Pub);

        if is_pub {
            self.advance();
        }

        let is_mut = self.check(&TokenKind::Mut);

        if is_mut {
            self.advance();
        }

        if self.current_kind().name_text().is_none() {
            self.unexpected_token();
            self.advance();

            return None;
        }

        let name = self.get_name("expected the field name");
        let data_type = self.capture_until(|k| {
            matches!(k, TokenKind::ColonEq | TokenKind::Semicolon | TokenKind::End)
        });

        if data_type.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedDataType, self.token_location())
                .with_detail("a field declares its data type after the name");
            self.emit(diagnostic);
        }

        let default: Option<TokenSlice<'t>> = if self.check(&TokenKind::ColonEq) {
            self.advance();

            Some(self.capture_until(|k| matches!(k, TokenKind::Semicolon | TokenKind::End)))
        } else {
            None
        };

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` after the field");

        Some(RecordField {
            name,
            data_type,
            default,
            is_pub,
            is_mut,
            location: self.span_from(start),
        })
    }
}
