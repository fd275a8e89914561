//! Object-declaration preparsing: classes, traits, record objects, and enum
//! objects.

use calla_ast::nodes::{
    Attribute,
    Class,
    ClassBodyItem,
    Decl,
    EnumObject,
    EnumObjectBodyItem,
    Object,
    Prototype,
    RecordObject,
    RecordObjectBodyItem,
    TokenSlice,
    TraitBodyItem,
    TraitObject,
    Visibility,
};
use calla_ast::token::TokenKind;
use calla_source::types::Location;

use super::Preparser;
use crate::diagnostics::DiagnosticCode;

/// The four object kinds, selected by the keyword after the object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Class,
    Trait,
    Record,
    Enum,
}

impl<'t> Preparser<'_, 't> {
    /// Preparses an object declaration:
    ///
    /// ```text
    /// [pub] [close] object [impl <paths> in] [inherit <paths> in] <name>
    ///     [ [<generics>] ] ( class | trait | record | enum ) = <body> end
    /// ```
    pub(super) fn preparse_object(&mut self, start: Location, is_close: bool) -> Option<Decl<'t>> {
        let object_visibility = self.visibility;

        if !self.check(&TokenKind::Object) {
            self.unexpected_token();
            self.go_to_next_block();

            return None;
        }

        self.advance(); // object

        let mut impls: Option<Vec<TokenSlice<'t>>> = None;
        let mut inherits: Option<Vec<TokenSlice<'t>>> = None;

        loop {
            match self.current_kind() {
                TokenKind::Impl => {
                    if impls.is_some() {
                        let diagnostic = self
                            .error(DiagnosticCode::ImplIsAlreadyDefined, self.token_location())
                            .with_help("merge the paths into one `impl` clause with `+`");
                        self.emit(diagnostic);
                    }

                    self.advance();
                    let paths = self.preparse_plus_separated(&TokenKind::In);
                    let _ = self.expect(&TokenKind::In, "expected `in` after the `impl` paths");

                    impls = Some(paths);
                }
                TokenKind::Inherit => {
                    if inherits.is_some() {
                        let diagnostic = self
                            .error(DiagnosticCode::InheritIsAlreadyDefined, self.token_location())
                            .with_help("merge the paths into one `inherit` clause with `+`");
                        self.emit(diagnostic);
                    }

                    self.advance();
                    let paths = self.preparse_plus_separated(&TokenKind::In);
                    let _ = self.expect(&TokenKind::In, "expected `in` after the `inherit` paths");

                    inherits = Some(paths);
                }
                _ => break,
            }
        }

        let name = self.get_name("expected the object name");

        let generic_params = if self.check(&TokenKind::LHook) {
            Some(self.preparse_comma_separated(&TokenKind::RHook))
        } else {
            None
        };

        let kind = match self.current_kind() {
            TokenKind::Class => ObjectKind::Class,
            TokenKind::Trait => ObjectKind::Trait,
            TokenKind::Record => ObjectKind::Record,
            TokenKind::Enum => ObjectKind::Enum,
            _ => {
                let diagnostic = self
                    .error(DiagnosticCode::BadKindOfObject, self.token_location())
                    .with_help("an object is a `class`, a `trait`, a `record`, or an `enum`");
                self.emit(diagnostic);
                self.go_to_next_block();

                return None;
            }
        };

        self.advance(); // the kind keyword

        // Per-kind clause validation; offending clauses are dropped
        if kind == ObjectKind::Trait && impls.is_some() {
            let diagnostic = self
                .error(DiagnosticCode::ImplIsNotExpected, self.token_location())
                .with_detail("a trait cannot `impl`");
            self.emit(diagnostic);
            impls = None;
        }

        if matches!(kind, ObjectKind::Record | ObjectKind::Enum) && inherits.is_some() {
            let diagnostic = self
                .error(DiagnosticCode::InheritIsNotExpected, self.token_location())
                .with_detail("only classes and traits can `inherit`");
            self.emit(diagnostic);
            inherits = None;
        }

        let is_close = if is_close && matches!(kind, ObjectKind::Record | ObjectKind::Enum) {
            let diagnostic = self
                .error(DiagnosticCode::UnexpectedClose, self.token_location())
                .with_detail("`close` applies only to classes and traits");
            self.emit(diagnostic);

            false
        } else {
            is_close
        };

        if !self.expect(&TokenKind::Eq, "expected `=` before the object body") {
            self.go_to_next_block();

            return None;
        }

        let object = match kind {
            ObjectKind::Class => Object::Class(Class {
                name,
                generic_params,
                impls,
                inherits,
                is_close,
                body: self.preparse_class_body(),
                visibility: object_visibility,
                location: start,
            }),
            ObjectKind::Trait => Object::Trait(TraitObject {
                name,
                generic_params,
                inherits,
                is_close,
                body: self.preparse_trait_body(),
                visibility: object_visibility,
                location: start,
            }),
            ObjectKind::Record => Object::Record(RecordObject {
                name,
                generic_params,
                impls,
                body: self.preparse_record_object_body(),
                visibility: object_visibility,
                location: start,
            }),
            ObjectKind::Enum => Object::Enum(EnumObject {
                name,
                generic_params,
                impls,
                body: self.preparse_enum_object_body(),
                visibility: object_visibility,
                location: start,
            }),
        };

        self.close_object_body();
        self.visibility = object_visibility;

        let mut object = object;
        let location = self.span_from(start);

        match &mut object {
            Object::Class(class) => class.location = location,
            Object::Trait(trait_object) => trait_object.location = location,
            Object::Record(record) => record.location = location,
            Object::Enum(enum_object) => enum_object.location = location,
        }

        Some(Decl::Object(object))
    }

    /// Consumes the `end` of an object body, or reports what is there
    /// instead.
    fn close_object_body(&mut self) {
        if self.check(&TokenKind::End) {
            self.advance();

            return;
        }

        let code = if self.current_kind().is_eof() {
            DiagnosticCode::EofNotExpected
        } else {
            DiagnosticCode::ExpectedToken
        };

        let diagnostic = self
            .error(code, self.token_location())
            .with_detail("expected `end` to close the object body");
        self.emit(diagnostic);
    }

    /// Consumes an optional `pub` or `global` member prefix and returns the
    /// member visibility.
    fn member_visibility(&mut self) -> Visibility {
        match self.current_kind() {
            TokenKind::Pub => {
                self.advance();

                Visibility::Public
            }
            TokenKind::Global => {
                self.advance();

                Visibility::Static
            }
            _ => Visibility::Private,
        }
    }

    // ------------------------------------------------------------------
    // Class
    // ------------------------------------------------------------------

    /// Preparses a class body: attributes, methods, and macro expansions.
    fn preparse_class_body(&mut self) -> Vec<ClassBodyItem<'t>> {
        let mut body = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::CommentDoc(_) => {
                    self.advance();

                    continue;
                }
                _ => {}
            }

            let start = self.token_location();
            let visibility = self.member_visibility();

            match self.current_kind() {
                TokenKind::Val => {
                    if let Some(attribute) = self.preparse_attribute(start, visibility) {
                        body.push(ClassBodyItem::Attribute(attribute));
                    }
                }
                TokenKind::Fun => {
                    self.visibility = visibility;

                    if let Some(method) = self.preparse_fun(start) {
                        body.push(ClassBodyItem::Method(method));
                    }
                }
                TokenKind::Identifier(_) if matches!(self.peek(1).kind, TokenKind::Bang) => {
                    if let Some(expand) = self.preparse_macro_expand(start) {
                        body.push(ClassBodyItem::MacroExpand(expand));
                    }
                }
                _ => {
                    self.unexpected_token();
                    self.advance();
                }
            }
        }

        body
    }

    /// Preparses an attribute:
    /// `[pub|global] val <name> <type> [ := <expr> ] [ :: get|set [, get|set] ] ;`.
    fn preparse_attribute(
        &mut self,
        start: Location,
        visibility: Visibility,
    ) -> Option<Attribute<'t>> {
        self.advance(); // val

        let name = self.get_name("expected the attribute name");
        let data_type = self.capture_until(|kind| {
            matches!(
                kind,
                TokenKind::ColonEq | TokenKind::ColonColon | TokenKind::Semicolon | TokenKind::End
            )
        });

        if data_type.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedDataType, self.token_location())
                .with_detail("an attribute declares its data type after the name");
            self.emit(diagnostic);
        }

        let expr = if self.check(&TokenKind::ColonEq) {
            self.advance();

            Some(self.capture_until(|kind| {
                matches!(kind, TokenKind::ColonColon | TokenKind::Semicolon | TokenKind::End)
            }))
        } else {
            None
        };

        let mut is_get = false;
        let mut is_set = false;

        if self.check(&TokenKind::ColonColon) {
            self.advance();

            loop {
                match self.current_kind() {
                    TokenKind::Get => {
                        if is_get {
                            let diagnostic = self
                                .error(DiagnosticCode::GetIsDuplicate, self.token_location());
                            self.emit(diagnostic);
                        }

                        is_get = true;
                        self.advance();
                    }
                    TokenKind::Set => {
                        if is_set {
                            let diagnostic = self
                                .error(DiagnosticCode::SetIsDuplicate, self.token_location());
                            self.emit(diagnostic);
                        }

                        is_set = true;
                        self.advance();
                    }
                    TokenKind::Comma => self.advance(),
                    _ => break,
                }
            }
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` after the attribute");

        Some(Attribute {
            name,
            data_type,
            expr,
            is_get,
            is_set,
            visibility,
            location: self.span_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Trait
    // ------------------------------------------------------------------

    /// Preparses a trait body: attributes, prototypes, and macro expansions.
    fn preparse_trait_body(&mut self) -> Vec<TraitBodyItem<'t>> {
        let mut body = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::CommentDoc(_) => {
                    self.advance();

                    continue;
                }
                _ => {}
            }

            let start = self.token_location();
            let visibility = self.member_visibility();

            match self.current_kind() {
                TokenKind::Val => {
                    if let Some(attribute) = self.preparse_attribute(start, visibility) {
                        body.push(TraitBodyItem::Attribute(attribute));
                    }
                }
                TokenKind::Fun => {
                    if let Some(prototype) = self.preparse_prototype(start) {
                        body.push(TraitBodyItem::Prototype(prototype));
                    }
                }
                TokenKind::Identifier(_) if matches!(self.peek(1).kind, TokenKind::Bang) => {
                    if let Some(expand) = self.preparse_macro_expand(start) {
                        body.push(TraitBodyItem::MacroExpand(expand));
                    }
                }
                _ => {
                    self.unexpected_token();
                    self.advance();
                }
            }
        }

        body
    }

    /// Preparses a method prototype:
    /// `fun <name> [ [<generics>] ] [(<params>)] [<ret>] ;`.
    fn preparse_prototype(&mut self, start: Location) -> Option<Prototype<'t>> {
        self.advance(); // fun

        let name = self.get_name("expected the prototype name");

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

        let return_data_type =
            self.capture_until(|kind| matches!(kind, TokenKind::Semicolon | TokenKind::End));

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` after the prototype");

        Some(Prototype {
            name,
            generic_params,
            params,
            return_data_type,
            location: self.span_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Record object
    // ------------------------------------------------------------------

    /// Preparses a record-object body: fields, constants, methods, and macro
    /// expansions.
    fn preparse_record_object_body(&mut self) -> Vec<RecordObjectBodyItem<'t>> {
        let mut body = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::CommentDoc(_) => {
                    self.advance();

                    continue;
                }
                _ => {}
            }

            let start = self.token_location();

            match self.current_kind() {
                TokenKind::Val => {
                    self.visibility = Visibility::Private;

                    if let Some(Decl::Constant(constant)) = self.preparse_constant(start) {
                        body.push(RecordObjectBodyItem::Constant(constant));
                    }
                }
                TokenKind::Pub if matches!(self.peek(1).kind, TokenKind::Val) => {
                    self.advance();
                    self.visibility = Visibility::Public;

                    if let Some(Decl::Constant(constant)) = self.preparse_constant(start) {
                        body.push(RecordObjectBodyItem::Constant(constant));
                    }
                }
                TokenKind::Pub if matches!(self.peek(1).kind, TokenKind::Fun) => {
                    self.advance();
                    self.visibility = Visibility::Public;

                    if let Some(method) = self.preparse_fun(start) {
                        body.push(RecordObjectBodyItem::Method(method));
                    }
                }
                TokenKind::Fun => {
                    self.visibility = Visibility::Private;

                    if let Some(method) = self.preparse_fun(start) {
                        body.push(RecordObjectBodyItem::Method(method));
                    }
                }
                TokenKind::Identifier(_) if matches!(self.peek(1).kind, TokenKind::Bang) => {
                    if let Some(expand) = self.preparse_macro_expand(start) {
                        body.push(RecordObjectBodyItem::MacroExpand(expand));
                    }
                }
                _ => {
                    if let Some(field) = self.preparse_record_field() {
                        body.push(RecordObjectBodyItem::Field(field));
                    }
                }
            }
        }

        body
    }

    // ------------------------------------------------------------------
    // Enum object
    // ------------------------------------------------------------------

    /// Preparses an enum-object body: variants, constants, methods, and
    /// macro expansions.
    fn preparse_enum_object_body(&mut self) -> Vec<EnumObjectBodyItem<'t>> {
        let mut body = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::CommentDoc(_) => {
                    self.advance();

                    continue;
                }
                _ => {}
            }

            let start = self.token_location();

            match self.current_kind() {
                TokenKind::Val => {
                    self.visibility = Visibility::Private;

                    if let Some(Decl::Constant(constant)) = self.preparse_constant(start) {
                        body.push(EnumObjectBodyItem::Constant(constant));
                    }
                }
                TokenKind::Pub if matches!(self.peek(1).kind, TokenKind::Val) => {
                    self.advance();
                    self.visibility = Visibility::Public;

                    if let Some(Decl::Constant(constant)) = self.preparse_constant(start) {
                        body.push(EnumObjectBodyItem::Constant(constant));
                    }
                }
                TokenKind::Pub if matches!(self.peek(1).kind, TokenKind::Fun) => {
                    self.advance();
                    self.visibility = Visibility::Public;

                    if let Some(method) = self.preparse_fun(start) {
                        body.push(EnumObjectBodyItem::Method(method));
                    }
                }
                TokenKind::Fun => {
                    self.visibility = Visibility::Private;

                    if let Some(method) = self.preparse_fun(start) {
                        body.push(EnumObjectBodyItem::Method(method));
                    }
                }
                TokenKind::Identifier(_) if matches!(self.peek(1).kind, TokenKind::Bang) => {
                    if let Some(expand) = self.preparse_macro_expand(start) {
                        body.push(EnumObjectBodyItem::MacroExpand(expand));
                    }
                }
                _ => {
                    if let Some(variant) = self.preparse_enum_variant() {
                        body.push(EnumObjectBodyItem::Variant(variant));
                    }
                }
            }
        }

        body
    }
}
