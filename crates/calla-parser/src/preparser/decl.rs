//! Declaration-layer preparsing: imports, macro declarations, packages,
//! constants, error declarations, `use`/`include`, modules, and macro
//! expansion sites.

use calla_ast::nodes::{
    Constant,
    ConstantInfo,
    Decl,
    ErrorDecl,
    Import,
    Include,
    MacroDecl,
    MacroExpand,
    ModuleDecl,
    MultipleConstant,
    Package,
    SubPackage,
    Use,
    Visibility,
};
use calla_ast::token::{MacroTokens, Token, TokenKind};
use calla_source::types::Location;

use super::Preparser;
use crate::diagnostics::DiagnosticCode;

impl<'t> Preparser<'_, 't> {
    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    /// Preparses `import "<path>" [as <ident>] ;` and attaches it to the
    /// visibility-matching import list.
    pub(super) fn preparse_import(&mut self) {
        let start = self.token_location();

        self.advance(); // import

        let TokenKind::LiteralString(value) = self.current_kind() else {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedImportValue, self.token_location())
                .with_help("write the import path as a string, e.g. `import \"std.io\";`");
            self.emit(diagnostic);
            self.go_to_next_block();

            return;
        };

        let value = value.clone();
        self.advance();

        let mut as_name = None;

        if self.check(&TokenKind::As) {
            self.advance();
            as_name = Some(self.get_name("expected an identifier after `as`"));
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the import");

        let mut import = Import::new(value, self.span_from(start));

        if let Some(as_name) = as_name {
            import = import.with_as_name(as_name);
        }

        self.push_import(import);
    }

    // ------------------------------------------------------------------
    // Macro declaration
    // ------------------------------------------------------------------

    /// Preparses `macro <name> [ ( <param>, ... ) ] = { <tokens> } ;` and
    /// attaches it to the visibility-matching macro list.
    pub(super) fn preparse_macro_decl(&mut self) {
        let start = self.token_location();

        self.advance(); // macro
        let name = self.get_name("expected the macro name");

        let params = if self.check(&TokenKind::LParen) {
            Some(self.preparse_comma_separated(&TokenKind::RParen))
        } else {
            None
        };

        if !self.expect(&TokenKind::Eq, "expected `=` before the macro body") {
            self.go_to_next_block();

            return;
        }

        if !self.check(&TokenKind::LBrace) {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedToken, self.token_location())
                .with_detail("expected `{` to open the macro body");
            self.emit(diagnostic);
            self.go_to_next_block();

            return;
        }

        let body = self.capture_group(&TokenKind::RBrace);

        // The synthetic terminator abuts the closing brace
        let brace_end = self.previous_location();
        let eof =
            Token::new(TokenKind::Eof, Location::new(brace_end.end, brace_end.end, brace_end.file_id));

        if body.is_empty() {
            let location = self.span_from(start);
            let diagnostic = self
                .error(DiagnosticCode::MacroDoNothing, location)
                .with_help("give the macro a body, or remove the declaration");
            self.emit(diagnostic);
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the macro");

        let mut macro_decl =
            MacroDecl::new(name, MacroTokens::new(body, eof), self.span_from(start));

        if let Some(params) = params {
            macro_decl = macro_decl.with_params(params);
        }

        self.push_macro(macro_decl);
    }

    // ------------------------------------------------------------------
    // Package
    // ------------------------------------------------------------------

    /// Preparses `package [<name>] = { [pub] .<sub-path>; }* end`.
    pub(super) fn preparse_package(&mut self) {
        let start = self.token_location();
        let duplicate = self.package_mut().is_some();

        if duplicate {
            let diagnostic = self
                .error(DiagnosticCode::DuplicatePackageDeclaration, start)
                .with_help("a file declares its package at most once");
            self.emit(diagnostic);
        }

        self.advance(); // package

        let mut name = None;

        if self.current_kind().name_text().is_some() {
            if duplicate && self.package_mut().as_ref().is_some_and(|p| p.name.is_some()) {
                let diagnostic =
                    self.error(DiagnosticCode::PackageNameAlreadyDefined, self.token_location());
                self.emit(diagnostic);
            }

            name = Some(self.get_name("expected the package name"));
        }

        if !self.expect(&TokenKind::Eq, "expected `=` after the package name") {
            self.go_to_next_block();

            return;
        }

        let mut sub_packages = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End => {
                    self.advance();

                    break;
                }
                TokenKind::Eof => {
                    let diagnostic = self
                        .error(DiagnosticCode::EofNotExpected, self.token_location())
                        .with_detail("expected `end` to close the package declaration");
                    self.emit(diagnostic);

                    break;
                }
                _ => {
                    if let Some(sub_package) = self.preparse_sub_package() {
                        sub_packages.push(sub_package);
                    }
                }
            }
        }

        if !duplicate {
            *self.package_mut() = Some(Package::new(name, sub_packages, self.span_from(start)));
        }
    }

    /// Preparses one `[pub] .<sub-path> ;` entry of a package body.
    fn preparse_sub_package(&mut self) -> Option<SubPackage> {
        let mut visibility = Visibility::Private;

        if self.check(&TokenKind::Pub) {
            visibility = Visibility::Public;
            self.advance();
        }

        if !self.expect(&TokenKind::Dot, "expected `.` to open the sub-package path") {
            if !matches!(self.current_kind(), TokenKind::End | TokenKind::Eof) {
                self.advance();
            }

            return None;
        }

        let name = self.join_sub_package_name()?;
        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the sub-package");

        let global_name = match self.default_package_access() {
            Some(access) => format!("{access}.{name}"),
            None => name.clone(),
        };

        Some(SubPackage::new(visibility, name, global_name))
    }

    /// Joins the segments of one sub-package path through a single rule for
    /// both the normal- and string-identifier forms, validating the result
    /// against `[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*`.
    fn join_sub_package_name(&mut self) -> Option<String> {
        let mut name = String::new();

        loop {
            match self.current_kind() {
                TokenKind::Identifier(segment) | TokenKind::IdentifierString(segment) => {
                    name.push_str(segment);
                    self.advance();
                }
                _ => {
                    let diagnostic = self
                        .error(DiagnosticCode::ExpectedIdentifier, self.token_location())
                        .with_detail("expected a sub-package path segment");
                    self.emit(diagnostic);

                    return None;
                }
            }

            if self.check(&TokenKind::Dot) {
                name.push('.');
                self.advance();
            } else {
                break;
            }
        }

        if is_valid_sub_package_name(&name) {
            Some(name)
        } else {
            let diagnostic = self
                .error(DiagnosticCode::UnexpectedCharacter, self.previous_location())
                .with_detail(format!("`{name}` is not a valid sub-package path"));
            self.emit(diagnostic);

            None
        }
    }

    // ------------------------------------------------------------------
    // Constant
    // ------------------------------------------------------------------

    /// Preparses a constant declaration in simple or multiple form.
    pub(super) fn preparse_constant(&mut self, start: Location) -> Option<Decl<'t>> {
        self.advance(); // val

        if self.check(&TokenKind::LParen) {
            return self.preparse_multiple_constant(start);
        }

        let name = self.get_name("expected the constant name");
        let data_type =
            self.capture_until(|kind| matches!(kind, TokenKind::ColonEq | TokenKind::Semicolon));

        if data_type.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedDataType, self.token_location())
                .with_help("a constant declares its data type between the name and `:=`");
            self.emit(diagnostic);
        }

        let _ = self.expect(&TokenKind::ColonEq, "expected `:=` before the constant value");

        let expr = self.capture_until(|kind| matches!(kind, TokenKind::Semicolon));

        if expr.is_empty() {
            let diagnostic =
                self.error(DiagnosticCode::ExpectedExpression, self.token_location());
            self.emit(diagnostic);
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the constant");

        let info =
            ConstantInfo::new(name, expr, data_type, self.visibility, self.span_from(start));

        Some(Decl::Constant(Constant::Simple(info)))
    }

    /// Preparses `val ( <name> <type>, ... ) := ( <expr>, ... ) ;`.
    ///
    /// Names and expressions must be equi-length; the shorter side is padded
    /// with empty slices after the matching diagnostic.
    fn preparse_multiple_constant(&mut self, start: Location) -> Option<Decl<'t>> {
        let bindings = self.preparse_comma_separated(&TokenKind::RParen);

        let _ = self.expect(&TokenKind::ColonEq, "expected `:=` before the constant values");

        let exprs = if self.check(&TokenKind::LParen) {
            self.preparse_comma_separated(&TokenKind::RParen)
        } else {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedExpression, self.token_location())
                .with_detail("expected `(` to open the value list");
            self.emit(diagnostic);

            Vec::new()
        };

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the constant");

        let location = self.span_from(start);

        if exprs.len() < bindings.len() {
            let diagnostic = self
                .error(DiagnosticCode::MissOneOrManyExpressions, location)
                .with_detail("every name of a multiple constant needs a value");
            self.emit(diagnostic);
        } else if bindings.len() < exprs.len() {
            let diagnostic = self
                .error(DiagnosticCode::MissOneOrManyIdentifiers, location)
                .with_detail("every value of a multiple constant needs a name");
            self.emit(diagnostic);
        }

        let count = bindings.len().max(exprs.len());
        let empty: &[Token] = &[];
        let mut constants = Vec::with_capacity(count);

        for index in 0..count {
            let binding = bindings.get(index).copied().unwrap_or(empty);
            let expr = exprs.get(index).copied().unwrap_or(empty);

            let (name, data_type) = match binding.first().map(Token::kind) {
                Some(TokenKind::Identifier(name) | TokenKind::IdentifierString(name)) => {
                    (name.clone(), &binding[1..])
                }
                _ => {
                    let diagnostic = self
                        .error(DiagnosticCode::ExpectedIdentifier, location)
                        .with_detail("each binding of a multiple constant starts with its name");
                    self.emit(diagnostic);

                    ("__error__".to_string(), empty)
                }
            };

            constants.push(ConstantInfo::new(name, expr, data_type, self.visibility, location));
        }

        Some(Decl::Constant(Constant::Multiple(MultipleConstant::new(constants, location))))
    }

    // ------------------------------------------------------------------
    // Error declaration
    // ------------------------------------------------------------------

    /// Preparses `error <name> [ [<generics>] ] [ : <data type> ] ;`.
    pub(super) fn preparse_error_decl(&mut self, start: Location) -> Option<Decl<'t>> {
        self.advance(); // error

        let name = self.get_name("expected the error name");
        let mut decl = ErrorDecl::new(name, self.visibility, start);

        if self.check(&TokenKind::LHook) {
            decl = decl.with_generic_params(self.preparse_comma_separated(&TokenKind::RHook));
        }

        if self.check(&TokenKind::Colon) {
            self.advance();

            let data_type = self.capture_until(|kind| matches!(kind, TokenKind::Semicolon));

            if data_type.is_empty() {
                let diagnostic =
                    self.error(DiagnosticCode::ExpectedDataType, self.token_location());
                self.emit(diagnostic);
            }

            decl = decl.with_data_type(data_type);
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the error declaration");

        decl.location = self.span_from(start);

        Some(Decl::Error(decl))
    }

    // ------------------------------------------------------------------
    // Use / Include
    // ------------------------------------------------------------------

    /// Preparses `use <path> ;`.
    pub(super) fn preparse_use(&mut self, start: Location) -> Option<Decl<'t>> {
        self.advance(); // use

        let path = self.capture_until(|kind| matches!(kind, TokenKind::Semicolon));

        if path.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedIdentifier, self.token_location())
                .with_detail("expected a path after `use`");
            self.emit(diagnostic);
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the use declaration");

        Some(Decl::Use(Use::new(path, self.span_from(start))))
    }

    /// Preparses `include <path> ;`.
    pub(super) fn preparse_include(&mut self, start: Location) -> Option<Decl<'t>> {
        self.advance(); // include

        let path = self.capture_until(|kind| matches!(kind, TokenKind::Semicolon));

        if path.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedIdentifier, self.token_location())
                .with_detail("expected a path after `include`");
            self.emit(diagnostic);
        }

        let _ =
            self.expect(&TokenKind::Semicolon, "expected `;` to close the include declaration");

        Some(Decl::Include(Include::new(path, self.span_from(start))))
    }

    // ------------------------------------------------------------------
    // Module
    // ------------------------------------------------------------------

    /// Preparses `module <dotted-name> = <decl>* end`.
    ///
    /// The body recursively dispatches through the top-level rules; the
    /// ambient visibility is snapshotted around the recursion so the module's
    /// own visibility survives its members.
    pub(super) fn preparse_module(&mut self, start: Location) -> Option<Decl<'t>> {
        let module_visibility = self.visibility;

        self.advance(); // module

        let mut name = String::new();

        match self.current_kind().name_text() {
            Some(segment) => {
                name.push_str(segment);
                self.advance();
            }
            None => {
                let diagnostic = self
                    .error(DiagnosticCode::ExpectedModuleIdentifier, self.token_location())
                    .with_detail("expected the module name after `module`");
                self.emit(diagnostic);
                name.push_str("__error__");
            }
        }

        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.get_name("expected a module path segment after `.`"));
        }

        if !self.expect(&TokenKind::Eq, "expected `=` before the module body") {
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
                        .with_detail("expected `end` to close the module");
                    self.emit(diagnostic);

                    break;
                }
                _ => {
                    self.visibility = Visibility::Private;

                    if let Some(decl) = self.preparse_next() {
                        body.push(decl);
                    }
                }
            }
        }

        self.visibility = module_visibility;

        Some(Decl::Module(ModuleDecl::new(
            name,
            body,
            module_visibility,
            self.span_from(start),
        )))
    }

    // ------------------------------------------------------------------
    // Macro expansion
    // ------------------------------------------------------------------

    /// Preparses `<name>!( <arg>, ... ) ;`, usable both as a declaration and
    /// as a function-body item. An empty argument list is permitted.
    pub(super) fn preparse_macro_expand(&mut self, start: Location) -> Option<MacroExpand<'t>> {
        let name = self.get_name("expected the macro name");

        if !self.expect(&TokenKind::Bang, "expected `!` after the macro name") {
            self.go_to_next_block();

            return None;
        }

        let args = if self.check(&TokenKind::LParen) {
            Some(self.preparse_comma_separated(&TokenKind::RParen))
        } else {
            None
        };

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the macro expansion");

        let mut expand = MacroExpand::new(name, self.span_from(start));

        if let Some(args) = args {
            expand = expand.with_args(args);
        }

        Some(expand)
    }
}

/// Validates a sub-package path against
/// `[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*`.
fn is_valid_sub_package_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut bytes = segment.bytes();

            bytes
                .next()
                .is_some_and(|first| first == b'_' || first.is_ascii_alphabetic())
                && bytes.all(|byte| byte == b'_' || byte.is_ascii_alphanumeric())
        })
}
