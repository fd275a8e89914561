//! Function-body preparsing: statement skeletons.
//!
//! Every block-preparsing routine is parameterised by a `must_close`
//! predicate on the current token: the body loop collects items until the
//! predicate holds, then returns to its caller, which consumes the closing
//! token itself. The canonical predicates live at the bottom of this file.
//!
//! Expression runs (`exprs` items) find their right edge through the
//! statement-start heuristic: a run extends until a statement terminator or
//! until the current token starts a known statement form.

use calla_ast::nodes::{
    AsmStmt,
    AwaitStmt,
    BlockStmt,
    BreakStmt,
    DeferStmt,
    DropStmt,
    ExprsItem,
    ForStmt,
    FunBodyItem,
    IfStmt,
    Lambda,
    MatchStmt,
    NextStmt,
    RaiseStmt,
    ReturnStmt,
    TryStmt,
    UnsafeStmt,
    VarStmt,
    WhileStmt,
};
use calla_ast::token::TokenKind;

use super::{ClosePredicate, Preparser};
use crate::diagnostics::DiagnosticCode;

impl<'t> Preparser<'_, 't> {
    /// Collects function-body items until `must_close` holds on the current
    /// token. The closing token itself is left for the caller.
    pub(super) fn preparse_fun_body(&mut self, must_close: ClosePredicate) -> Vec<FunBodyItem<'t>> {
        let mut items = Vec::new();

        loop {
            let kind = self.current_kind();

            if kind.is_eof() || must_close(kind) {
                break;
            }

            if let Some(item) = self.preparse_body_item(must_close) {
                items.push(item);
            }
        }

        items
    }

    /// Preparses one function-body item.
    #[allow(clippy::too_many_lines)]
    pub(super) fn preparse_body_item(
        &mut self,
        must_close: ClosePredicate,
    ) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();

        match self.current_kind() {
            TokenKind::CommentDoc(_) => {
                self.advance();

                None
            }
            TokenKind::Semicolon => {
                let diagnostic = self.warning(DiagnosticCode::UnusedSemicolon, start);
                self.emit(diagnostic);
                self.advance();

                None
            }
            TokenKind::Begin => {
                self.advance();
                let body = self.preparse_fun_body(must_close_end);
                self.close_block("expected `end` to close the block");

                Some(FunBodyItem::Block(BlockStmt { body, location: self.span_from(start) }))
            }
            TokenKind::At if matches!(self.peek(1).kind, TokenKind::LBrace) => {
                self.jump(2);
                let body = self.preparse_fun_body(must_close_brace);

                if self.check(&TokenKind::RBrace) {
                    self.advance();
                } else {
                    let diagnostic = self
                        .error(DiagnosticCode::EofNotExpected, self.token_location())
                        .with_detail("expected `}` to close the block");
                    self.emit(diagnostic);
                }

                Some(FunBodyItem::Block(BlockStmt { body, location: self.span_from(start) }))
            }
            TokenKind::Break => {
                self.advance();
                let name = self.optional_name();
                let _ = self.expect(&TokenKind::Semicolon, "expected `;` after `break`");

                Some(FunBodyItem::Break(BreakStmt { name, location: self.span_from(start) }))
            }
            TokenKind::Next => {
                self.advance();
                let name = self.optional_name();
                let _ = self.expect(&TokenKind::Semicolon, "expected `;` after `next`");

                Some(FunBodyItem::Next(NextStmt { name, location: self.span_from(start) }))
            }
            TokenKind::For => self.preparse_for(),
            TokenKind::If => self.preparse_if(),
            TokenKind::Match => self.preparse_match(),
            TokenKind::While => {
                self.advance();
                let expr = self.capture_until(|kind| matches!(kind, TokenKind::Do));
                let _ = self.expect(&TokenKind::Do, "expected `do` after the `while` condition");
                let body = self.preparse_fun_body(must_close_end);
                self.close_block("expected `end` to close the `while` loop");

                Some(FunBodyItem::While(WhileStmt { expr, body, location: self.span_from(start) }))
            }
            TokenKind::Try if matches!(self.peek(1).kind, TokenKind::Do) => self.preparse_try(),
            TokenKind::Unsafe => {
                self.advance();
                let _ = self.expect(&TokenKind::Eq, "expected `=` after `unsafe`");
                let body = self.preparse_fun_body(must_close_end);
                self.close_block("expected `end` to close the `unsafe` block");

                Some(FunBodyItem::Unsafe(UnsafeStmt { body, location: self.span_from(start) }))
            }
            TokenKind::Return => {
                self.advance();

                let expr = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.capture_until(is_expr_stop))
                };

                let _ = self.expect(&TokenKind::Semicolon, "expected `;` after `return`");

                Some(FunBodyItem::Return(ReturnStmt { expr, location: self.span_from(start) }))
            }
            TokenKind::Asm => {
                self.advance();

                let params = if self.check(&TokenKind::LParen) {
                    self.preparse_comma_separated(&TokenKind::RParen)
                } else {
                    let diagnostic = self
                        .error(DiagnosticCode::ExpectedToken, self.token_location())
                        .with_detail("expected `(` after `asm`");
                    self.emit(diagnostic);

                    Vec::new()
                };

                let _ = self.expect(&TokenKind::Semicolon, "expected `;` after `asm (...)`");

                Some(FunBodyItem::Asm(AsmStmt { params, location: self.span_from(start) }))
            }
            TokenKind::Await => {
                self.advance();
                let expr = self.expr_until_semicolon("expected an expression after `await`");

                Some(FunBodyItem::Await(AwaitStmt { expr, location: self.span_from(start) }))
            }
            TokenKind::Raise => {
                self.advance();
                let expr = self.expr_until_semicolon("expected an expression after `raise`");

                Some(FunBodyItem::Raise(RaiseStmt { expr, location: self.span_from(start) }))
            }
            TokenKind::Fun => self.preparse_lambda(must_close),
            TokenKind::Val | TokenKind::Mut => self.preparse_var(false, false, false),
            TokenKind::Ref if matches!(self.peek(1).kind, TokenKind::Colon) => {
                self.jump(2);

                self.preparse_prefixed_var(true, false, false)
            }
            TokenKind::Trace if matches!(self.peek(1).kind, TokenKind::Colon) => {
                self.jump(2);

                self.preparse_prefixed_var(false, true, false)
            }
            TokenKind::Drop if matches!(self.peek(1).kind, TokenKind::Colon) => {
                self.jump(2);

                self.preparse_prefixed_var(false, false, true)
            }
            TokenKind::Drop => {
                self.advance();
                let expr = self.expr_until_semicolon("expected an expression after `drop`");

                Some(FunBodyItem::Drop(DropStmt { expr, location: self.span_from(start) }))
            }
            TokenKind::Identifier(name)
                if name == "defer" && !matches!(self.peek(1).kind, TokenKind::Bang) =>
            {
                self.preparse_defer(must_close)
            }
            TokenKind::Identifier(_) if matches!(self.peek(1).kind, TokenKind::Bang) => {
                self.preparse_macro_expand(start).map(FunBodyItem::MacroExpand)
            }
            TokenKind::Eof => None,
            TokenKind::End | TokenKind::RBrace => {
                // A closer the active predicate does not accept
                let diagnostic = self
                    .error(DiagnosticCode::UnexpectedTokenInFunctionBody, start)
                    .with_detail(format!("unexpected `{}`", self.current_kind()));
                self.emit(diagnostic);
                self.advance();

                None
            }
            _ => self.preparse_exprs(must_close),
        }
    }

    /// Consumes the `end` of a block statement, or reports what is there
    /// instead.
    fn close_block(&mut self, detail: &str) {
        if self.check(&TokenKind::End) {
            self.advance();

            return;
        }

        let code = if self.current_kind().is_eof() {
            DiagnosticCode::EofNotExpected
        } else {
            DiagnosticCode::ExpectedToken
        };

        let diagnostic =
            self.error(code, self.token_location()).with_detail(detail.to_string());
        self.emit(diagnostic);
    }

    /// Accepts an optional identifier (for loop labels).
    fn optional_name(&mut self) -> Option<String> {
        self.current_kind().name_text().map(|name| {
            let name = name.to_string();
            self.advance();

            name
        })
    }

    /// Captures an `<expr> ;` tail, diagnosing an empty expression, and
    /// consumes the terminator.
    fn expr_until_semicolon(&mut self, detail: &str) -> calla_ast::nodes::TokenSlice<'t> {
        let expr = self.capture_until(is_expr_stop);

        if expr.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedExpression, self.token_location())
                .with_detail(detail.to_string());
            self.emit(diagnostic);
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the statement");

        expr
    }

    // ------------------------------------------------------------------
    // Expression runs
    // ------------------------------------------------------------------

    /// Returns true when the current token starts a known statement form,
    /// which ends a run of expression tokens.
    fn is_statement_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Begin
            | TokenKind::Break
            | TokenKind::For
            | TokenKind::Fun
            | TokenKind::If
            | TokenKind::Match
            | TokenKind::Next
            | TokenKind::While
            | TokenKind::Mut
            | TokenKind::Val
            | TokenKind::Return
            | TokenKind::End
            | TokenKind::RBrace
            | TokenKind::Semicolon
            | TokenKind::Eof => true,
            TokenKind::Try => matches!(self.peek(1).kind, TokenKind::Do),
            TokenKind::Ref | TokenKind::Trace | TokenKind::Drop => {
                matches!(self.peek(1).kind, TokenKind::Colon)
            }
            TokenKind::Identifier(_) => matches!(self.peek(1).kind, TokenKind::Bang),
            TokenKind::At => matches!(self.peek(1).kind, TokenKind::LBrace),
            _ => false,
        }
    }

    /// Preparses a run of expression tokens up to a statement terminator: a
    /// `;` (consumed), the closing condition, or the start of a new
    /// statement.
    fn preparse_exprs(&mut self, must_close: ClosePredicate) -> Option<FunBodyItem<'t>> {
        let start_location = self.token_location();
        let start = self.position;
        let mut depth = 0usize;

        loop {
            let kind = self.current_kind();

            if kind.is_eof() {
                break;
            }

            if depth == 0 && (must_close(kind) || self.is_statement_start()) {
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

        let tokens = &self.tokens[start..self.position];

        if tokens.is_empty() && !self.check(&TokenKind::Semicolon) {
            // Nothing here can start an expression either; step over it so
            // the body loop makes progress
            let diagnostic = self
                .error(DiagnosticCode::UnexpectedTokenInFunctionBody, self.token_location())
                .with_detail(format!("unexpected `{}`", self.current_kind()));
            self.emit(diagnostic);
            self.advance();

            return None;
        }

        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }

        Some(FunBodyItem::Exprs(ExprsItem::new(tokens, self.span_from(start_location))))
    }

    // ------------------------------------------------------------------
    // Control flow
    // ------------------------------------------------------------------

    /// Preparses `for [(<name>)] <expr> [:> <capture>] do <body> end`.
    fn preparse_for(&mut self) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();

        self.advance(); // for

        let name = if self.check(&TokenKind::LParen) {
            self.advance();
            let name = self.get_name("expected the loop label");
            let _ = self.expect(&TokenKind::RParen, "expected `)` after the loop label");

            Some(name)
        } else {
            None
        };

        let expr =
            self.capture_until(|kind| matches!(kind, TokenKind::ColonRShift | TokenKind::Do));

        let capture = if self.check(&TokenKind::ColonRShift) {
            self.advance();

            Some(self.capture_until(|kind| matches!(kind, TokenKind::Do)))
        } else {
            None
        };

        let _ = self.expect(&TokenKind::Do, "expected `do` after the `for` head");
        let body = self.preparse_fun_body(must_close_end);
        self.close_block("expected `end` to close the `for` loop");

        Some(FunBodyItem::For(ForStmt {
            name,
            expr,
            capture,
            body,
            location: self.span_from(start),
        }))
    }

    /// Preparses
    /// `if <e> [:> <c>] do <b> [elif <e> [:> <c>] do <b>]* [else <b>] end`.
    fn preparse_if(&mut self) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();

        self.advance(); // if

        let (if_expr, if_capture) = self.preparse_condition_head("if");
        let if_body = self.preparse_fun_body(must_close_if_branch);

        let mut elif_exprs = Vec::new();
        let mut elif_captures = Vec::new();
        let mut elif_bodies = Vec::new();

        while self.check(&TokenKind::Elif) {
            self.advance();

            let (expr, capture) = self.preparse_condition_head("elif");
            elif_exprs.push(expr);
            elif_captures.push(capture);
            elif_bodies.push(self.preparse_fun_body(must_close_if_branch));
        }

        let else_body = if self.check(&TokenKind::Else) {
            self.advance();

            Some(self.preparse_fun_body(must_close_end))
        } else {
            None
        };

        self.close_block("expected `end` to close the `if` statement");

        Some(FunBodyItem::If(IfStmt {
            if_expr,
            if_capture,
            if_body,
            elif_exprs,
            elif_captures,
            elif_bodies,
            else_body,
            location: self.span_from(start),
        }))
    }

    /// Preparses an `<expr> [:> <capture>] do` control-flow head.
    fn preparse_condition_head(
        &mut self,
        keyword: &str,
    ) -> (calla_ast::nodes::TokenSlice<'t>, Option<calla_ast::nodes::TokenSlice<'t>>) {
        let expr =
            self.capture_until(|kind| matches!(kind, TokenKind::ColonRShift | TokenKind::Do));

        let capture = if self.check(&TokenKind::ColonRShift) {
            self.advance();

            Some(self.capture_until(|kind| matches!(kind, TokenKind::Do)))
        } else {
            None
        };

        let _ =
            self.expect(&TokenKind::Do, &format!("expected `do` after the `{keyword}` condition"));

        (expr, capture)
    }

    /// Preparses `match <e> do { <pattern> [? <cond>] => <item> [;] }* end`.
    fn preparse_match(&mut self) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();

        self.advance(); // match

        let expr = self.capture_until(|kind| matches!(kind, TokenKind::Do));
        let _ = self.expect(&TokenKind::Do, "expected `do` after the matched expression");

        let mut patterns = Vec::new();
        let mut pattern_conds = Vec::new();
        let mut bodies = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::CommentDoc(_) => {
                    self.advance();

                    continue;
                }
                _ => {}
            }

            let pattern = self.capture_until(|kind| {
                matches!(kind, TokenKind::Interrogation | TokenKind::FatArrow | TokenKind::End)
            });

            let cond = if self.check(&TokenKind::Interrogation) {
                self.advance();

                Some(self.capture_until(|kind| matches!(kind, TokenKind::FatArrow)))
            } else {
                None
            };

            if !self.expect(&TokenKind::FatArrow, "expected `=>` after the match pattern") {
                break;
            }

            let Some(item) = self.preparse_body_item(must_close_match_arm) else {
                break;
            };

            if self.check(&TokenKind::Semicolon) {
                self.advance();
            }

            patterns.push(pattern);
            pattern_conds.push(cond);
            bodies.push(item);
        }

        self.close_block("expected `end` to close the `match` statement");

        Some(FunBodyItem::Match(MatchStmt {
            expr,
            patterns,
            pattern_conds,
            bodies,
            location: self.span_from(start),
        }))
    }

    /// Preparses `try do <body> [catch [<e>] do <body>] end`.
    fn preparse_try(&mut self) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();

        self.advance(); // try
        let _ = self.expect(&TokenKind::Do, "expected `do` after `try`");

        let body = self.preparse_fun_body(must_close_try_body);

        let (catch_expr, catch_body) = if self.check(&TokenKind::Catch) {
            self.advance();

            let expr = if self.check(&TokenKind::Do) {
                None
            } else {
                Some(self.capture_until(|kind| matches!(kind, TokenKind::Do)))
            };

            let _ = self.expect(&TokenKind::Do, "expected `do` after the `catch` binding");

            (expr, Some(self.preparse_fun_body(must_close_end)))
        } else {
            (None, None)
        };

        self.close_block("expected `end` to close the `try` statement");

        Some(FunBodyItem::Try(TryStmt {
            body,
            catch_expr,
            catch_body,
            location: self.span_from(start),
        }))
    }

    // ------------------------------------------------------------------
    // Bindings
    // ------------------------------------------------------------------

    /// Preparses `(val|mut) <name> [<type>] := <expr> ;` with the ownership
    /// prefix flags already consumed.
    fn preparse_var(
        &mut self,
        is_ref: bool,
        is_trace: bool,
        is_drop: bool,
    ) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();
        let is_mut = self.check(&TokenKind::Mut);

        self.advance(); // val or mut

        let name = self.get_name("expected the variable name");

        let data_type = if self.check(&TokenKind::ColonEq) {
            None
        } else {
            let slice = self.capture_until(|kind| {
                matches!(kind, TokenKind::ColonEq | TokenKind::Semicolon | TokenKind::End)
            });

            if slice.is_empty() { None } else { Some(slice) }
        };

        let _ = self.expect(&TokenKind::ColonEq, "expected `:=` before the variable value");

        let expr = self.capture_until(is_expr_stop);

        if expr.is_empty() {
            let diagnostic = self
                .error(DiagnosticCode::ExpectedExpression, self.token_location())
                .with_detail("expected an expression after `:=`");
            self.emit(diagnostic);
        }

        let _ = self.expect(&TokenKind::Semicolon, "expected `;` to close the binding");

        let mut stmt = VarStmt::new(name, expr, is_mut, self.span_from(start));

        stmt.data_type = data_type;
        stmt.is_ref = is_ref;
        stmt.is_trace = is_trace;
        stmt.is_drop = is_drop;

        Some(FunBodyItem::Var(stmt))
    }

    /// Preparses the binding after a `ref:`, `trace:`, or `drop:` prefix;
    /// only `val` or `mut` may follow.
    fn preparse_prefixed_var(
        &mut self,
        is_ref: bool,
        is_trace: bool,
        is_drop: bool,
    ) -> Option<FunBodyItem<'t>> {
        if !matches!(self.current_kind(), TokenKind::Val | TokenKind::Mut) {
            let diagnostic = self
                .error(DiagnosticCode::UnexpectedTokenInFunctionBody, self.token_location())
                .with_detail("expected `val` or `mut` after the ownership prefix");
            self.emit(diagnostic);
            self.advance();

            return None;
        }

        self.preparse_var(is_ref, is_trace, is_drop)
    }

    // ------------------------------------------------------------------
    // Defer and lambdas
    // ------------------------------------------------------------------

    /// Preparses `defer <item> ;`, warning on a superfluous trailing
    /// semicolon after a block-shaped item.
    fn preparse_defer(&mut self, must_close: ClosePredicate) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();

        self.advance(); // defer

        let item = self.preparse_body_item(must_close)?;

        if self.check(&TokenKind::Semicolon) {
            if item.is_block_shaped() {
                let diagnostic = self
                    .warning(DiagnosticCode::UnusedSemicolon, self.token_location())
                    .with_help("this block closes itself, remove the `;`");
                self.emit(diagnostic);
            }

            self.advance();
        }

        Some(FunBodyItem::Defer(DeferStmt {
            item: Box::new(item),
            location: self.span_from(start),
        }))
    }

    /// Preparses a lambda:
    /// `fun <name>? [(<params>)] [<ret>] -> <item> ; [\ ( <params-call> ) ;]`.
    fn preparse_lambda(&mut self, must_close: ClosePredicate) -> Option<FunBodyItem<'t>> {
        let start = self.token_location();

        self.advance(); // fun

        let name = self.optional_name();

        let params = if self.check(&TokenKind::LParen) {
            Some(self.preparse_comma_separated(&TokenKind::RParen))
        } else {
            None
        };

        let return_data_type = self
            .capture_until(|kind| matches!(kind, TokenKind::Arrow | TokenKind::Semicolon));

        if !self.check(&TokenKind::Arrow) {
            let code = if self.current_kind().is_eof() {
                DiagnosticCode::EofNotExpected
            } else {
                DiagnosticCode::UnexpectedToken
            };

            let diagnostic = self
                .error(code, self.token_location())
                .with_detail("expected `->` before the lambda body");
            self.emit(diagnostic);

            return None;
        }

        self.advance(); // ->

        let item = Box::new(self.preparse_body_item(must_close)?);

        let call_params = if self.check(&TokenKind::Backslash) {
            self.advance();

            let params = if self.check(&TokenKind::LParen) {
                self.preparse_comma_separated(&TokenKind::RParen)
            } else {
                let diagnostic = self
                    .error(DiagnosticCode::ExpectedToken, self.token_location())
                    .with_detail("expected `(` after `\\`");
                self.emit(diagnostic);

                Vec::new()
            };

            let _ =
                self.expect(&TokenKind::Semicolon, "expected `;` after the lambda invocation");

            Some(params)
        } else {
            None
        };

        let mut lambda = Lambda::new(return_data_type, item, self.span_from(start));

        lambda.name = name;
        lambda.params = params;
        lambda.call_params = call_params;

        Some(FunBodyItem::Lambda(lambda))
    }
}

// ----------------------------------------------------------------------
// Closing predicates
// ----------------------------------------------------------------------

/// Closes the outer body of a function: `end` or any token that can only
/// start a new top-level declaration (recovery when `end` went missing).
pub(super) fn must_close_fun_block(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::End
            | TokenKind::Eof
            | TokenKind::Module
            | TokenKind::Object
            | TokenKind::Type
            | TokenKind::Use
            | TokenKind::Include
            | TokenKind::Lib
            | TokenKind::Test
            | TokenKind::Import
            | TokenKind::Package
            | TokenKind::Pub
            | TokenKind::Macro
    )
}

/// Closes a plain block: `end`.
fn must_close_end(kind: &TokenKind) -> bool { matches!(kind, TokenKind::End | TokenKind::Eof) }

/// Closes an `if`/`elif` branch: `end`, `elif`, or `else`.
fn must_close_if_branch(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::End | TokenKind::Elif | TokenKind::Else | TokenKind::Eof)
}

/// Closes a `try` body: `end` or `catch`.
fn must_close_try_body(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::End | TokenKind::Catch | TokenKind::Eof)
}

/// Closes a `@{ ... }` block: `}`.
fn must_close_brace(kind: &TokenKind) -> bool { matches!(kind, TokenKind::RBrace | TokenKind::Eof) }

/// Closes a match arm: `;` or the `end` of the match.
fn must_close_match_arm(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Semicolon | TokenKind::End | TokenKind::Eof)
}

/// The right edge of an `<expr> ;` tail.
fn is_expr_stop(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Semicolon | TokenKind::End | TokenKind::RBrace | TokenKind::Eof)
}
