//! Tests for the preparser's function-body layer.

use std::sync::Arc;

use calla_ast::nodes::{Decl, Fun, FunBodyItem};
use calla_ast::token::{Token, TokenKind};
use calla_parser::diagnostics::{DiagnosticCode, DiagnosticLevel, DiagnosticReporter};
use calla_parser::preparser::{PreparseOptions, Preparser};
use calla_parser::scanner::Scanner;
use calla_source::types::{FileID, SourceManager};

fn scan(source: &str) -> (FileID, Vec<Token>, DiagnosticReporter) {
    let mut manager = SourceManager::new();
    let file_id = manager.add_file("test.cl".to_string(), source.to_string());
    let manager = Arc::new(manager);
    let file = manager.get_file(file_id).expect("file was just added");

    let mut reporter = DiagnosticReporter::new(manager.clone());
    let tokens = Scanner::new(file_id, file, &mut reporter).run(false);

    (file_id, tokens, reporter)
}

/// Wraps `body` in a function, preparses, and hands the function to `check`.
fn with_fun_body(body: &str, check: impl FnOnce(&Fun<'_>, &DiagnosticReporter)) {
    let source = format!("fun test_subject = {body} end");
    let (file_id, tokens, mut reporter) = scan(&source);
    let info = Preparser::new(file_id, &tokens, PreparseOptions::default(), &mut reporter).run();

    let Some(Decl::Fun(fun)) = info.decls.first() else {
        panic!("expected a fun declaration, got {:?}", info.decls.first());
    };

    check(fun, &reporter);
}

fn lexemes(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|token| token.kind.to_string()).collect()
}

// ============================================================================
// Expression runs
// ============================================================================

#[test]
fn test_exprs_run_up_to_the_semicolon() {
    with_fun_body("x := f(1, 2) + 3;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert_eq!(fun.body.len(), 1);

        let FunBodyItem::Exprs(exprs) = &fun.body[0] else {
            panic!("expected an expression run");
        };

        assert_eq!(lexemes(exprs.tokens), vec!["x", ":=", "f", "(", "1", ",", "2", ")", "+", "3"]);
    });
}

#[test]
fn test_exprs_stop_at_the_next_statement_keyword() {
    with_fun_body("x + 1 return x;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert_eq!(fun.body.len(), 2);
        assert!(matches!(fun.body[0], FunBodyItem::Exprs(_)));
        assert!(matches!(fun.body[1], FunBodyItem::Return(_)));
    });
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
fn test_var_with_type_and_mutability() {
    with_fun_body("mut y I32 := 1; val z := 2;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert_eq!(fun.body.len(), 2);

        let FunBodyItem::Var(y) = &fun.body[0] else {
            panic!("expected a var statement");
        };

        assert!(y.is_mut);
        assert_eq!(y.name, "y");
        assert_eq!(lexemes(y.data_type.expect("type was declared")), vec!["I32"]);
        assert_eq!(lexemes(y.expr), vec!["1"]);

        let FunBodyItem::Var(z) = &fun.body[1] else {
            panic!("expected a var statement");
        };

        assert!(!z.is_mut);
        assert!(z.data_type.is_none());
    });
}

#[test]
fn test_ownership_prefixes_set_their_flags() {
    with_fun_body("ref: val a I32 := 1; trace: mut b I32 := 2; drop: val c I32 := 3;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let flags: Vec<_> = fun
            .body
            .iter()
            .map(|item| {
                let FunBodyItem::Var(var) = item else {
                    panic!("expected a var statement");
                };

                (var.is_ref, var.is_trace, var.is_drop, var.is_mut)
            })
            .collect();

        assert_eq!(
            flags,
            vec![(true, false, false, false), (false, true, false, true), (false, false, true, false)]
        );
    });
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_if_elif_else_with_var_branches() {
    let body = "if x > 0 do y := 1; elif x < 0 do y := -1; else y := 0; end";

    with_fun_body(body, |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert_eq!(fun.body.len(), 1);

        let FunBodyItem::If(stmt) = &fun.body[0] else {
            panic!("expected an if statement");
        };

        assert_eq!(lexemes(stmt.if_expr), vec!["x", ">", "0"]);
        assert!(stmt.if_capture.is_none());
        assert_eq!(stmt.elif_exprs.len(), 1);
        assert_eq!(stmt.elif_captures, vec![None]);
        assert_eq!(stmt.elif_bodies.len(), 1);
        assert!(stmt.else_body.is_some());

        // Each branch carries one exprs-shaped assignment
        assert_eq!(stmt.if_body.len(), 1);
        assert!(matches!(stmt.if_body[0], FunBodyItem::Exprs(_)));
        assert_eq!(stmt.elif_bodies[0].len(), 1);
        assert_eq!(stmt.else_body.as_ref().map(Vec::len), Some(1));
    });
}

#[test]
fn test_if_with_capture_clause() {
    with_fun_body("if find(x) :> value do use_it(value); end", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::If(stmt) = &fun.body[0] else {
            panic!("expected an if statement");
        };

        assert_eq!(lexemes(stmt.if_capture.expect("a capture clause")), vec!["value"]);
    });
}

#[test]
fn test_for_with_label_and_capture() {
    with_fun_body("for (outer) items :> item do touch(item); end", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::For(stmt) = &fun.body[0] else {
            panic!("expected a for statement");
        };

        assert_eq!(stmt.name.as_deref(), Some("outer"));
        assert_eq!(lexemes(stmt.expr), vec!["items"]);
        assert_eq!(lexemes(stmt.capture.expect("a capture clause")), vec!["item"]);
        assert_eq!(stmt.body.len(), 1);
    });
}

#[test]
fn test_while_loop() {
    with_fun_body("while n > 0 do n := n - 1; end", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::While(stmt) = &fun.body[0] else {
            panic!("expected a while statement");
        };

        assert_eq!(lexemes(stmt.expr), vec!["n", ">", "0"]);
        assert_eq!(stmt.body.len(), 1);
    });
}

#[test]
fn test_match_with_guards() {
    let body = "match shape do Point => return 0; Circle ? r > 0 => return r; end";

    with_fun_body(body, |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Match(stmt) = &fun.body[0] else {
            panic!("expected a match statement");
        };

        assert_eq!(lexemes(stmt.expr), vec!["shape"]);
        assert_eq!(stmt.patterns.len(), 2);
        assert_eq!(lexemes(stmt.patterns[0]), vec!["Point"]);
        assert!(stmt.pattern_conds[0].is_none());
        assert_eq!(lexemes(stmt.pattern_conds[1].expect("a guard")), vec!["r", ">", "0"]);
        assert_eq!(stmt.bodies.len(), 2);
        assert!(matches!(stmt.bodies[0], FunBodyItem::Return(_)));
    });
}

#[test]
fn test_try_with_catch_binding() {
    with_fun_body("try do risky(); catch err do log(err); end", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Try(stmt) = &fun.body[0] else {
            panic!("expected a try statement");
        };

        assert_eq!(stmt.body.len(), 1);
        assert_eq!(lexemes(stmt.catch_expr.expect("a catch binding")), vec!["err"]);
        assert_eq!(stmt.catch_body.as_ref().map(Vec::len), Some(1));
    });
}

#[test]
fn test_try_without_do_is_an_expression() {
    with_fun_body("try.unwrap(x);", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert!(matches!(fun.body[0], FunBodyItem::Exprs(_)));
    });
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_begin_block_and_brace_block() {
    with_fun_body("begin x := 1; end @{ y := 2; }", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert_eq!(fun.body.len(), 2);
        assert!(matches!(fun.body[0], FunBodyItem::Block(_)));
        assert!(matches!(fun.body[1], FunBodyItem::Block(_)));
    });
}

#[test]
fn test_unsafe_block() {
    with_fun_body("unsafe = poke(addr); end", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Unsafe(stmt) = &fun.body[0] else {
            panic!("expected an unsafe statement");
        };

        assert_eq!(stmt.body.len(), 1);
    });
}

// ============================================================================
// Simple statements
// ============================================================================

#[test]
fn test_break_and_next_with_labels() {
    with_fun_body("break; next; break outer; next inner;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert_eq!(fun.body.len(), 4);

        let FunBodyItem::Break(plain) = &fun.body[0] else {
            panic!("expected a break");
        };
        let FunBodyItem::Break(labeled) = &fun.body[2] else {
            panic!("expected a break");
        };

        assert!(plain.name.is_none());
        assert_eq!(labeled.name.as_deref(), Some("outer"));

        let FunBodyItem::Next(inner) = &fun.body[3] else {
            panic!("expected a next");
        };

        assert_eq!(inner.name.as_deref(), Some("inner"));
    });
}

#[test]
fn test_return_with_and_without_expression() {
    with_fun_body("return; return x + 1;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Return(empty) = &fun.body[0] else {
            panic!("expected a return");
        };
        let FunBodyItem::Return(full) = &fun.body[1] else {
            panic!("expected a return");
        };

        assert!(empty.expr.is_none());
        assert_eq!(lexemes(full.expr.expect("an expression")), vec!["x", "+", "1"]);
    });
}

#[test]
fn test_raise_await_and_drop_statements() {
    with_fun_body("raise NotFound; await future; drop handle;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert!(matches!(fun.body[0], FunBodyItem::Raise(_)));
        assert!(matches!(fun.body[1], FunBodyItem::Await(_)));
        assert!(matches!(fun.body[2], FunBodyItem::Drop(_)));
    });
}

#[test]
fn test_asm_with_parameters() {
    with_fun_body("asm (\"mov\", a, b);", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Asm(stmt) = &fun.body[0] else {
            panic!("expected an asm statement");
        };

        assert_eq!(stmt.params.len(), 3);
    });
}

#[test]
fn test_macro_expansion_as_a_statement() {
    with_fun_body("log!(x, 2);", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::MacroExpand(expand) = &fun.body[0] else {
            panic!("expected a macro expansion");
        };

        assert_eq!(expand.name, "log");
        assert_eq!(expand.args.as_ref().map(Vec::len), Some(2));
    });
}

// ============================================================================
// Defer
// ============================================================================

#[test]
fn test_defer_wraps_one_item() {
    with_fun_body("defer close(file);", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Defer(stmt) = &fun.body[0] else {
            panic!("expected a defer statement");
        };

        assert!(matches!(*stmt.item, FunBodyItem::Exprs(_)));
    });
}

#[test]
fn test_superfluous_semicolon_after_deferred_block_warns() {
    with_fun_body("defer begin close(file); end;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let warning = reporter
            .diagnostics()
            .iter()
            .find(|d| d.code == DiagnosticCode::UnusedSemicolon)
            .expect("a warning was emitted");

        assert_eq!(warning.level, DiagnosticLevel::Warning);
        assert!(matches!(fun.body[0], FunBodyItem::Defer(_)));
    });
}

// ============================================================================
// Lambdas
// ============================================================================

#[test]
fn test_lambda_with_immediate_invocation() {
    with_fun_body("fun double(x I32) I32 -> return x * 2; \\ (21);", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Lambda(lambda) = &fun.body[0] else {
            panic!("expected a lambda");
        };

        assert_eq!(lambda.name.as_deref(), Some("double"));
        assert_eq!(lambda.params.as_ref().map(Vec::len), Some(1));
        assert_eq!(lexemes(lambda.return_data_type), vec!["I32"]);
        assert!(matches!(*lambda.item, FunBodyItem::Return(_)));
        assert_eq!(lambda.call_params.as_ref().map(Vec::len), Some(1));
    });
}

#[test]
fn test_anonymous_lambda_without_invocation() {
    with_fun_body("fun (x I32) -> return x;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let FunBodyItem::Lambda(lambda) = &fun.body[0] else {
            panic!("expected a lambda");
        };

        assert!(lambda.name.is_none());
        assert!(lambda.call_params.is_none());
    });
}

#[test]
fn test_lambda_missing_arrow_is_reported() {
    with_fun_body("fun broken(x I32) I32 return x;", |_, reporter| {
        assert!(reporter.has_errors());
    });
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_stray_semicolon_warns_but_does_not_fail() {
    with_fun_body("x := 1; ; y := 2;", |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);
        assert!(
            reporter.diagnostics().iter().any(|d| d.code == DiagnosticCode::UnusedSemicolon)
        );
        assert_eq!(fun.body.len(), 2);
    });
}

#[test]
fn test_body_item_locations_are_ordered() {
    let body = "x := 1; if x > 0 do y := 2; end while x do z := 3; end";

    with_fun_body(body, |fun, reporter| {
        assert_eq!(reporter.error_count(), 0);

        let mut previous_end = 0;

        for item in &fun.body {
            let location = item.location();

            assert!(location.start.offset >= previous_end);
            assert!(location.end.offset >= location.start.offset);
            previous_end = location.start.offset;
        }
    });
}
