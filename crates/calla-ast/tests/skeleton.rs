//! Tests for the preparse skeleton value types.

use calla_ast::info::PreparseInfo;
use calla_ast::nodes::{
    Constant,
    ConstantInfo,
    Decl,
    ExprsItem,
    FunBodyItem,
    Import,
    ReturnStmt,
    Visibility,
};
use calla_ast::token::{MacroTokens, Token, TokenKind};
use calla_source::types::{FileID, Location, Position};

fn location(start: usize, end: usize) -> Location {
    Location::new(Position::new(1, start + 1, start), Position::new(1, end + 1, end), FileID::new(1))
}

#[test]
fn test_visibility_defaults_to_private() {
    assert_eq!(Visibility::default(), Visibility::Private);
    assert_eq!(Visibility::Public.as_str(), "pub");
    assert_eq!(Visibility::Static.as_str(), "global");
}

#[test]
fn test_decl_location_reaches_through_every_variant() {
    let tokens = vec![Token::new(TokenKind::LiteralInt10("1".to_string()), location(9, 10))];
    let constant = ConstantInfo::new(
        "x".to_string(),
        &tokens,
        &[],
        Visibility::Private,
        location(0, 11),
    );
    let decl = Decl::Constant(Constant::Simple(constant));

    assert_eq!(decl.location(), location(0, 11));
    assert!(decl.location().covers(&tokens[0].location));
}

#[test]
fn test_fun_body_items_know_their_block_shape() {
    let return_stmt =
        FunBodyItem::Return(ReturnStmt { expr: None, location: location(0, 7) });
    let exprs = FunBodyItem::Exprs(ExprsItem::new(&[], location(0, 3)));

    assert!(!return_stmt.is_block_shaped());
    assert!(!exprs.is_block_shaped());
    assert_eq!(return_stmt.location(), location(0, 7));
}

#[test]
fn test_preparse_info_counts_both_visibilities() {
    let mut info = PreparseInfo::new();

    info.private_imports.push(Import::new("std.io".to_string(), location(0, 16)));
    info.public_imports
        .push(Import::new("std.os".to_string(), location(17, 33)).with_as_name("os".to_string()));

    assert_eq!(info.import_count(), 2);
    assert_eq!(info.macro_count(), 0);
    assert_eq!(info.public_imports[0].as_name.as_deref(), Some("os"));
}

#[test]
fn test_macro_tokens_iterate_terminator_last() {
    let body =
        vec![Token::new(TokenKind::Identifier("x".to_string()), location(10, 11))];
    let tokens = MacroTokens::new(&body, Token::new(TokenKind::Eof, location(12, 12)));

    let kinds: Vec<_> = tokens.iter().map(|token| token.kind.clone()).collect();

    assert_eq!(kinds.len(), 2);
    assert!(kinds[1].is_eof());
    assert!(!tokens.is_empty() || tokens.len() == 1);
}
