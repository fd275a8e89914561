//! Tests for the scanner.

use std::sync::Arc;

use calla_ast::token::{Token, TokenKind};
use calla_parser::diagnostics::{DiagnosticCode, DiagnosticReporter};
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

fn kinds(tokens: &[Token]) -> Vec<&TokenKind> { tokens.iter().map(Token::kind).collect() }

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_empty_source_yields_only_eof() {
    let (_, tokens, reporter) = scan("");

    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].kind.is_eof());
    assert_eq!(reporter.error_count(), 0);
}

#[test]
fn test_whitespace_only_source_yields_only_eof() {
    let (_, tokens, reporter) = scan("  \t\r\n  \n");

    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].kind.is_eof());
    assert_eq!(reporter.error_count(), 0);
}

#[test]
fn test_simple_declaration_tokens() {
    let (_, tokens, reporter) = scan("val x I32 := 42;");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(
        kinds(&tokens),
        vec![
            &TokenKind::Val,
            &TokenKind::Identifier("x".to_string()),
            &TokenKind::Identifier("I32".to_string()),
            &TokenKind::ColonEq,
            &TokenKind::LiteralInt10("42".to_string()),
            &TokenKind::Semicolon,
            &TokenKind::Eof,
        ]
    );
}

#[test]
fn test_source_ending_mid_identifier() {
    let (_, tokens, reporter) = scan("val abc");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[1].kind, TokenKind::Identifier("abc".to_string()));
    assert!(tokens[2].kind.is_eof());
}

#[test]
fn test_exactly_one_eof_and_it_is_last() {
    let (_, tokens, _) = scan("fun f = return 1; end");

    let eof_count = tokens.iter().filter(|t| t.kind.is_eof()).count();

    assert_eq!(eof_count, 1);
    assert!(tokens.last().expect("vector is never empty").kind.is_eof());
}

#[test]
fn test_locations_are_monotonic_and_closed() {
    let (_, tokens, _) = scan("fun add(a I32) I32 =\n    return a;\nend");

    let mut previous_start = 0;

    for token in &tokens {
        assert!(token.location.end.offset >= token.location.start.offset);
        assert!(token.location.start.offset >= previous_start);
        previous_start = token.location.start.offset;
    }
}

// ============================================================================
// Keywords and identifiers
// ============================================================================

#[test]
fn test_keywords_and_case_sensitive_forms() {
    let (_, tokens, _) = scan("object Object self Self objects");

    assert_eq!(
        kinds(&tokens),
        vec![
            &TokenKind::Object,
            &TokenKind::ObjectUpper,
            &TokenKind::SelfLower,
            &TokenKind::SelfUpper,
            &TokenKind::Identifier("objects".to_string()),
            &TokenKind::Eof,
        ]
    );
}

#[test]
fn test_not_eq_and_xor_eq_are_joined() {
    let (_, tokens, _) = scan("a not= b xor= c not d");

    assert_eq!(tokens[1].kind, TokenKind::NotEq);
    assert_eq!(tokens[3].kind, TokenKind::HatEq);
    assert_eq!(tokens[5].kind, TokenKind::Not);
}

#[test]
fn test_dollar_and_string_form_identifiers() {
    let (_, tokens, _) = scan("$name `weird name` $");

    assert_eq!(tokens[0].kind, TokenKind::IdentifierDollar("name".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::IdentifierString("weird name".to_string()));
    assert_eq!(tokens[2].kind, TokenKind::Dollar);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_maximal_munch_operator_recognition() {
    let (_, tokens, reporter) = scan("<<= << <= <- < >>= >> >= > ++= ++ += + --= -- -= -> -");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(
        kinds(&tokens),
        vec![
            &TokenKind::LShiftLShiftEq,
            &TokenKind::LShiftLShift,
            &TokenKind::LShiftEq,
            &TokenKind::InverseArrow,
            &TokenKind::LShift,
            &TokenKind::RShiftRShiftEq,
            &TokenKind::RShiftRShift,
            &TokenKind::RShiftEq,
            &TokenKind::RShift,
            &TokenKind::PlusPlusEq,
            &TokenKind::PlusPlus,
            &TokenKind::PlusEq,
            &TokenKind::Plus,
            &TokenKind::MinusMinusEq,
            &TokenKind::MinusMinus,
            &TokenKind::MinusEq,
            &TokenKind::Arrow,
            &TokenKind::Minus,
            &TokenKind::Eof,
        ]
    );
}

#[test]
fn test_colon_family() {
    let (_, tokens, _) = scan(":: := :> :");

    assert_eq!(
        kinds(&tokens),
        vec![
            &TokenKind::ColonColon,
            &TokenKind::ColonEq,
            &TokenKind::ColonRShift,
            &TokenKind::Colon,
            &TokenKind::Eof,
        ]
    );
}

#[test]
fn test_dot_family() {
    let (_, tokens, _) = scan("... .. .? .* .");

    assert_eq!(
        kinds(&tokens),
        vec![
            &TokenKind::DotDotDot,
            &TokenKind::DotDot,
            &TokenKind::DotInterrogation,
            &TokenKind::DotStar,
            &TokenKind::Dot,
            &TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_line_and_block_comments_are_discarded() {
    let (_, tokens, reporter) = scan("a // one\nb /* two\nlines */ c");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(
        kinds(&tokens),
        vec![
            &TokenKind::Identifier("a".to_string()),
            &TokenKind::Identifier("b".to_string()),
            &TokenKind::Identifier("c".to_string()),
            &TokenKind::Eof,
        ]
    );
}

#[test]
fn test_doc_comments_carry_their_text() {
    let (_, tokens, _) = scan("/// the docs\nval x I32 := 1;");

    assert_eq!(tokens[0].kind, TokenKind::CommentDoc(" the docs".to_string()));
}

#[test]
fn test_unclosed_block_comment_is_reported() {
    let (_, _, reporter) = scan("a /* never closed");

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::UnclosedCommentBlock);
}

// ============================================================================
// Char and string literals
// ============================================================================

#[test]
fn test_char_literals_translate_escapes() {
    let (_, tokens, reporter) = scan(r"'a' '\n' '\t' '\\' '\''");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralChar('a'));
    assert_eq!(tokens[1].kind, TokenKind::LiteralChar('\n'));
    assert_eq!(tokens[2].kind, TokenKind::LiteralChar('\t'));
    assert_eq!(tokens[3].kind, TokenKind::LiteralChar('\\'));
    assert_eq!(tokens[4].kind, TokenKind::LiteralChar('\''));
}

#[test]
fn test_empty_char_literal_is_reported() {
    let (_, tokens, reporter) = scan("''");

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::UnclosedCharLiteral);
    assert_eq!(tokens.len(), 1); // only the Eof
}

#[test]
fn test_invalid_escape_is_reported() {
    let (_, _, reporter) = scan(r"'\q'");

    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::InvalidEscape);
}

#[test]
fn test_string_literals_translate_escapes() {
    let (_, tokens, reporter) = scan(r#""hi\tthere\n""#);

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralString("hi\tthere\n".to_string()));
}

#[test]
fn test_unclosed_string_literal_is_reported() {
    let (_, _, reporter) = scan("\"never closed");

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::UnclosedStringLiteral);
}

#[test]
fn test_bit_literals() {
    let (_, tokens, reporter) = scan("b'x' b\"bits\" bare");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralBitChar(b'x'));
    assert_eq!(tokens[1].kind, TokenKind::LiteralBitString("bits".to_string()));
    assert_eq!(tokens[2].kind, TokenKind::Identifier("bare".to_string()));
}

// ============================================================================
// Numeric literals
// ============================================================================

#[test]
fn test_zero_in_every_base() {
    let (_, tokens, reporter) = scan("0 0000 0x0 0o0 0b0");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralInt10("0".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::LiteralInt10("0".to_string()));
    assert_eq!(tokens[2].kind, TokenKind::LiteralInt16("0".to_string()));
    assert_eq!(tokens[3].kind, TokenKind::LiteralInt8("0".to_string()));
    assert_eq!(tokens[4].kind, TokenKind::LiteralInt2("0".to_string()));
}

#[test]
fn test_leading_zeros_are_skipped_but_value_kept() {
    let (_, tokens, _) = scan("0123");

    assert_eq!(tokens[0].kind, TokenKind::LiteralInt10("123".to_string()));
}

#[test]
fn test_underscores_are_ignored() {
    let (_, tokens, _) = scan("1_000_000 0xdead_beef");

    assert_eq!(tokens[0].kind, TokenKind::LiteralInt10("1000000".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::LiteralInt16("deadbeef".to_string()));
}

#[test]
fn test_float_shapes() {
    let (_, tokens, reporter) = scan("1. 1e3 1E+3 1.5e-2");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralFloat("1.".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::LiteralFloat("1e3".to_string()));
    assert_eq!(tokens[2].kind, TokenKind::LiteralFloat("1E+3".to_string()));
    assert_eq!(tokens[3].kind, TokenKind::LiteralFloat("1.5e-2".to_string()));
}

#[test]
fn test_range_operator_is_not_a_float() {
    let (_, tokens, reporter) = scan("1..2");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralInt10("1".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::DotDot);
    assert_eq!(tokens[2].kind, TokenKind::LiteralInt10("2".to_string()));
}

#[test]
fn test_two_decimal_points_are_reported() {
    let (_, _, reporter) = scan("1.2.3");

    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::InvalidFloatLiteral);
}

#[test]
fn test_two_exponents_are_reported() {
    let (_, _, reporter) = scan("1e2e3");

    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::InvalidFloatLiteral);
}

#[test]
fn test_empty_digit_sequences_are_reported() {
    let (_, _, reporter) = scan("0x 0o 0b");

    let codes: Vec<_> = reporter.diagnostics().iter().map(|d| d.code).collect();

    assert_eq!(
        codes,
        vec![
            DiagnosticCode::InvalidHexadecimalLiteral,
            DiagnosticCode::InvalidOctalLiteral,
            DiagnosticCode::InvalidBinLiteral,
        ]
    );
}

// ============================================================================
// Typed suffixes
// ============================================================================

#[test]
fn test_typed_suffixes_carry_parsed_values() {
    let (_, tokens, reporter) = scan("42I32 7U8 1Iz 2Uz 3.25F64 1F32 0xffU16");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralSuffixInt32(42));
    assert_eq!(tokens[1].kind, TokenKind::LiteralSuffixUint8(7));
    assert_eq!(tokens[2].kind, TokenKind::LiteralSuffixIsize(1));
    assert_eq!(tokens[3].kind, TokenKind::LiteralSuffixUsize(2));
    assert_eq!(tokens[4].kind, TokenKind::LiteralSuffixFloat64(3.25));
    assert_eq!(tokens[5].kind, TokenKind::LiteralSuffixFloat32(1.0));
    assert_eq!(tokens[6].kind, TokenKind::LiteralSuffixUint16(0xff));
}

#[test]
fn test_out_of_range_suffix_drops_the_literal() {
    let (_, tokens, reporter) = scan("0xFFI8");

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::Int8OutOfRange);
    // No token for the literal; only the Eof remains
    assert_eq!(tokens.len(), 1);
}

#[test]
fn test_every_out_of_range_code_fires() {
    let cases = [
        ("300I8", DiagnosticCode::Int8OutOfRange),
        ("40000I16", DiagnosticCode::Int16OutOfRange),
        ("3000000000I32", DiagnosticCode::Int32OutOfRange),
        ("10000000000000000000I64", DiagnosticCode::Int64OutOfRange),
        ("300U8", DiagnosticCode::Uint8OutOfRange),
        ("70000U16", DiagnosticCode::Uint16OutOfRange),
        ("5000000000U32", DiagnosticCode::Uint32OutOfRange),
        ("20000000000000000000U64", DiagnosticCode::Uint64OutOfRange),
        ("10000000000000000000Iz", DiagnosticCode::IsizeOutOfRange),
        ("20000000000000000000Uz", DiagnosticCode::UsizeOutOfRange),
    ];

    for (source, code) in cases {
        let (_, _, reporter) = scan(source);

        assert_eq!(reporter.diagnostics()[0].code, code, "for source {source}");
    }
}

#[test]
fn test_integer_suffix_on_float_is_reported() {
    let (_, _, reporter) = scan("3.14I32");

    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::InvalidLiteralSuffix);
}

#[test]
fn test_float_suffix_on_integer_is_accepted() {
    let (_, tokens, reporter) = scan("42F64");

    assert_eq!(reporter.error_count(), 0);
    assert_eq!(tokens[0].kind, TokenKind::LiteralSuffixFloat64(42.0));
}

// ============================================================================
// Bracket balancing
// ============================================================================

#[test]
fn test_every_opener_is_followed_by_its_closer_at_the_same_depth() {
    let (_, tokens, reporter) = scan("f(a[b{c}d]e)");

    assert_eq!(reporter.error_count(), 0);

    let mut stack = Vec::new();

    for token in &tokens {
        match token.kind {
            TokenKind::LParen | TokenKind::LHook | TokenKind::LBrace => {
                stack.push(token.kind.closing_counterpart().expect("opener has a counterpart"));
            }
            TokenKind::RParen | TokenKind::RHook | TokenKind::RBrace => {
                assert_eq!(stack.pop().as_ref(), Some(&token.kind));
            }
            _ => {}
        }
    }

    assert!(stack.is_empty());
}

#[test]
fn test_unclosed_delimiter_is_reported_at_the_opening() {
    let (_, _, reporter) = scan("f(a, b");

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::MismatchedClosingDelimiter);
    // The diagnostic points at the opening parenthesis
    assert_eq!(reporter.diagnostics()[0].location.start.offset, 1);
}

#[test]
fn test_stray_closer_is_reported_with_a_removal_hint() {
    let (_, tokens, reporter) = scan("a ) b");

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.diagnostics()[0].code, DiagnosticCode::MismatchedClosingDelimiter);
    assert!(reporter.diagnostics()[0].help[0].contains("remove"));
    // Scanning continued past the stray closer
    assert_eq!(tokens[1].kind, TokenKind::Identifier("b".to_string()));
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_scanner_never_stops_before_eof() {
    let (_, tokens, reporter) = scan("§ val § x § := 1;");

    assert!(reporter.error_count() > 0);

    for diagnostic in reporter.diagnostics() {
        assert_eq!(diagnostic.code, DiagnosticCode::UnexpectedCharacter);
    }

    // All well-formed tokens survived
    assert!(tokens.iter().any(|t| matches!(t.kind, TokenKind::Val)));
    assert!(tokens.iter().any(|t| matches!(t.kind, TokenKind::ColonEq)));
    assert!(tokens.last().expect("vector is never empty").kind.is_eof());
}
