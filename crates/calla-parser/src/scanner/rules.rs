//! Character classes and the keyword table.

use std::sync::LazyLock;

use calla_ast::token::TokenKind;
use rustc_hash::FxHashMap;

/// The keyword table, keyed by lexeme.
static KEYWORDS: LazyLock<FxHashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut table = FxHashMap::default();
    let entries = [
        ("alias", TokenKind::Alias),
        ("and", TokenKind::And),
        ("as", TokenKind::As),
        ("asm", TokenKind::Asm),
        ("async", TokenKind::Async),
        ("await", TokenKind::Await),
        ("begin", TokenKind::Begin),
        ("break", TokenKind::Break),
        ("cast", TokenKind::Cast),
        ("catch", TokenKind::Catch),
        ("class", TokenKind::Class),
        ("comptime", TokenKind::Comptime),
        ("do", TokenKind::Do),
        ("drop", TokenKind::Drop),
        ("elif", TokenKind::Elif),
        ("else", TokenKind::Else),
        ("end", TokenKind::End),
        ("enum", TokenKind::Enum),
        ("error", TokenKind::Error),
        ("false", TokenKind::False),
        ("for", TokenKind::For),
        ("fun", TokenKind::Fun),
        ("get", TokenKind::Get),
        ("global", TokenKind::Global),
        ("if", TokenKind::If),
        ("impl", TokenKind::Impl),
        ("import", TokenKind::Import),
        ("in", TokenKind::In),
        ("include", TokenKind::Include),
        ("inherit", TokenKind::Inherit),
        ("is", TokenKind::Is),
        ("lib", TokenKind::Lib),
        ("macro", TokenKind::Macro),
        ("match", TokenKind::Match),
        ("module", TokenKind::Module),
        ("mut", TokenKind::Mut),
        ("next", TokenKind::Next),
        ("nil", TokenKind::Nil),
        ("none", TokenKind::None),
        ("not", TokenKind::Not),
        ("object", TokenKind::Object),
        ("Object", TokenKind::ObjectUpper),
        ("or", TokenKind::Or),
        ("package", TokenKind::Package),
        ("pub", TokenKind::Pub),
        ("raise", TokenKind::Raise),
        ("record", TokenKind::Record),
        ("ref", TokenKind::Ref),
        ("req", TokenKind::Req),
        ("return", TokenKind::Return),
        ("self", TokenKind::SelfLower),
        ("Self", TokenKind::SelfUpper),
        ("set", TokenKind::Set),
        ("test", TokenKind::Test),
        ("trace", TokenKind::Trace),
        ("trait", TokenKind::Trait),
        ("true", TokenKind::True),
        ("try", TokenKind::Try),
        ("type", TokenKind::Type),
        ("undef", TokenKind::Undef),
        ("unsafe", TokenKind::Unsafe),
        ("use", TokenKind::Use),
        ("val", TokenKind::Val),
        ("when", TokenKind::When),
        ("while", TokenKind::While),
        ("xor", TokenKind::Xor),
    ];

    for (lexeme, kind) in entries {
        drop(table.insert(lexeme, kind));
    }

    table
});

/// Looks an identifier lexeme up in the keyword table.
#[must_use]
pub fn keyword(lexeme: &str) -> Option<TokenKind> { KEYWORDS.get(lexeme).cloned() }

/// Determines if a byte can be the start of an identifier.
#[inline]
#[must_use]
pub const fn is_id_start(byte: u8) -> bool { byte == b'_' || byte.is_ascii_alphabetic() }

/// Determines if a byte can be part of an identifier.
#[inline]
#[must_use]
pub const fn is_id_continue(byte: u8) -> bool { byte == b'_' || byte.is_ascii_alphanumeric() }

/// Determines if a byte is a hexadecimal digit or a digit separator.
#[inline]
#[must_use]
pub const fn is_hex_digit(byte: u8) -> bool { byte == b'_' || byte.is_ascii_hexdigit() }

/// Determines if a byte is an octal digit or a digit separator.
#[inline]
#[must_use]
pub const fn is_oct_digit(byte: u8) -> bool { byte == b'_' || matches!(byte, b'0'..=b'7') }

/// Determines if a byte is a binary digit or a digit separator.
#[inline]
#[must_use]
pub const fn is_bin_digit(byte: u8) -> bool { byte == b'_' || matches!(byte, b'0' | b'1') }

/// Determines if a byte is inter-token whitespace.
#[inline]
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(keyword("object"), Some(TokenKind::Object));
        assert_eq!(keyword("Object"), Some(TokenKind::ObjectUpper));
        assert_eq!(keyword("OBJECT"), None);
        assert_eq!(keyword("self"), Some(TokenKind::SelfLower));
        assert_eq!(keyword("Self"), Some(TokenKind::SelfUpper));
    }

    #[test]
    fn test_non_keywords_miss() {
        assert_eq!(keyword("value"), None);
        assert_eq!(keyword(""), None);
    }

    #[test]
    fn test_digit_classes_accept_separators() {
        assert!(is_hex_digit(b'f') && is_hex_digit(b'F') && is_hex_digit(b'_'));
        assert!(is_oct_digit(b'7') && !is_oct_digit(b'8'));
        assert!(is_bin_digit(b'1') && !is_bin_digit(b'2'));
    }
}
