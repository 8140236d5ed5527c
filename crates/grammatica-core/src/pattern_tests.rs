use crate::{PatternKind, Position, Token, TokenId, TokenPattern};

#[test]
fn flags_and_default_messages() {
    let plain = TokenPattern::string(1, "CAT", "cat");
    assert!(!plain.is_error());
    assert!(!plain.is_ignore());

    let ws = TokenPattern::regexp(2, "WS", r"\s+").ignore();
    assert!(ws.is_ignore());
    assert_eq!(ws.ignore_message(), Some("ignored token"));

    let bad = TokenPattern::string(3, "BAD", "$$").error();
    assert!(bad.is_error());
    assert_eq!(bad.error_message(), Some("unrecognized token"));

    let custom = TokenPattern::string(4, "TAB", "\t").error_with("tabs are not allowed");
    assert_eq!(custom.error_message(), Some("tabs are not allowed"));
}

#[test]
fn descriptions() {
    assert_eq!(TokenPattern::string(1, "CAT", "cat").description(), "\"cat\"");
    let ident = TokenPattern::regexp(2, "IDENT", "[a-z]+");
    assert_eq!(ident.description(), "<IDENT>");
    assert_eq!(ident.kind(), PatternKind::Regexp);
    assert_eq!(ident.id(), TokenId(2));
}

#[test]
fn position_advance() {
    let mut pos = Position::START;
    for c in "ab\ncé".chars() {
        pos.advance(c);
    }
    assert_eq!(pos, Position::new(2, 3, 6));
}

#[test]
fn short_image_truncates_and_escapes() {
    let tok = Token::new(TokenId(1), "a\nb", Position::START);
    assert_eq!(tok.short_image(), "\"a\\nb\"");

    let long = Token::new(TokenId(1), "x".repeat(30), Position::START);
    assert_eq!(long.short_image(), format!("\"{}...\"", "x".repeat(25)));
}

#[test]
fn token_serializes_to_json() {
    let tok = Token::new(TokenId(7), "cat", Position::new(1, 3, 2));
    let json = serde_json::to_string(&tok).unwrap();
    assert_eq!(
        json,
        r#"{"id":7,"image":"cat","position":{"line":1,"column":3,"offset":2}}"#
    );
}
