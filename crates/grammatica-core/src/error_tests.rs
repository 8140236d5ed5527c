use crate::{GrammarError, ParseError, ParseErrorKind, Position};

fn unexpected(expected: &[&str]) -> ParseErrorKind {
    ParseErrorKind::UnexpectedToken {
        found: "\"x\"".to_string(),
        expected: expected.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn fixed_messages() {
    assert_eq!(
        ParseErrorKind::Io("broken pipe".into()).to_string(),
        "I/O error: broken pipe"
    );
    assert_eq!(
        ParseErrorKind::UnexpectedEof.to_string(),
        "unexpected end of file"
    );
    assert_eq!(
        ParseErrorKind::UnexpectedChar('@').to_string(),
        "unexpected character '@'"
    );
}

#[test]
fn expected_list_single() {
    assert_eq!(
        unexpected(&["\"y\""]).to_string(),
        "unexpected token \"x\", expected \"y\""
    );
}

#[test]
fn expected_list_two() {
    assert_eq!(
        unexpected(&["\"a\"", "<ID>"]).to_string(),
        "unexpected token \"x\", expected one of \"a\", or <ID>"
    );
}

#[test]
fn expected_list_three() {
    assert_eq!(
        unexpected(&["A", "B", "C"]).to_string(),
        "unexpected token \"x\", expected one of A, B, or C"
    );
}

#[test]
fn expected_list_empty() {
    assert_eq!(unexpected(&[]).to_string(), "unexpected token \"x\"");
}

#[test]
fn positional_suffix() {
    let err = ParseError::at(ParseErrorKind::UnexpectedChar('@'), Position::new(3, 7, 20));
    assert_eq!(err.to_string(), "unexpected character '@', on line: 3 column: 7");
    assert_eq!(err.message(), "unexpected character '@'");
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.column(), Some(7));
}

#[test]
fn no_position_no_suffix() {
    let err = ParseError::new(ParseErrorKind::UnexpectedEof, None);
    assert_eq!(err.to_string(), "unexpected end of file");
}

#[test]
fn invalid_token_message() {
    let kind = ParseErrorKind::InvalidToken {
        image: "$$".into(),
        message: "unrecognized token".into(),
    };
    assert_eq!(kind.to_string(), "unrecognized token: \"$$\"");
}

#[test]
fn recoverability() {
    let recoverable = |kind| ParseError::new(kind, None).is_recoverable();
    assert!(recoverable(ParseErrorKind::UnexpectedChar('x')));
    assert!(recoverable(unexpected(&["A"])));
    assert!(recoverable(ParseErrorKind::Analysis("bad".into())));
    assert!(!recoverable(ParseErrorKind::UnexpectedEof));
    assert!(!recoverable(ParseErrorKind::Io("x".into())));
    assert!(!recoverable(ParseErrorKind::Internal("x".into())));
}

#[test]
fn grammar_error_messages() {
    let err = GrammarError::InfiniteLoop {
        name: "A".into(),
        cycle: vec![],
    };
    assert_eq!(err.to_string(), "infinite loop found in production pattern A");

    let err = GrammarError::InfiniteLoop {
        name: "A".into(),
        cycle: vec!["A".into(), "B".into(), "A".into()],
    };
    assert_eq!(
        err.to_string(),
        "infinite loop found in production pattern A (A -> B -> A)"
    );

    let err = GrammarError::InherentAmbiguity {
        name: "S".into(),
        conflicts: vec!["\"a\" <EOF>".into()],
    };
    assert_eq!(
        err.to_string(),
        "inherent ambiguity in production pattern S: conflicting look-ahead \"a\" <EOF>"
    );

    let err = GrammarError::invalid_token("WS", "pattern matches the empty string");
    assert_eq!(
        err.to_string(),
        "invalid token pattern WS: pattern matches the empty string"
    );
}

#[test]
fn parse_error_as_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(ParseError::at(
        ParseErrorKind::UnexpectedEof,
        Position::new(2, 4, 9),
    ));
    assert_eq!(err.to_string(), "unexpected end of file, on line: 2 column: 4");
    assert!(err.source().is_none());

    let unpositioned = ParseError::analysis("bad value", None);
    assert_eq!(unpositioned.to_string(), unpositioned.message());
}
