use std::io::BufReader;

use grammatica_core::{ParseErrorKind, Position, Token, TokenId, TokenPattern};
use indoc::indoc;
use proptest::prelude::*;

use crate::Lexicon;

const WORD: u32 = 1;
const NUMBER: u32 = 2;
const PLUS: u32 = 3;

fn lexicon() -> Lexicon {
    Lexicon::new(
        [
            TokenPattern::regexp(WORD, "WORD", "[a-z]+"),
            TokenPattern::regexp(NUMBER, "NUMBER", "[0-9]+"),
            TokenPattern::string(PLUS, "PLUS", "+"),
            TokenPattern::regexp(10, "WHITESPACE", r"[ \t\n\r]+").ignore(),
            TokenPattern::string(11, "BANG", "!").error(),
        ],
        false,
    )
    .unwrap()
}

fn images(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.image.as_str()).collect()
}

#[test]
fn single_token_between_whitespace() {
    let lexicon = lexicon();
    let tokens = lexicon.tokenize_str("  cat  ").unwrap();

    assert_eq!(
        tokens,
        vec![Token::new(TokenId(WORD), "cat", Position::new(1, 3, 2))]
    );
}

#[test]
fn unexpected_character() {
    let lexicon = lexicon();
    let err = lexicon.tokenize_str("@").unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('@'));
    insta::assert_snapshot!(err, @"unexpected character '@', on line: 1 column: 1");
}

#[test]
fn resumes_after_bad_character() {
    let lexicon = lexicon();
    let mut tokenizer = lexicon.tokenizer("a@b".as_bytes());

    assert_eq!(tokenizer.next().unwrap().unwrap().image, "a");
    let err = tokenizer.next().unwrap_err();
    assert_eq!(err.column(), Some(2));
    let b = tokenizer.next().unwrap().unwrap();
    assert_eq!((b.image.as_str(), b.column()), ("b", 3));
    assert_eq!(tokenizer.next().unwrap(), None);
}

#[test]
fn error_pattern() {
    let lexicon = lexicon();
    let err = lexicon.tokenize_str("x !").unwrap_err();

    insta::assert_snapshot!(err, @r#"unrecognized token: "!", on line: 1 column: 3"#);
}

#[test]
fn positions_span_lines() {
    let lexicon = lexicon();
    let input = indoc! {"
        sum
          1 + 22
    "};
    let tokens = lexicon.tokenize_str(input).unwrap();

    let positions: Vec<(&str, u32, u32, usize)> = tokens
        .iter()
        .map(|t| (t.image.as_str(), t.line(), t.column(), t.position.offset))
        .collect();
    assert_eq!(
        positions,
        vec![
            ("sum", 1, 1, 0),
            ("1", 2, 3, 6),
            ("+", 2, 5, 8),
            ("22", 2, 7, 10),
        ]
    );
}

#[test]
fn position_tracks_consumed_input() {
    let lexicon = lexicon();
    let mut tokenizer = lexicon.tokenizer("ab \n".as_bytes());
    tokenizer.next().unwrap();
    assert_eq!(tokenizer.position(), Position::new(1, 3, 2));

    assert_eq!(tokenizer.next().unwrap(), None);
    assert_eq!(tokenizer.position(), Position::new(2, 1, 4));
}

#[test]
fn reset_starts_over() {
    let lexicon = lexicon();
    let mut tokenizer = lexicon.tokenizer("one two".as_bytes());
    tokenizer.next().unwrap();

    tokenizer.reset("three".as_bytes());
    let token = tokenizer.next().unwrap().unwrap();
    assert_eq!(token.image, "three");
    assert_eq!(token.position, Position::START);
}

#[test]
fn case_insensitive_literals() {
    let lexicon = Lexicon::new(
        [
            TokenPattern::string(1, "SELECT", "select"),
            TokenPattern::regexp(2, "WS", " +").ignore(),
        ],
        true,
    )
    .unwrap();
    let tokens = lexicon.tokenize_str("SeLeCt select SELECT").unwrap();

    assert_eq!(images(&tokens), vec!["SeLeCt", "select", "SELECT"]);
    assert!(tokens.iter().all(|t| t.id == TokenId(1)));
}

#[test]
fn small_read_buffer() {
    let lexicon = lexicon();
    let input = "alpha + beta\n".repeat(50);
    let reader = BufReader::with_capacity(3, input.as_bytes());
    let tokens = lexicon.tokenizer(reader).tokenize_all().unwrap();

    assert_eq!(tokens.len(), 150);
    let last = &tokens[149];
    assert_eq!((last.image.as_str(), last.line(), last.column()), ("beta", 50, 9));
}

#[test]
fn invalid_utf8_is_io_error() {
    let lexicon = lexicon();
    let bytes: &[u8] = &[b'a', 0xff, b'\n'];
    let mut tokenizer = lexicon.tokenizer(bytes);

    let err = tokenizer.next().unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::Io(_)));
    assert!(!err.is_recoverable());
    assert_eq!(tokenizer.next().unwrap(), None);
}

proptest! {
    #[test]
    fn words_match_whitespace_split(input in "[a-z ]{0,40}") {
        let lexicon = lexicon();
        let tokens = lexicon.tokenize_str(&input).unwrap();
        let expected: Vec<&str> = input.split_whitespace().collect();
        prop_assert_eq!(images(&tokens), expected);
    }
}
