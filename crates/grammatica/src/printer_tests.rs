use indoc::indoc;

use crate::log::ParseLog;
use crate::test_grammars;

fn errors(source: &str) -> ParseLog {
    test_grammars::arithmetic().parse_str(source).unwrap_err()
}

#[test]
fn plain_without_source() {
    let log = errors("1 + + 2 + 3 + 4 * * 5");

    insta::assert_snapshot!(log.printer().render(), @r#"
    unexpected token "+", expected one of "(", or <NUMBER>, on line: 1 column: 5
    unexpected token "*", expected one of "(", or <NUMBER>, on line: 1 column: 19
    "#);
}

#[test]
fn plain_matches_display() {
    let log = errors("1 + * 2");
    let expected: Vec<String> = log.iter().map(ToString::to_string).collect();
    assert_eq!(log.printer().render(), expected.join("\n"));
}

#[test]
fn annotated_source() {
    let source = indoc! {"
        1 +
        * 2
    "};
    let log = errors(source);
    let out = log.printer().source(source).path("calc.txt").render();

    assert!(out.contains("error: unexpected token \"*\""), "{out}");
    assert!(out.contains("calc.txt"), "{out}");
    assert!(out.contains("* 2"), "{out}");
    assert!(out.contains('^'), "{out}");
}

#[test]
fn error_without_position() {
    let log = ParseLog::internal("analyzer discarded the root node");
    let out = log.printer().source("1").render();

    insta::assert_snapshot!(out, @"error: internal error: analyzer discarded the root node");
}

#[test]
fn error_at_end_of_input() {
    let source = "(1";
    let log = errors(source);
    let out = log.printer().source(source).render();

    assert_eq!(log.len(), 1);
    assert!(out.contains("error: unexpected end of file"), "{out}");
}
