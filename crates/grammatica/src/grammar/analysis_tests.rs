use grammatica_core::{GrammarError, TokenPattern};

use super::{GrammarBuilder, Occurs};

const A: u32 = 1;
const B: u32 = 2;
const C: u32 = 3;
const D: u32 = 4;

fn tokens() -> GrammarBuilder {
    GrammarBuilder::new()
        .token_pattern(TokenPattern::string(A, "A", "a"))
        .token_pattern(TokenPattern::string(B, "B", "b"))
        .token_pattern(TokenPattern::string(C, "C", "c"))
        .token_pattern(TokenPattern::string(D, "D", "d"))
}

#[test]
fn two_tokens_of_lookahead() {
    let grammar = tokens()
        .production(1, "P", |p| {
            p.alternative(|a| a.token(A, Occurs::ONCE).token(B, Occurs::ONCE))
                .alternative(|a| a.token(A, Occurs::ONCE).token(C, Occurs::ONCE))
        })
        .build()
        .unwrap();

    insta::assert_snapshot!(grammar.describe(), @r#"
    P [k=2]
      = "a" "b"
      | "a" "c"
    "#);
}

#[test]
fn identical_alternatives() {
    let err = tokens()
        .production(1, "P", |p| {
            p.alternative(|a| a.token(A, Occurs::ONCE))
                .alternative(|a| a.token(A, Occurs::ONCE))
        })
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @r#"inherent ambiguity in production pattern P: conflicting look-ahead "a" <EOF>"#);
}

#[test]
fn lookahead_limit() {
    let err = tokens()
        .production(1, "P", |p| {
            p.alternative(|a| a.token(A, Occurs::ONCE).token(B, Occurs::ONCE).token(C, Occurs::ONCE))
                .alternative(|a| a.token(A, Occurs::ONCE).token(B, Occurs::ONCE).token(D, Occurs::ONCE))
        })
        .max_lookahead(2)
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @r#"inherent ambiguity in production pattern P: conflicting look-ahead "a" "b""#);
}

#[test]
fn ambiguous_repetition() {
    let err = tokens()
        .production(1, "P", |p| {
            p.alternative(|a| {
                a.token(A, Occurs::ZERO_OR_MORE)
                    .token(A, Occurs::ZERO_OR_MORE)
                    .token(B, Occurs::ONCE)
            })
        })
        .build()
        .unwrap_err();

    assert!(matches!(err, GrammarError::InherentAmbiguity { ref name, .. } if name == "P"), "{err}");
}

#[test]
fn repetition_resolved_with_two_tokens() {
    let grammar = tokens()
        .production(1, "P", |p| p.alternative(|a| a.token(A, Occurs::ZERO_OR_MORE).token(A, Occurs::ONCE)))
        .build()
        .unwrap();

    assert!(grammar.parse_str("aaa").is_ok());
    assert!(grammar.describe().contains("P#1*[k=2]"));
}

#[test]
fn direct_left_recursion() {
    let err = tokens()
        .production(1, "P", |p| p.alternative(|a| a.production(1, Occurs::ONCE)))
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @"infinite loop found in production pattern P (P -> P)");
}

#[test]
fn indirect_left_recursion() {
    let err = tokens()
        .production(1, "P", |p| p.alternative(|a| a.production(2, Occurs::ONCE).token(A, Occurs::ONCE)))
        .production(2, "Q", |p| {
            p.alternative(|a| a.production(1, Occurs::ONCE).token(B, Occurs::ONCE))
                .alternative(|a| a.token(C, Occurs::ONCE))
        })
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @"infinite loop found in production pattern P (P -> Q -> P)");
}

#[test]
fn left_recursion_behind_optional() {
    let err = tokens()
        .production(1, "P", |p| {
            p.alternative(|a| a.token(A, Occurs::OPTIONAL).production(1, Occurs::ONCE).token(B, Occurs::ONCE))
                .alternative(|a| a.token(C, Occurs::ONCE))
        })
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @"infinite loop found in production pattern P (P -> P)");
}

#[test]
fn non_productive() {
    let err = tokens()
        .production(1, "P", |p| p.alternative(|a| a.token(A, Occurs::ONCE).production(1, Occurs::ONCE)))
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @"invalid production pattern P: every alternative recurses without end");
}

#[test]
fn nullable_loop_body() {
    let err = tokens()
        .production(1, "P", |p| {
            p.alternative(|a| {
                a.group(Occurs::ZERO_OR_MORE, |g| g.alternative(|a| a.token(A, Occurs::OPTIONAL)))
                    .token(B, Occurs::ONCE)
            })
        })
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @"infinite loop found in production pattern P");
}

#[test]
fn right_recursion_is_fine() {
    let grammar = tokens()
        .production(1, "P", |p| {
            p.alternative(|a| a.token(A, Occurs::ONCE).production(1, Occurs::ONCE))
                .alternative(|a| a.token(B, Occurs::ONCE))
        })
        .build()
        .unwrap();

    assert!(grammar.parse_str("aab").is_ok());
}

#[test]
fn follow_set_decides_optional() {
    // `Q = "a"?` inside `P = Q "a" "b"`: one "a" is ambiguous at k=1 only.
    let grammar = tokens()
        .production(1, "P", |p| p.alternative(|a| a.production(2, Occurs::ONCE).token(A, Occurs::ONCE).token(B, Occurs::ONCE)))
        .production(2, "Q", |p| p.alternative(|a| a.token(A, Occurs::OPTIONAL)))
        .build()
        .unwrap();

    assert!(grammar.describe().contains("Q#1?[k=2]"));
    assert!(grammar.parse_str("ab").is_ok());
    assert!(grammar.parse_str("aab").is_ok());
}

#[test]
fn unreachable_production_is_analyzed() {
    let err = tokens()
        .production(1, "S", |p| p.alternative(|a| a.token(B, Occurs::ONCE)))
        .production(2, "U", |p| {
            p.alternative(|a| a.token(A, Occurs::ONCE))
                .alternative(|a| a.token(A, Occurs::ONCE))
        })
        .build()
        .unwrap_err();

    insta::assert_snapshot!(err, @r#"inherent ambiguity in production pattern U: conflicting look-ahead "a" <EOF>"#);
}

#[test]
fn unreachable_production_ends_at_eof() {
    // `U` is never used, so only end of input may follow it.
    let grammar = tokens()
        .production(1, "S", |p| p.alternative(|a| a.token(B, Occurs::ONCE)))
        .production(2, "U", |p| {
            p.alternative(|a| a.token(A, Occurs::ONCE))
                .alternative(|a| a.token(A, Occurs::ONCE).token(C, Occurs::ONCE))
        })
        .build()
        .unwrap();

    assert!(grammar.describe().contains("U [k=2]"));
}

#[test]
fn three_tokens_over_many_followers() {
    const FIRST_WORD: u32 = 100;
    const WORDS: u32 = 40;

    let mut builder = tokens().token_pattern(TokenPattern::regexp(50, "WS", " +").ignore());
    for i in 0..WORDS {
        builder = builder.token_pattern(TokenPattern::string(
            FIRST_WORD + i,
            format!("W{i}"),
            format!("w{i}"),
        ));
    }

    let grammar = builder
        .production(1, "Start", |p| {
            p.alternative(|a| a.production(2, Occurs::ONCE).production(3, Occurs::ZERO_OR_MORE))
        })
        .production(2, "Tail", |p| {
            p.alternative(|a| a.token(A, Occurs::ONCE).token(B, Occurs::ONCE).token(C, Occurs::ONCE))
                .alternative(|a| a.token(A, Occurs::ONCE).token(B, Occurs::ONCE))
        })
        .production(3, "Any", |p| {
            (0..WORDS).fold(p, |p, i| p.alternative(|a| a.token(FIRST_WORD + i, Occurs::ONCE)))
        })
        .max_lookahead(3)
        .build()
        .unwrap();

    assert!(grammar.describe().contains("Tail [k=3]"));
    assert!(grammar.parse_str("a b w7 w39").is_ok());
    assert!(grammar.parse_str("a b c w1").is_ok());
    assert!(grammar.parse_str("a b").is_ok());
}
