//! Grammars shared by the unit tests.

use grammatica_core::TokenPattern;

use crate::grammar::{Grammar, GrammarBuilder, Occurs};

pub mod nested {
    pub const X: u32 = 1;
    pub const Y: u32 = 2;
    pub const A: u32 = 1;
}

/// `A = "x" A | "y"`
pub fn nested() -> Grammar {
    use nested::*;
    GrammarBuilder::new()
        .token_pattern(TokenPattern::string(X, "X", "x"))
        .token_pattern(TokenPattern::string(Y, "Y", "y"))
        .token_pattern(TokenPattern::regexp(10, "WS", r"\s+").ignore())
        .production(A, "A", |p| {
            p.alternative(|a| a.token(X, Occurs::ONCE).production(A, Occurs::ONCE))
                .alternative(|a| a.token(Y, Occurs::ONCE))
        })
        .build()
        .unwrap()
}

pub mod arithmetic {
    pub const ADD: u32 = 1;
    pub const SUB: u32 = 2;
    pub const MUL: u32 = 3;
    pub const DIV: u32 = 4;
    pub const LEFT: u32 = 5;
    pub const RIGHT: u32 = 6;
    pub const NUMBER: u32 = 7;
    pub const WS: u32 = 8;

    pub const EXPRESSION: u32 = 1;
    pub const TERM: u32 = 2;
    pub const FACTOR: u32 = 3;
}

/// ```text
/// Expression = Term (("+" | "-") Term)*
/// Term       = Factor (("*" | "/") Factor)*
/// Factor     = NUMBER | "(" Expression ")"
/// ```
pub fn arithmetic() -> Grammar {
    use arithmetic::*;
    GrammarBuilder::new()
        .token_pattern(TokenPattern::string(ADD, "ADD", "+"))
        .token_pattern(TokenPattern::string(SUB, "SUB", "-"))
        .token_pattern(TokenPattern::string(MUL, "MUL", "*"))
        .token_pattern(TokenPattern::string(DIV, "DIV", "/"))
        .token_pattern(TokenPattern::string(LEFT, "LEFT", "("))
        .token_pattern(TokenPattern::string(RIGHT, "RIGHT", ")"))
        .token_pattern(TokenPattern::regexp(NUMBER, "NUMBER", "[0-9]+"))
        .token_pattern(TokenPattern::regexp(WS, "WS", r"[ \t\n\r]+").ignore())
        .production(EXPRESSION, "Expression", |p| {
            p.alternative(|a| {
                a.production(TERM, Occurs::ONCE)
                    .group(Occurs::ZERO_OR_MORE, |g| {
                        g.alternative(|a| {
                            a.group(Occurs::ONCE, |g| {
                                g.alternative(|a| a.token(ADD, Occurs::ONCE))
                                    .alternative(|a| a.token(SUB, Occurs::ONCE))
                            })
                            .production(TERM, Occurs::ONCE)
                        })
                    })
            })
        })
        .production(TERM, "Term", |p| {
            p.alternative(|a| {
                a.production(FACTOR, Occurs::ONCE)
                    .group(Occurs::ZERO_OR_MORE, |g| {
                        g.alternative(|a| {
                            a.group(Occurs::ONCE, |g| {
                                g.alternative(|a| a.token(MUL, Occurs::ONCE))
                                    .alternative(|a| a.token(DIV, Occurs::ONCE))
                            })
                            .production(FACTOR, Occurs::ONCE)
                        })
                    })
            })
        })
        .production(FACTOR, "Factor", |p| {
            p.alternative(|a| a.token(NUMBER, Occurs::ONCE))
                .alternative(|a| {
                    a.token(LEFT, Occurs::ONCE)
                        .production(EXPRESSION, Occurs::ONCE)
                        .token(RIGHT, Occurs::ONCE)
                })
        })
        .build()
        .unwrap()
}

pub mod list {
    pub const NUMBER: u32 = 1;
    pub const COMMA: u32 = 2;
    pub const LIST: u32 = 1;
}

/// `List = NUMBER ("," NUMBER)*`
pub fn list() -> Grammar {
    use list::*;
    GrammarBuilder::new()
        .token_pattern(TokenPattern::regexp(NUMBER, "NUMBER", "[0-9]+"))
        .token_pattern(TokenPattern::string(COMMA, "COMMA", ","))
        .token_pattern(TokenPattern::regexp(10, "WS", " +").ignore())
        .production(LIST, "List", |p| {
            p.alternative(|a| {
                a.token(NUMBER, Occurs::ONCE).group(Occurs::ZERO_OR_MORE, |g| {
                    g.alternative(|a| a.token(COMMA, Occurs::ONCE).token(NUMBER, Occurs::ONCE))
                })
            })
        })
        .build()
        .unwrap()
}
