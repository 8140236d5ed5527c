use serde::Serialize;

use crate::TokenId;

/// Location of a character in the input.
///
/// `line` and `column` are 1-based and count characters, `offset` is the
/// 0-based byte offset used for rendering source snippets.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub const START: Self = Self {
        line: 1,
        column: 1,
        offset: 0,
    };

    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Position after consuming `c`.
    #[inline]
    pub fn advance(&mut self, c: char) {
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// A matched token. Produced by the tokenizer, consumed by the parser.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Token {
    pub id: TokenId,
    pub image: String,
    pub position: Position,
}

impl Token {
    pub fn new(id: TokenId, image: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            image: image.into(),
            position,
        }
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// Quoted, truncated image for error messages: `"abc"`, `"a very lon..."`.
    pub fn short_image(&self) -> String {
        const MAX_CHARS: usize = 25;

        let mut out = String::with_capacity(self.image.len().min(MAX_CHARS) + 5);
        out.push('"');
        for (i, c) in self.image.chars().enumerate() {
            if i == MAX_CHARS {
                out.push_str("...");
                break;
            }
            match c {
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '"' => out.push_str("\\\""),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }
}
