use std::io::BufRead;

use grammatica_core::{ParseError, ParseErrorKind, Position, Token};

use crate::lexicon::Lexicon;
use crate::matcher::NfaMatcher;
use crate::reader::CharReader;

/// Splits character input into tokens using longest match.
///
/// Ignored patterns are skipped. A matched error pattern or an input
/// character no pattern can start with produces an error; the offending
/// text is consumed first, so calling [`Tokenizer::next`] again resumes
/// right after it.
pub struct Tokenizer<'l, R> {
    lexicon: &'l Lexicon,
    input: CharReader<R>,
    matcher: NfaMatcher,
    position: Position,
}

impl<'l, R: BufRead> Tokenizer<'l, R> {
    pub fn new(lexicon: &'l Lexicon, reader: R) -> Self {
        Self {
            lexicon,
            input: CharReader::new(reader),
            matcher: NfaMatcher::new(),
            position: Position::START,
        }
    }

    pub fn lexicon(&self) -> &'l Lexicon {
        self.lexicon
    }

    /// Position of the next unread character.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Start over on fresh input.
    pub fn reset(&mut self, reader: R) {
        self.input = CharReader::new(reader);
        self.position = Position::START;
    }

    /// Next non-ignored token, or `None` at end of input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            let start = self.position;
            let found = self
                .matcher
                .longest_match(self.lexicon.automaton(), &mut self.input)
                .map_err(|e| ParseError::io(&e, Some(start)))?;

            let Some(found) = found else {
                let first = self
                    .input
                    .peek(0)
                    .map_err(|e| ParseError::io(&e, Some(start)))?;
                let Some(c) = first else {
                    return Ok(None);
                };
                self.consume(1);
                return Err(ParseError::at(ParseErrorKind::UnexpectedChar(c), start));
            };

            let image = self.consume(found.len);
            let Some(pattern) = self.lexicon.pattern_at(found.pattern) else {
                return Err(ParseError::internal(
                    format!("automaton accepted unknown pattern {}", found.pattern),
                    Some(start),
                ));
            };

            if let Some(message) = pattern.error_message() {
                return Err(ParseError::at(
                    ParseErrorKind::InvalidToken {
                        image,
                        message: message.to_string(),
                    },
                    start,
                ));
            }
            if pattern.is_ignore() {
                continue;
            }
            return Ok(Some(Token::new(pattern.id(), image, start)));
        }
    }

    /// Every remaining token, stopping at the first error.
    pub fn tokenize_all(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn consume(&mut self, n: usize) -> String {
        let image = self.input.consume(n);
        for c in image.chars() {
            self.position.advance(c);
        }
        image
    }
}
