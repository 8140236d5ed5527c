//! Buffered character input over any `BufRead`.

use std::io::{self, BufRead};

use crate::matcher::CharSource;

/// Line-at-a-time character buffer with arbitrary look-ahead.
///
/// Consumed characters are dropped once they make up at least half of the
/// buffer. The underlying reader is released at end of input or after the
/// first I/O error; both read as end of input from then on.
#[derive(Debug)]
pub struct CharReader<R> {
    reader: Option<R>,
    chars: Vec<char>,
    pos: usize,
    line: String,
}

impl<R: BufRead> CharReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            chars: Vec::new(),
            pos: 0,
            line: String::new(),
        }
    }

    pub fn peek(&mut self, offset: usize) -> io::Result<Option<char>> {
        while self.pos + offset >= self.chars.len() {
            if !self.fill()? {
                return Ok(None);
            }
        }
        Ok(Some(self.chars[self.pos + offset]))
    }

    /// Take up to `n` buffered characters.
    pub fn consume(&mut self, n: usize) -> String {
        let end = (self.pos + n).min(self.chars.len());
        let taken: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        taken
    }

    fn fill(&mut self) -> io::Result<bool> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };

        if self.pos > 0 && self.pos >= self.chars.len() / 2 {
            self.chars.drain(..self.pos);
            self.pos = 0;
        }

        self.line.clear();
        match reader.read_line(&mut self.line) {
            Ok(0) => {
                self.reader = None;
                Ok(false)
            }
            Ok(_) => {
                self.chars.extend(self.line.chars());
                Ok(true)
            }
            Err(e) => {
                self.reader = None;
                Err(e)
            }
        }
    }
}

impl<R: BufRead> CharSource for CharReader<R> {
    fn peek(&mut self, offset: usize) -> io::Result<Option<char>> {
        CharReader::peek(self, offset)
    }
}
