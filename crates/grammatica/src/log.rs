//! Accumulated parse errors.

use grammatica_core::ParseError;

/// Every error detected during one parse, in the order found.
#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} parse error(s)", .errors.len())]
pub struct ParseLog {
    errors: Vec<ParseError>,
}

impl ParseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn internal(message: &str) -> Self {
        let mut log = Self::new();
        log.push(ParseError::internal(message, None));
        log
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}

impl IntoIterator for ParseLog {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseLog {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
