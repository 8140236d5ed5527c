//! Token pattern declarations.

use std::sync::Arc;

use crate::TokenId;

pub const DEFAULT_ERROR_MESSAGE: &str = "unrecognized token";
pub const DEFAULT_IGNORE_MESSAGE: &str = "ignored token";

/// How a pattern's text is interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PatternKind {
    /// Matches the text literally.
    String,
    /// Regular expression in the `regex-syntax` dialect, anchored at the
    /// current input position.
    Regexp,
}

/// A named lexical rule.
///
/// A pattern flagged `error` makes the tokenizer fail with its message when
/// it matches; a pattern flagged `ignore` is matched and silently dropped.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenPattern {
    id: TokenId,
    name: Arc<str>,
    kind: PatternKind,
    pattern: String,
    error: Option<String>,
    ignore: Option<String>,
}

impl TokenPattern {
    pub fn new(
        id: impl Into<TokenId>,
        name: impl Into<Arc<str>>,
        kind: PatternKind,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            pattern: pattern.into(),
            error: None,
            ignore: None,
        }
    }

    pub fn string(
        id: impl Into<TokenId>,
        name: impl Into<Arc<str>>,
        literal: impl Into<String>,
    ) -> Self {
        Self::new(id, name, PatternKind::String, literal)
    }

    pub fn regexp(
        id: impl Into<TokenId>,
        name: impl Into<Arc<str>>,
        regexp: impl Into<String>,
    ) -> Self {
        Self::new(id, name, PatternKind::Regexp, regexp)
    }

    /// Flag as an error pattern with the default message.
    pub fn error(self) -> Self {
        self.error_with(DEFAULT_ERROR_MESSAGE)
    }

    pub fn error_with(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Flag as an ignored pattern with the default message.
    pub fn ignore(self) -> Self {
        self.ignore_with(DEFAULT_IGNORE_MESSAGE)
    }

    pub fn ignore_with(mut self, message: impl Into<String>) -> Self {
        self.ignore = Some(message.into());
        self
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, for parse tree nodes.
    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ignore(&self) -> bool {
        self.ignore.is_some()
    }

    pub fn ignore_message(&self) -> Option<&str> {
        self.ignore.as_deref()
    }

    /// Human-readable form used in "expected ..." lists.
    ///
    /// Literals are quoted (`"cat"`), regular expressions use the name (`<IDENT>`).
    pub fn description(&self) -> String {
        match self.kind {
            PatternKind::String => format!("\"{}\"", self.pattern),
            PatternKind::Regexp => format!("<{}>", self.name),
        }
    }
}
