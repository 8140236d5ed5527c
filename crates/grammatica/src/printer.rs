//! Builder-pattern printer for rendering parse errors.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::log::ParseLog;

pub struct LogPrinter<'l, 's> {
    log: &'l ParseLog,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'l, 's> LogPrinter<'l, 's> {
    pub fn new(log: &'l ParseLog) -> Self {
        Self {
            log,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, error) in self.log.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }

            // Errors without a location (internal, I/O) have nothing to point at.
            let Some(position) = error.position else {
                writeln!(w, "error: {}", error.message())?;
                continue;
            };

            let message = error.message();
            let mut snippet = Snippet::source(source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(char_range(source, position.offset))
                    .label(&message),
            );
            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let report: Vec<Group> = vec![Level::ERROR.primary_title(&message).element(snippet)];
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, error) in self.log.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", error)?;
        }
        Ok(())
    }
}

/// Byte range of the character at `offset`; empty at end of input.
fn char_range(source: &str, offset: usize) -> std::ops::Range<usize> {
    let start = offset.min(source.len());
    let width = source
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8);
    start..start + width
}

impl ParseLog {
    pub fn printer(&self) -> LogPrinter<'_, '_> {
        LogPrinter::new(self)
    }
}
