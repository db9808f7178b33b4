use serde::Serialize;
use std::fmt;

/// A contiguous range of the parsed input together with the exact text it
/// covers.  Spans are only ever produced by [`crate::cursor::Cursor`], so the
/// text always matches `source[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

impl<'a> Span<'a> {
    pub(crate) const fn new(start: usize, end: usize, text: &'a str) -> Self {
        Self { start, end, text }
    }

    /// Byte offset of the first covered character.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last covered character.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// The verbatim source text covered by this span.
    pub const fn text(&self) -> &'a str {
        self.text
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A value paired with the span it was parsed from.  Every AST node and every
/// scanned lexeme is wrapped in one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spanned<'a, T> {
    span: Span<'a>,
    value: T,
}

impl<'a, T> Spanned<'a, T> {
    pub(crate) const fn new(span: Span<'a>, value: T) -> Self {
        Self { span, value }
    }

    pub const fn span(&self) -> Span<'a> {
        self.span
    }

    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Keep the span, transform the value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<'a, U> {
        Spanned {
            span: self.span,
            value: f(self.value),
        }
    }
}
