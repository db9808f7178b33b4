//! Module `cursor` provides the character stream the parser reads from.
//!
//! The cursor walks a `&str` one `char` at a time. End of input is reported as
//! `None` from [`Cursor::current`] rather than an error, and advancing past it
//! is a no‑op. Positions are never handed out directly: callers take a
//! [`Mark`] and later [`Cursor::capture`] the span between that mark and the
//! current position, which is the only way a [`Span`] comes into existence.

use log::debug;

use crate::span::Span;

/// Opaque position token returned by [`Cursor::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

pub struct Cursor<'a> {
    src: &'a str, // entire input line
    pos: usize,   // byte offset of the current char, always on a char boundary
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(src: &'a str) -> Self {
        debug!("Cursor created over {} bytes", src.len());

        Self { src, pos: 0 }
    }

    /// The full input this cursor walks over.
    #[inline]
    pub const fn source(&self) -> &'a str {
        self.src
    }

    /// Peek at the current char.  `None` once the input is exhausted.
    #[inline(always)]
    pub fn current(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    #[inline(always)]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Step over the current char.  Does nothing at end of input.
    #[inline(always)]
    pub fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
    }

    #[inline(always)]
    pub const fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Span from `mark` up to (not including) the current char.
    #[inline]
    pub fn capture(&self, mark: Mark) -> Span<'a> {
        self.capture_range(mark, self.mark())
    }

    /// Span between two previously taken marks.
    pub fn capture_range(&self, from: Mark, to: Mark) -> Span<'a> {
        debug_assert!(from <= to, "capture_range called with reversed marks");

        Span::new(from.0, to.0, &self.src[from.0..to.0])
    }

    /// Current byte offset.  Only used to locate errors.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.pos
    }
}
