//! Module `scanner` holds the character‑level lexers the parser calls directly.
//!
//! There is no separate token stream: each routine reads straight from a
//! [`Cursor`], consumes exactly the lexeme it recognises, and returns it
//! wrapped in a [`Spanned`] captured by the cursor.
//!
//! # Routines
//!
//! - `skip_whitespace`: always succeeds, produces nothing.
//! - `read_identifier`: `[A-Za-z_][A-Za-z0-9_]*`, else `InvalidIdentifier`.
//! - `read_operator`: skips whitespace, then one of `+ - * / ^ %`, else
//!   `InvalidOperator`.
//! - `read_number`: `digits ( "." digits )? ( [eE] [+-]? digits )?`, else
//!   `InvalidNumber`.  The literal ends at the first char that cannot
//!   continue it, which includes whitespace, `>` and `/`.

use crate::ast::Operator;
use crate::cursor::{Cursor, Mark};
use crate::error::{ParseError, Result};
use crate::span::Spanned;
use log::debug;

#[inline(always)]
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline(always)]
pub fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Describe the char under the cursor for error messages.
pub(crate) fn found(cursor: &Cursor<'_>) -> String {
    match cursor.current() {
        Some(c) => format!("found '{}'", c),
        None => "found end of input".to_owned(),
    }
}

pub fn skip_whitespace(cursor: &mut Cursor<'_>) {
    while cursor.current().is_some_and(char::is_whitespace) {
        cursor.advance();
    }
}

pub fn read_identifier<'a>(cursor: &mut Cursor<'a>) -> Result<Spanned<'a, &'a str>> {
    let mark: Mark = cursor.mark();

    if !cursor.current().is_some_and(is_identifier_start) {
        return Err(ParseError::invalid_identifier(
            cursor.offset(),
            format!("expected identifier, {}", found(cursor)),
        ));
    }

    while cursor.current().is_some_and(is_identifier_continue) {
        cursor.advance();
    }

    let span = cursor.capture(mark);

    debug!("Scanned identifier '{}' at {}", span.text(), span);

    Ok(Spanned::new(span, span.text()))
}

pub fn read_operator<'a>(cursor: &mut Cursor<'a>) -> Result<Spanned<'a, Operator>> {
    skip_whitespace(cursor);

    let mark: Mark = cursor.mark();

    let operator: Operator = match cursor.current().and_then(Operator::from_char) {
        Some(operator) => operator,
        None => {
            return Err(ParseError::invalid_operator(
                cursor.offset(),
                format!("expected one of + - * / ^ %, {}", found(cursor)),
            ));
        }
    };

    cursor.advance();

    let span = cursor.capture(mark);

    debug!("Scanned operator {:?} at {}", operator, span);

    Ok(Spanned::new(span, operator))
}

pub fn read_number<'a>(cursor: &mut Cursor<'a>) -> Result<Spanned<'a, f64>> {
    let mark: Mark = cursor.mark();

    require_digit(cursor, "expected digit")?;
    skip_digits(cursor);

    match cursor.current() {
        Some('.') => {
            cursor.advance();
            read_fraction(cursor)?;
        }

        Some('e' | 'E') => {
            cursor.advance();
            read_exponent(cursor)?;
        }

        _ => {}
    }

    let span = cursor.capture(mark);

    // Every char in the span was validated above, so `parse` cannot fail.
    let value: f64 = span
        .text()
        .parse::<f64>()
        .unwrap_or_else(|e| unreachable!("scanned literal {:?} rejected: {}", span.text(), e));

    debug!("Scanned number {} from '{}' at {}", value, span.text(), span);

    Ok(Spanned::new(span, value))
}

/// Digits after the `.`, optionally followed by an exponent.
fn read_fraction(cursor: &mut Cursor<'_>) -> Result<()> {
    require_digit(cursor, "expected digit after '.'")?;
    skip_digits(cursor);

    if matches!(cursor.current(), Some('e' | 'E')) {
        cursor.advance();
        read_exponent(cursor)?;
    }

    Ok(())
}

/// Optional sign, then at least one digit.
fn read_exponent(cursor: &mut Cursor<'_>) -> Result<()> {
    if matches!(cursor.current(), Some('+' | '-')) {
        cursor.advance();
    }

    require_digit(cursor, "expected digit in exponent")?;
    skip_digits(cursor);

    Ok(())
}

#[inline(always)]
fn skip_digits(cursor: &mut Cursor<'_>) {
    while cursor.current().is_some_and(|c| c.is_ascii_digit()) {
        cursor.advance();
    }
}

fn require_digit(cursor: &Cursor<'_>, what: &str) -> Result<()> {
    if cursor.current().is_some_and(|c| c.is_ascii_digit()) {
        return Ok(());
    }

    Err(ParseError::invalid_number(
        cursor.offset(),
        format!("{}, {}", what, found(cursor)),
    ))
}
