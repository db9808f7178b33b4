//! Error hierarchy for the **calculator parser**.
//!
//! Every scanner and parser routine fails fast with one of the variants
//! defined here and lets it propagate to its caller; there is no recovery
//! inside a parse. Each variant carries a human‑readable message and the byte
//! offset of the cursor when the failure was raised, so a caller can render
//! the failing position however it likes.
//!
//! The module **does not** print diagnostics itself

use thiserror::Error;

use log::debug;

/// Canonical error type returned by [`crate::parser::parse_statement`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Malformed `=` form: `=` at the very start, or a missing `=` after a
    /// name, parameter list or operator.
    #[error("[offset {offset}] Invalid assignment: {message}")]
    InvalidAssignment {
        /// Human‑readable description.
        message: String,

        /// Byte offset into the input where the error occurred.
        offset: usize,
    },

    /// A character that is not one of `+ - * / ^ %` where an operator is required.
    #[error("[offset {offset}] Invalid operator: {message}")]
    InvalidOperator { message: String, offset: usize },

    /// A character that cannot start an identifier where one is required.
    #[error("[offset {offset}] Invalid identifier: {message}")]
    InvalidIdentifier { message: String, offset: usize },

    /// A numeric literal with a dangling `.` or exponent marker.
    #[error("[offset {offset}] Invalid number: {message}")]
    InvalidNumber { message: String, offset: usize },

    /// Neither `,` nor `)` after an element of an argument list.
    #[error("[offset {offset}] Expected ',' or ')': {message}")]
    ExpectedCommaOrParen { message: String, offset: usize },

    /// Trailing input after an otherwise complete statement.
    #[error("[offset {offset}] Unexpected character: {message}")]
    UnexpectedCharacter { message: String, offset: usize },

    /// Operator/operand sequencing that does not reduce to a single expression.
    #[error("[offset {offset}] Invalid expression: {message}")]
    InvalidExpression { message: String, offset: usize },
}

impl ParseError {
    pub fn invalid_assignment<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating InvalidAssignment error: offset={}, msg={}", offset, message);

        ParseError::InvalidAssignment { message, offset }
    }

    pub fn invalid_operator<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating InvalidOperator error: offset={}, msg={}", offset, message);

        ParseError::InvalidOperator { message, offset }
    }

    pub fn invalid_identifier<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating InvalidIdentifier error: offset={}, msg={}", offset, message);

        ParseError::InvalidIdentifier { message, offset }
    }

    pub fn invalid_number<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating InvalidNumber error: offset={}, msg={}", offset, message);

        ParseError::InvalidNumber { message, offset }
    }

    pub fn expected_comma_or_paren<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating ExpectedCommaOrParen error: offset={}, msg={}", offset, message);

        ParseError::ExpectedCommaOrParen { message, offset }
    }

    pub fn unexpected_character<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating UnexpectedCharacter error: offset={}, msg={}", offset, message);

        ParseError::UnexpectedCharacter { message, offset }
    }

    pub fn invalid_expression<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating InvalidExpression error: offset={}, msg={}", offset, message);

        ParseError::InvalidExpression { message, offset }
    }

    /// Byte offset of the cursor when the error was raised.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::InvalidAssignment { offset, .. }
            | ParseError::InvalidOperator { offset, .. }
            | ParseError::InvalidIdentifier { offset, .. }
            | ParseError::InvalidNumber { offset, .. }
            | ParseError::ExpectedCommaOrParen { offset, .. }
            | ParseError::UnexpectedCharacter { offset, .. }
            | ParseError::InvalidExpression { offset, .. } => *offset,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::InvalidAssignment { message, .. }
            | ParseError::InvalidOperator { message, .. }
            | ParseError::InvalidIdentifier { message, .. }
            | ParseError::InvalidNumber { message, .. }
            | ParseError::ExpectedCommaOrParen { message, .. }
            | ParseError::UnexpectedCharacter { message, .. }
            | ParseError::InvalidExpression { message, .. } => message,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, ParseError>;
